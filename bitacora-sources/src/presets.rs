//! Ready-made dashboards: which series, from which feed, drawn how.

use std::sync::Arc;

use bitacora_core::{
    Alignment, DisplayMode, Granularity, PeriodToken, SeriesKey, SeriesMeta, SeriesSource,
    ValueUnit,
};

use crate::adapter::HttpFetch;
use crate::indicator::IndicatorSource;
use crate::price_csv::{DEFAULT_PROXY, PriceCsvSource};

/// One series of a dashboard.
pub struct PresetSeries {
    /// Stable key.
    pub key: SeriesKey,
    /// Label, color and unit.
    pub meta: SeriesMeta,
    /// Upstream feed.
    pub source: Arc<dyn SeriesSource>,
}

/// A dashboard: a titled set of series with its initial lens and window.
pub struct Preset {
    /// Dashboard title.
    pub title: &'static str,
    /// Initial display lens.
    pub default_mode: DisplayMode,
    /// Initial window.
    pub default_period: PeriodToken,
    /// Date axis construction.
    pub alignment: Alignment,
    /// Sampling step ahead of alignment.
    pub granularity: Granularity,
    /// Series, in legend order.
    pub series: Vec<PresetSeries>,
}

fn indicator(
    adapter: &Arc<dyn HttpFetch>,
    key: &'static str,
    code: &'static str,
    meta: SeriesMeta,
) -> PresetSeries {
    PresetSeries {
        key: SeriesKey::new(key),
        meta,
        source: Arc::new(IndicatorSource::new(code).with_adapter(Arc::clone(adapter))),
    }
}

fn ticker(
    adapter: &Arc<dyn HttpFetch>,
    key: &'static str,
    symbol: &'static str,
    meta: SeriesMeta,
) -> PresetSeries {
    ticker_at(adapter, key, symbol, meta, Granularity::Daily)
}

fn ticker_at(
    adapter: &Arc<dyn HttpFetch>,
    key: &'static str,
    symbol: &'static str,
    meta: SeriesMeta,
    interval: Granularity,
) -> PresetSeries {
    PresetSeries {
        key: SeriesKey::new(key),
        meta: meta.with_unit(ValueUnit::Price),
        source: Arc::new(
            PriceCsvSource::new(symbol)
                .with_proxy(DEFAULT_PROXY)
                .with_interval(interval)
                .with_adapter(Arc::clone(adapter)),
        ),
    }
}

/// Chilean traditional finance: UF, USD/CLP and IPSA tracked through ECH.
#[must_use]
pub fn chile_tradfi(adapter: &Arc<dyn HttpFetch>) -> Preset {
    Preset {
        title: "TradFi Chile",
        default_mode: DisplayMode::Base100,
        default_period: PeriodToken::Ytd,
        alignment: Alignment::Union,
        granularity: Granularity::Daily,
        series: vec![
            indicator(adapter, "uf", "uf", SeriesMeta::new("UF", "#63b3ed")),
            indicator(adapter, "usd", "dolar", SeriesMeta::new("USD/CLP", "#f6ad55")),
            ticker(adapter, "ipsa", "ech.us", SeriesMeta::new("IPSA (ECH)", "#9f7aea")),
        ],
    }
}

/// Home overview of the Chilean series: monthly closes on common months only,
/// rebased to 100.
#[must_use]
pub fn chile_home(adapter: &Arc<dyn HttpFetch>) -> Preset {
    Preset {
        title: "TradFi Chile (mensual)",
        default_mode: DisplayMode::Base100,
        default_period: PeriodToken::Y1,
        alignment: Alignment::Intersection,
        granularity: Granularity::Monthly,
        series: vec![
            indicator(adapter, "uf", "uf", SeriesMeta::new("UF", "#63b3ed")),
            indicator(adapter, "usd", "dolar", SeriesMeta::new("USD/CLP", "#f6ad55")),
            ticker_at(
                adapter,
                "ipsa",
                "ech.us",
                SeriesMeta::new("IPSA (ECH)", "#9f7aea"),
                Granularity::Monthly,
            ),
        ],
    }
}

/// Broad equity indices: US, Germany and Japan country ETFs.
#[must_use]
pub fn global_indices(adapter: &Arc<dyn HttpFetch>) -> Preset {
    Preset {
        title: "Indices",
        default_mode: DisplayMode::Base100,
        default_period: PeriodToken::Ytd,
        alignment: Alignment::Union,
        granularity: Granularity::Daily,
        series: vec![
            ticker(adapter, "spy", "spy.us", SeriesMeta::new("SPY (S&P 500)", "#48bb78")),
            ticker(adapter, "ewg", "ewg.us", SeriesMeta::new("EWG (Alemania)", "#ed8936")),
            ticker(adapter, "ewj", "ewj.us", SeriesMeta::new("EWJ (Japón)", "#9f7aea")),
        ],
    }
}

/// Commodities through listed proxies: gold, silver, copper miners and lithium.
#[must_use]
pub fn commodities(adapter: &Arc<dyn HttpFetch>) -> Preset {
    Preset {
        title: "Commodities",
        default_mode: DisplayMode::Real,
        default_period: PeriodToken::Ytd,
        alignment: Alignment::Union,
        granularity: Granularity::Daily,
        series: vec![
            ticker(adapter, "gold", "gld.us", SeriesMeta::new("Oro ETF (GLD)", "#FFD700")),
            ticker(adapter, "silver", "slv.us", SeriesMeta::new("Plata ETF (SLV)", "#C0C0C0")),
            ticker(adapter, "copper", "copx.us", SeriesMeta::new("Cobre ETF (COPX)", "#B87333")),
            ticker(adapter, "lithium", "alb.us", SeriesMeta::new("Litio (ALB)", "#7DF9FF")),
        ],
    }
}
