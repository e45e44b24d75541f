//! Indicator feeds published as JSON, one document per calendar year
//! (`{base}/{code}/{year}` returning `{ "serie": [ { "fecha", "valor" } ] }`).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use bitacora_core::{
    BitacoraError, FetchWindow, Point, Series, SeriesSource, utc_calendar_date,
};

use crate::adapter::{HttpFetch, RealAdapter};

/// Default endpoint for Chilean economic indicators.
pub const INDICATOR_BASE_URL: &str = "https://mindicador.cl/api";

#[derive(Debug, Deserialize)]
struct IndicatorPayload {
    serie: Option<Vec<IndicatorRow>>,
}

#[derive(Debug, Deserialize)]
struct IndicatorRow {
    fecha: Option<String>,
    valor: Option<NumericValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumericValue {
    Number(f64),
    Text(String),
}

impl NumericValue {
    fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

/// Decode an indicator document into points, in payload order.
///
/// Rows with an unreadable date or a non-finite value are skipped.
///
/// # Errors
/// Returns `MalformedPayload` if the body is not JSON or lacks the `serie` array.
pub fn parse_indicator_json(body: &str, series: &str) -> Result<Vec<Point>, BitacoraError> {
    let payload: IndicatorPayload = serde_json::from_str(body)
        .map_err(|e| BitacoraError::malformed(series, format!("invalid indicator json: {e}")))?;
    let rows = payload
        .serie
        .ok_or_else(|| BitacoraError::malformed(series, "missing 'serie' array"))?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let date = row.fecha.as_deref().and_then(utc_calendar_date)?;
            let value = row.valor.as_ref().and_then(NumericValue::as_f64)?;
            Some(Point::new(date, value))
        })
        .collect())
}

/// Source for one indicator code (e.g. `"uf"`, `"dolar"`).
///
/// A fetch issues one request per calendar year of the window, concurrently.
/// A failed year contributes no points; the fetch fails only when every year
/// failed.
pub struct IndicatorSource {
    code: &'static str,
    base_url: String,
    adapter: Arc<dyn HttpFetch>,
}

impl IndicatorSource {
    /// Source for `code` against the public endpoint.
    #[must_use]
    pub fn new(code: &'static str) -> Self {
        Self {
            code,
            base_url: INDICATOR_BASE_URL.to_string(),
            adapter: Arc::new(RealAdapter::default()),
        }
    }

    /// Replace the HTTP adapter.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn HttpFetch>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Point the source at another endpoint (mirrors, local test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Indicator code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn year_url(&self, year: i32) -> String {
        format!("{}/{}/{year}", self.base_url.trim_end_matches('/'), self.code)
    }

    async fn fetch_year(&self, year: i32) -> Result<Vec<Point>, BitacoraError> {
        let reply = self.adapter.get(self.code, &self.year_url(year)).await?;
        if !reply.is_success() {
            return Err(BitacoraError::unavailable(
                self.code,
                format!("status {} for year {year}", reply.status),
            ));
        }
        parse_indicator_json(&reply.body, self.code)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "bitacora_sources::indicator::fetch",
            skip(self),
            fields(code = self.code, start = %window.start, end = %window.end),
        )
    )]
    async fn fetch_years(&self, window: &FetchWindow) -> Result<Series, BitacoraError> {
        let years: Vec<i32> = window.years().collect();
        let results = futures::future::join_all(years.iter().map(|y| self.fetch_year(*y))).await;

        let mut points: Vec<Point> = Vec::new();
        let mut errors: Vec<BitacoraError> = Vec::new();
        for (year, res) in years.iter().zip(results) {
            match res {
                Ok(pts) => points.extend(pts),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(code = self.code, year, error = %e, "yearly request failed");
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() && errors.len() == years.len() {
            if errors.len() == 1 {
                return Err(errors.remove(0));
            }
            return Err(BitacoraError::unavailable(
                self.code,
                format!("all {} yearly requests failed: {}", errors.len(), errors[0]),
            ));
        }

        Ok(Series::new(
            points.into_iter().filter(|p| window.contains(p.date)),
        ))
    }
}

#[async_trait]
impl SeriesSource for IndicatorSource {
    fn name(&self) -> &'static str {
        "bitacora-mindicador"
    }

    fn vendor(&self) -> &'static str {
        "mindicador.cl"
    }

    async fn fetch(&self, window: &FetchWindow) -> Result<Series, BitacoraError> {
        self.fetch_years(window).await
    }
}
