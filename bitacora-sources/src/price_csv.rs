//! Daily or monthly price rows published as delimited text
//! (`Date,Open,High,Low,Close,Volume`), fetched directly or through a
//! URL-encoding proxy prefix.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use bitacora_core::{
    BitacoraError, FetchWindow, Granularity, Point, Series, SeriesSource, utc_calendar_date,
};

use crate::adapter::{HttpFetch, RealAdapter};

/// Default endpoint for daily price downloads.
pub const PRICE_CSV_BASE_URL: &str = "https://stooq.com";

/// Public CORS proxy prefix used by the dashboards; the target URL is appended percent-encoded.
pub const DEFAULT_PROXY: &str = "https://tradfi.hugopablo.workers.dev/?url=";

/// Decode delimited price rows into `(date, close)` points.
///
/// Columns are located by header name, case-insensitively; only `Date` and
/// `Close` are read. Rows whose date does not parse or whose close is not a
/// finite number are dropped.
///
/// # Errors
/// Returns `MalformedPayload` if the header lacks a `Date` or `Close` column
/// (this includes empty bodies and plain-text "No data" answers).
pub fn parse_price_csv(body: &str, series: &str) -> Result<Vec<Point>, BitacoraError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| BitacoraError::malformed(series, format!("unreadable header: {e}")))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(date_idx), Some(close_idx)) = (column("date"), column("close")) else {
        return Err(BitacoraError::malformed(
            series,
            format!("header lacks Date/Close: {:?}", headers.iter().collect::<Vec<_>>()),
        ));
    };

    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|rec| {
            let date = rec.get(date_idx).and_then(utc_calendar_date)?;
            let close = rec
                .get(close_idx)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())?;
            Some(Point::new(date, close))
        })
        .collect())
}

/// Source for one ticker (e.g. `"spy.us"`).
pub struct PriceCsvSource {
    ticker: &'static str,
    base_url: String,
    proxy: Option<String>,
    interval: Granularity,
    adapter: Arc<dyn HttpFetch>,
}

const fn interval_param(interval: Granularity) -> &'static str {
    match interval {
        Granularity::Monthly => "m",
        _ => "d",
    }
}

impl PriceCsvSource {
    /// Source for `ticker` against the public endpoint, without proxy.
    #[must_use]
    pub fn new(ticker: &'static str) -> Self {
        Self {
            ticker,
            base_url: PRICE_CSV_BASE_URL.to_string(),
            proxy: None,
            interval: Granularity::Daily,
            adapter: Arc::new(RealAdapter::default()),
        }
    }

    /// Replace the HTTP adapter.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn HttpFetch>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Point the source at another endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Route requests through a proxy prefix; the target URL is appended percent-encoded.
    #[must_use]
    pub fn with_proxy(mut self, prefix: impl Into<String>) -> Self {
        self.proxy = Some(prefix.into());
        self
    }

    /// Ask upstream for one row per day (default) or per month.
    ///
    /// Monthly rows are dated by upstream; run the pipeline with
    /// `Granularity::Monthly` to bring them onto first-of-month dates.
    #[must_use]
    pub const fn with_interval(mut self, interval: Granularity) -> Self {
        self.interval = interval;
        self
    }

    /// Ticker symbol.
    #[must_use]
    pub const fn ticker(&self) -> &'static str {
        self.ticker
    }

    /// Final request URL, proxied when a prefix is configured.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the base URL does not parse.
    pub fn request_url(&self) -> Result<String, BitacoraError> {
        let mut direct = Url::parse(&self.base_url)
            .and_then(|u| u.join("/q/d/l/"))
            .map_err(|e| BitacoraError::InvalidArg(format!("bad base url '{}': {e}", self.base_url)))?;
        direct
            .query_pairs_mut()
            .append_pair("s", self.ticker)
            .append_pair("i", interval_param(self.interval));
        Ok(match &self.proxy {
            Some(prefix) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(direct.as_str().as_bytes()).collect();
                format!("{prefix}{encoded}")
            }
            None => direct.into(),
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "bitacora_sources::price_csv::fetch",
            skip(self),
            fields(ticker = self.ticker, start = %window.start, end = %window.end),
        )
    )]
    async fn download(&self, window: &FetchWindow) -> Result<Series, BitacoraError> {
        let url = self.request_url()?;
        let reply = self.adapter.get(self.ticker, &url).await?;
        if !reply.is_success() {
            return Err(BitacoraError::unavailable(
                self.ticker,
                format!("status {}", reply.status),
            ));
        }
        let points = parse_price_csv(&reply.body, self.ticker)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(ticker = self.ticker, rows = points.len(), "decoded price rows");
        Ok(Series::new(
            points.into_iter().filter(|p| window.contains(p.date)),
        ))
    }
}

#[async_trait]
impl SeriesSource for PriceCsvSource {
    fn name(&self) -> &'static str {
        "bitacora-stooq"
    }

    fn vendor(&self) -> &'static str {
        "stooq.com"
    }

    async fn fetch(&self, window: &FetchWindow) -> Result<Series, BitacoraError> {
        self.download(window).await
    }
}
