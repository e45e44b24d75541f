use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use bitacora_core::{
    Alignment, BitacoraConfig, BitacoraError, FailurePolicy, Granularity, SeriesKey, SeriesMeta,
    SeriesSource,
};
use chrono::{NaiveDate, Utc};

/// Source of "today" for period cutoffs.
pub trait Clock: Send + Sync {
    /// Current calendar date (UTC).
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a fixed date. Useful for reproducible windows.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A registered series: key, display metadata and the feed behind it.
#[derive(Clone)]
pub struct SourceEntry {
    /// Key the series is addressed by.
    pub key: SeriesKey,
    /// Legend label, color and unit.
    pub meta: SeriesMeta,
    /// Upstream feed.
    pub source: Arc<dyn SeriesSource>,
}

impl std::fmt::Debug for SourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceEntry")
            .field("key", &self.key)
            .field("meta", &self.meta)
            .field("source", &self.source.name())
            .finish()
    }
}

/// Orchestrator that fetches every registered series and runs the alignment pipeline.
pub struct Bitacora {
    pub(crate) entries: Vec<SourceEntry>,
    pub(crate) cfg: BitacoraConfig,
    pub(crate) clock: Arc<dyn Clock>,
}

/// Builder for constructing a `Bitacora` orchestrator with custom configuration.
pub struct BitacoraBuilder {
    entries: Vec<SourceEntry>,
    cfg: BitacoraConfig,
    clock: Arc<dyn Clock>,
}

impl Default for BitacoraBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BitacoraBuilder {
    /// Create a new builder with defaults.
    ///
    /// Starts with no sources, degrade-per-source failure handling, union
    /// alignment, a two day fill bound, a 30s per-source timeout and the
    /// system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![],
            cfg: BitacoraConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Register a series.
    ///
    /// Registration order is the order series appear in rendered frames.
    /// Keys must be unique; duplicates are rejected by [`build`](Self::build).
    #[must_use]
    pub fn with_source(
        mut self,
        key: SeriesKey,
        meta: SeriesMeta,
        source: Arc<dyn SeriesSource>,
    ) -> Self {
        self.entries.push(SourceEntry { key, meta, source });
        self
    }

    /// Register a prepared entry.
    #[must_use]
    pub fn with_entry(mut self, entry: SourceEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Longest run of missing calendar days forward fill will close.
    ///
    /// A gap of `d` days between consecutive points is filled when
    /// `1 < d <= max_gap_days + 1`.
    #[must_use]
    pub const fn max_gap_days(mut self, days: u32) -> Self {
        self.cfg.max_gap_days = days;
        self
    }

    /// Set the per-source fetch timeout.
    ///
    /// Each source gets its own timer; one slow feed never cancels its siblings.
    #[must_use]
    pub const fn source_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.source_timeout = timeout;
        self
    }

    /// Set an overall deadline for the whole fetch step.
    ///
    /// When exceeded the load fails with `RequestTimeout`.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Select partial-failure handling.
    ///
    /// - `Degrade`: failed sources become empty series plus a warning; the load
    ///   fails only when every source failed.
    /// - `AllOrNothing`: any failed source fails the load.
    #[must_use]
    pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.cfg.failure_policy = policy;
        self
    }

    /// Select how the shared date axis is built.
    #[must_use]
    pub const fn alignment(mut self, alignment: Alignment) -> Self {
        self.cfg.alignment = alignment;
        self
    }

    /// Sampling step applied to raw series before alignment.
    #[must_use]
    pub const fn granularity(mut self, granularity: Granularity) -> Self {
        self.cfg.granularity = granularity;
        self
    }

    /// Length of the `All` window, in years.
    #[must_use]
    pub const fn all_horizon_years(mut self, years: u32) -> Self {
        self.cfg.all_horizon_years = years;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: BitacoraConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Override the clock used to compute period cutoffs.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the `Bitacora` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no sources are registered, a key is registered
    /// twice, the `All` horizon is zero, or a timeout is zero.
    pub fn build(self) -> Result<Bitacora, BitacoraError> {
        if self.entries.is_empty() {
            return Err(BitacoraError::InvalidArg(
                "no sources registered; add at least one via with_source(...)".to_string(),
            ));
        }
        let mut seen: HashSet<SeriesKey> = HashSet::new();
        for e in &self.entries {
            if !seen.insert(e.key) {
                return Err(BitacoraError::InvalidArg(format!(
                    "series key '{}' registered more than once",
                    e.key
                )));
            }
        }
        if self.cfg.all_horizon_years == 0 {
            return Err(BitacoraError::InvalidArg(
                "all_horizon_years must be at least 1".to_string(),
            ));
        }
        if self.cfg.source_timeout.is_zero() || self.cfg.request_timeout.is_some_and(|t| t.is_zero())
        {
            return Err(BitacoraError::InvalidArg(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(Bitacora {
            entries: self.entries,
            cfg: self.cfg,
            clock: self.clock,
        })
    }
}

/// Re-tag a source error with the registered series key.
///
/// Source-level failures keep their kind; anything else a source reports is
/// folded into `SourceUnavailable`.
pub fn tag_err(key: SeriesKey, e: BitacoraError) -> BitacoraError {
    match e {
        BitacoraError::SourceUnavailable { msg, .. } => BitacoraError::unavailable(key.as_str(), msg),
        BitacoraError::MalformedPayload { msg, .. } => BitacoraError::malformed(key.as_str(), msg),
        BitacoraError::SourceTimeout { timeout_ms, .. } => BitacoraError::SourceTimeout {
            series: key.to_string(),
            timeout_ms,
        },
        other => BitacoraError::unavailable(key.as_str(), other.to_string()),
    }
}

/// Apply an optional overall deadline to a future.
///
/// # Errors
/// Returns `RequestTimeout` when the deadline expires first.
pub(crate) async fn with_request_deadline<F, T>(
    deadline: Option<Duration>,
    fut: F,
) -> Result<T, BitacoraError>
where
    F: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| BitacoraError::RequestTimeout),
        None => Ok(fut.await),
    }
}

impl Bitacora {
    /// Wrap a source future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "bitacora::core::source_call_with_timeout",
            skip(fut),
            fields(
                series = %key,
                source = source_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn source_call_with_timeout<T, Fut>(
        key: SeriesKey,
        source_name: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, BitacoraError>
    where
        Fut: core::future::Future<Output = Result<T, BitacoraError>>,
    {
        match tokio::time::timeout(timeout, fut).await {
            Ok(res) => res.map_err(|e| tag_err(key, e)),
            Err(_) => Err(BitacoraError::source_timeout(key.as_str(), timeout)),
        }
    }

    /// Start building a new `Bitacora` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use bitacora::{Bitacora, SeriesKey, SeriesMeta};
    /// use bitacora_mock::MockSource;
    ///
    /// let bitacora = Bitacora::builder()
    ///     .with_source(SeriesKey::new("uf"), SeriesMeta::new("UF", "#63b3ed"), Arc::new(MockSource::new("uf")))
    ///     .with_source(SeriesKey::new("usd"), SeriesMeta::new("USD/CLP", "#f6ad55"), Arc::new(MockSource::new("dolar")))
    ///     .max_gap_days(2)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> BitacoraBuilder {
        BitacoraBuilder::new()
    }

    /// Registered series in registration order.
    #[must_use]
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = SeriesKey> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Returns true if `key` is registered.
    #[must_use]
    pub fn has_key(&self, key: SeriesKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Metadata registered for `key`.
    #[must_use]
    pub fn meta(&self, key: SeriesKey) -> Option<&SeriesMeta> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.meta)
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BitacoraConfig {
        &self.cfg
    }

    /// Today's date according to the configured clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Reject keys that were never registered.
    pub(crate) fn check_key(&self, key: SeriesKey) -> Result<(), BitacoraError> {
        if self.has_key(key) {
            Ok(())
        } else {
            Err(BitacoraError::InvalidArg(format!("unknown series key '{key}'")))
        }
    }
}
