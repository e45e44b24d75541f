use std::time::Duration;

use async_trait::async_trait;
use bitacora_core::{BitacoraError, FetchWindow, Series, SeriesSource};

mod fixtures;

/// Mock source for CI-safe examples. Provides deterministic data from synthetic fixtures.
///
/// Known codes follow the real feeds (`"uf"`, `"dolar"`, `"spy.us"`, ...). A few
/// codes script failure modes:
/// - `"FAIL"`: forced `SourceUnavailable`;
/// - `"MALFORMED"`: forced `MalformedPayload`;
/// - `"EMPTY"`: an empty series;
/// - `"TIMEOUT"`: answers with an empty series after a short delay, so an
///   orchestrator with a tighter timeout gives up first.
pub struct MockSource {
    code: &'static str,
    latency: Option<Duration>,
}

impl MockSource {
    /// Fixture-backed source for feed `code`, answering immediately.
    #[must_use]
    pub const fn new(code: &'static str) -> Self {
        Self {
            code,
            latency: None,
        }
    }

    /// Delay every answer by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl SeriesSource for MockSource {
    fn name(&self) -> &'static str {
        "bitacora-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    async fn fetch(&self, window: &FetchWindow) -> Result<Series, BitacoraError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.code {
            "FAIL" => Err(BitacoraError::unavailable(self.code, "forced failure")),
            "MALFORMED" => Err(BitacoraError::malformed(self.code, "forced bad payload")),
            "EMPTY" => Ok(Series::empty()),
            "TIMEOUT" => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(Series::empty())
            }
            code => fixtures::by_code(code, window).ok_or_else(|| {
                BitacoraError::unavailable(code, format!("no fixture for '{code}'"))
            }),
        }
    }
}
