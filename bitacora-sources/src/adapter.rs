#[cfg(feature = "test-adapters")]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use bitacora_core::BitacoraError;

/// Raw HTTP reply handed to payload parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpReply {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Text-over-HTTP abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Issue a GET for `url` and return the status and body.
    ///
    /// Transport failures map to `SourceUnavailable` tagged with `series`;
    /// non-success statuses are returned as-is for the caller to judge.
    async fn get(&self, series: &str, url: &str) -> Result<HttpReply, BitacoraError>;
}

/// Production adapter backed by `reqwest`.
///
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone)]
pub struct RealAdapter {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl Default for RealAdapter {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl RealAdapter {
    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            request_timeout: None,
        }
    }

    /// Bound every individual HTTP request issued through this adapter.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

fn map_reqwest_err(e: &reqwest::Error, series: &str) -> BitacoraError {
    if e.is_timeout() {
        BitacoraError::unavailable(series, format!("request timed out: {e}"))
    } else if e.is_connect() {
        BitacoraError::unavailable(series, format!("connection failed: {e}"))
    } else {
        BitacoraError::unavailable(series, e.to_string())
    }
}

#[async_trait]
impl HttpFetch for RealAdapter {
    async fn get(&self, series: &str, url: &str) -> Result<HttpReply, BitacoraError> {
        let mut req = self.client.get(url);
        if let Some(t) = self.request_timeout {
            req = req.timeout(t);
        }
        let resp = req.send().await.map_err(|e| map_reqwest_err(&e, series))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| map_reqwest_err(&e, series))?;
        Ok(HttpReply { status, body })
    }
}

/* -------- Test-only lightweight adapter constructor ------- */

#[cfg(feature = "test-adapters")]
impl dyn HttpFetch {
    /// Build an `HttpFetch` from a closure over the requested URL (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn HttpFetch>
    where
        F: Send + Sync + 'static + Fn(String) -> Result<HttpReply, BitacoraError>,
    {
        struct FnFetch<F>(F);
        #[async_trait]
        impl<F> HttpFetch for FnFetch<F>
        where
            F: Send + Sync + 'static + Fn(String) -> Result<HttpReply, BitacoraError>,
        {
            async fn get(&self, _series: &str, url: &str) -> Result<HttpReply, BitacoraError> {
                (self.0)(url.to_string())
            }
        }
        Arc::new(FnFetch(f))
    }
}
