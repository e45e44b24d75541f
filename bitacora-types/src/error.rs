use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the bitacora workspace.
///
/// Covers per-source fetch failures, payload decoding problems, empty windows,
/// degenerate rescaling, and an aggregate for multi-source attempts. Variants
/// are cloneable and serializable so they can travel inside rendered frames as
/// warnings.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BitacoraError {
    /// A fetch adapter failed (transport error, non-success status).
    #[error("source unavailable: {series}: {msg}")]
    SourceUnavailable {
        /// Series key whose source failed.
        series: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The per-source timer fired before the source answered.
    #[error("source timed out: {series} after {timeout_ms}ms")]
    SourceTimeout {
        /// Series key whose source timed out.
        series: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// A payload could not be decoded into points.
    #[error("malformed payload from {series}: {msg}")]
    MalformedPayload {
        /// Series key whose payload was rejected.
        series: String,
        /// What was wrong with the payload.
        msg: String,
    },

    /// A window or alignment step left nothing to plot.
    #[error("no data in range: {what}")]
    NoDataInRange {
        /// Description of what came up empty, e.g. "uf for YTD".
        what: String,
    },

    /// A relative display mode was requested but the series has no usable base value.
    #[error("cannot normalize {series}: no usable base value")]
    DegenerateNormalization {
        /// Series key that fell back to real values.
        series: String,
    },

    /// Every attempted source failed; contains the individual failures.
    #[error("all sources failed: {0:?}")]
    AllSourcesFailed(Vec<BitacoraError>),

    /// The overall fetch exceeded the configured deadline.
    #[error("request timed out")]
    RequestTimeout,

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A load finished after a newer one had been started; its result was discarded.
    #[error("superseded by a newer load (generation {generation})")]
    Superseded {
        /// Generation number of the discarded load.
        generation: u64,
    },
}

impl BitacoraError {
    /// Helper: build a `SourceUnavailable` error for a series key and message.
    pub fn unavailable(series: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            series: series.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `MalformedPayload` error.
    pub fn malformed(series: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedPayload {
            series: series.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NoDataInRange` error.
    pub fn no_data(what: impl Into<String>) -> Self {
        Self::NoDataInRange { what: what.into() }
    }

    /// Helper: build a `SourceTimeout` error.
    pub fn source_timeout(series: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::SourceTimeout {
            series: series.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Helper: build a `DegenerateNormalization` warning.
    pub fn degenerate(series: impl Into<String>) -> Self {
        Self::DegenerateNormalization {
            series: series.into(),
        }
    }

    /// Returns true for failures attributable to a single source.
    ///
    /// Timeouts and malformed payloads are handled exactly like an unavailable
    /// source.
    #[must_use]
    pub const fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. }
                | Self::SourceTimeout { .. }
                | Self::MalformedPayload { .. }
        )
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SourceUnavailable { .. }
            | Self::SourceTimeout { .. }
            | Self::MalformedPayload { .. }
            | Self::RequestTimeout => true,
            Self::AllSourcesFailed(inner) => inner.iter().any(Self::is_retryable),
            _ => false,
        }
    }

    /// Message suitable for showing to an end user in place of the chart.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoDataInRange { .. } => "no overlapping data for this period".to_string(),
            Self::DegenerateNormalization { series } => {
                format!("{series} cannot be rescaled; showing real values")
            }
            Self::AllSourcesFailed(_) | Self::RequestTimeout => {
                "could not load data from any source; try again later".to_string()
            }
            Self::SourceTimeout { series, .. } => format!("{series} took too long to respond"),
            Self::SourceUnavailable { series, .. } | Self::MalformedPayload { series, .. } => {
                format!("could not load {series}")
            }
            other => other.to_string(),
        }
    }

    /// Flatten nested `AllSourcesFailed` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllSourcesFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
