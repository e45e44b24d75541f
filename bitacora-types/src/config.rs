//! Configuration types shared across the orchestrator and sources.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What to do when some, but not all, sources fail during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FailurePolicy {
    /// Replace each failed source with an empty series and keep going.
    /// The load fails only if every source failed.
    #[default]
    Degrade,
    /// Fail the whole load as soon as any source fails.
    AllOrNothing,
}

/// How the shared date axis is built from the input series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Alignment {
    /// Union of all dates; each series stays sparse over the axis.
    #[default]
    Union,
    /// Only dates present in every non-empty series.
    Intersection,
}

/// Sampling step applied to raw series before alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Granularity {
    /// Keep every observation.
    #[default]
    Daily,
    /// One point per month, dated the first of the month, carrying the last
    /// value seen in that month.
    Monthly,
}

/// Global configuration for the `Bitacora` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitacoraConfig {
    /// Longest gap, in missing calendar days, that forward fill will close.
    pub max_gap_days: u32,
    /// Timeout for each individual source fetch.
    pub source_timeout: Duration,
    /// Optional deadline for the whole fetch step.
    pub request_timeout: Option<Duration>,
    /// Partial-failure handling.
    pub failure_policy: FailurePolicy,
    /// Date axis construction.
    pub alignment: Alignment,
    /// Bucketing of raw series ahead of alignment.
    pub granularity: Granularity,
    /// Length of the `All` window in years.
    pub all_horizon_years: u32,
}

impl Default for BitacoraConfig {
    fn default() -> Self {
        Self {
            max_gap_days: 2,
            source_timeout: Duration::from_secs(30),
            request_timeout: None,
            failure_policy: FailurePolicy::default(),
            alignment: Alignment::default(),
            granularity: Granularity::default(),
            all_horizon_years: 15,
        }
    }
}
