use std::ops::RangeInclusive;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::timeseries::window::cutoff;
use crate::{BitacoraError, PeriodToken, Series};

/// Inclusive calendar range a load asks sources to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    /// First date of interest.
    pub start: NaiveDate,
    /// Last date of interest (usually today).
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Build a window, swapping the bounds if they arrive reversed.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Window `[cutoff(period), today]`.
    #[must_use]
    pub fn for_period(period: PeriodToken, today: NaiveDate, all_horizon_years: u32) -> Self {
        Self::new(cutoff(period, today, all_horizon_years), today)
    }

    /// Calendar years touched by the window, for sources queried per year.
    #[must_use]
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }

    /// Returns true if data fetched for `self` is enough to answer `other`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// An upstream feed producing one raw series per fetch.
///
/// Implementations return points in any order; the returned [`Series`] has
/// already been sorted and de-duplicated by its constructor. Failures should be
/// reported as `SourceUnavailable` or `MalformedPayload`; the orchestrator
/// re-tags them with the registered series key.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// A stable identifier for logs and error tags (e.g. "bitacora-mindicador").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Fetch the raw series covering at least `window`.
    ///
    /// Sources may return points outside the window; the period filter trims them.
    async fn fetch(&self, window: &FetchWindow) -> Result<Series, BitacoraError>;
}
