//! User-selectable pipeline state: which series, which window, which lens.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BitacoraError;
use crate::series::SeriesKey;

/// Display lens applied to every plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Absolute values as observed.
    Real,
    /// Rebased so the first point of the window equals 100.
    #[default]
    Base100,
    /// Percentage change since the first point of the window.
    DeltaPct,
}

impl DisplayMode {
    /// Short label used by controls and axis captions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Base100 => "base100",
            Self::DeltaPct => "delta",
        }
    }

    /// Returns true for lenses that rescale against a base value.
    #[must_use]
    pub const fn is_relative(self) -> bool {
        !matches!(self, Self::Real)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayMode {
    type Err = BitacoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" => Ok(Self::Real),
            "base100" | "base 100" => Ok(Self::Base100),
            "delta" | "deltapct" | "delta%" => Ok(Self::DeltaPct),
            other => Err(BitacoraError::InvalidArg(format!(
                "unknown display mode '{other}'"
            ))),
        }
    }
}

/// Trailing window selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PeriodToken {
    /// One calendar month.
    M1,
    /// Three calendar months.
    M3,
    /// Six calendar months.
    M6,
    /// Since January 1 of the current year.
    #[default]
    Ytd,
    /// One calendar year.
    Y1,
    /// The configured long horizon (15 years by default).
    All,
}

impl PeriodToken {
    /// Every token, in control order.
    pub const ALL_TOKENS: [Self; 6] = [Self::M1, Self::M3, Self::M6, Self::Ytd, Self::Y1, Self::All];

    /// Label as shown on period controls.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::M1 => "1M",
            Self::M3 => "3M",
            Self::M6 => "6M",
            Self::Ytd => "YTD",
            Self::Y1 => "1Y",
            Self::All => "All",
        }
    }

    /// Trailing calendar months for fixed-length tokens; `None` for YTD and All.
    #[must_use]
    pub const fn months(self) -> Option<u32> {
        match self {
            Self::M1 => Some(1),
            Self::M3 => Some(3),
            Self::M6 => Some(6),
            Self::Y1 => Some(12),
            Self::Ytd | Self::All => None,
        }
    }
}

impl fmt::Display for PeriodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PeriodToken {
    type Err = BitacoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Self::ALL_TOKENS
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(t))
            .ok_or_else(|| BitacoraError::InvalidArg(format!("unknown period '{t}'")))
    }
}

/// The only mutable state driving recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineState {
    /// Series currently shown.
    pub active: BTreeSet<SeriesKey>,
    /// Trailing window.
    pub period: PeriodToken,
    /// Display lens.
    pub mode: DisplayMode,
}

impl PipelineState {
    /// Build a state with the given active keys.
    pub fn new<I>(active: I, period: PeriodToken, mode: DisplayMode) -> Self
    where
        I: IntoIterator<Item = SeriesKey>,
    {
        Self {
            active: active.into_iter().collect(),
            period,
            mode,
        }
    }

    /// Returns true if `key` is active.
    #[must_use]
    pub fn is_active(&self, key: SeriesKey) -> bool {
        self.active.contains(&key)
    }
}
