use crate::{DisplayMode, Series};

/// Result of rescaling a series into a display lens.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Rescaled points (or the input, unchanged, when `applied` is `Real`).
    pub series: Series,
    /// Lens that was actually applied.
    pub applied: DisplayMode,
    /// Base value used by relative lenses.
    pub base: Option<f64>,
}

impl Normalized {
    /// True when a relative lens was requested but could not be applied.
    #[must_use]
    pub fn is_degenerate(&self, requested: DisplayMode) -> bool {
        requested != self.applied
    }
}

/// First usable base value: finite and non-zero.
#[must_use]
pub fn base_value(series: &Series) -> Option<f64> {
    series
        .iter()
        .map(|p| p.value)
        .find(|v| v.is_finite() && *v != 0.0)
}

/// Rescale `series` into `mode`.
///
/// - `Real`: identity.
/// - `Base100`: `value / v0 * 100`, so the base point reads exactly 100.
/// - `DeltaPct`: `(value - v0) / v0 * 100`, so the base point reads exactly 0.
///
/// `v0` is the first usable base value. Without one, the series comes back
/// unchanged with `applied == Real`.
#[must_use]
pub fn normalize(series: &Series, mode: DisplayMode) -> Normalized {
    let unchanged = || Normalized {
        series: series.clone(),
        applied: DisplayMode::Real,
        base: None,
    };
    let Some(base) = base_value(series).filter(|_| mode.is_relative()) else {
        return unchanged();
    };
    let rescaled = match mode {
        DisplayMode::Real => return unchanged(),
        DisplayMode::Base100 => series.map_values(|v| v / base * 100.0),
        DisplayMode::DeltaPct => series.map_values(|v| (v - base) / base * 100.0),
    };
    Normalized {
        series: rescaled,
        applied: mode,
        base: Some(base),
    }
}
