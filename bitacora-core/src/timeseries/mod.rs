//! Time-series stages shared by sources and the orchestrator.
//!
//! Modules include:
//! - `merge`: build a shared date axis and project each series onto it
//! - `fill`: forward-fill short calendar gaps
//! - `window`: compute a period cutoff and trim a series to it
//! - `normalize`: rescale into the Real / Base100 / Delta% lenses
//! - `resample`: collapse a series to one point per month
//! - `util`: calendar-date conversion helpers for payload decoding
/// Bounded forward fill of short gaps.
pub mod fill;
/// Shared date axis construction.
pub mod merge;
/// Display-lens rescaling.
pub mod normalize;
/// Calendar bucketing.
pub mod resample;
/// Calendar helpers.
pub mod util;
/// Trailing period windows.
pub mod window;
