//! bitacora-core
//!
//! Core types, traits, and utilities shared across the bitacora workspace.
//!
//! - `types`: re-exports of the data model (points, series, state, config, errors).
//! - `source`: the `SeriesSource` trait and the `FetchWindow` handed to sources.
//! - `timeseries`: the synchronous alignment stages, leaf first:
//!   optionally bucket by month, merge onto a shared axis, forward-fill short gaps, cut a trailing window,
//!   and rescale into a display lens.
//!
//! Every stage is a pure function over immutable [`Series`] values; none of
//! them touch the network or hold locks, so they can be re-run on every state
//! change.
#![warn(missing_docs)]

/// Source trait and fetch window.
pub mod source;
/// Time-series alignment stages.
pub mod timeseries;
pub mod types;

pub use source::{FetchWindow, SeriesSource};
pub use timeseries::fill::forward_fill;
pub use timeseries::merge::{AlignedSet, intersect_aligned, merge_aligned};
pub use timeseries::normalize::{Normalized, base_value, normalize};
pub use timeseries::resample::{month_start, monthly_last, resample};
pub use timeseries::util::utc_calendar_date;
pub use timeseries::window::{cutoff, filter_period, filter_since};
pub use types::*;
