//! bitacora-sources
//!
//! HTTP-backed implementations of `SeriesSource`:
//! - `IndicatorSource`: yearly JSON documents of dated indicator values;
//! - `PriceCsvSource`: delimited daily or monthly price rows, optionally
//!   through a proxy.
//!
//! Both go through the `HttpFetch` adapter so tests can swap the network out,
//! and both clip their output to the requested `FetchWindow`.
#![warn(missing_docs)]

/// HTTP adapter trait and the production adapter backed by `reqwest`.
pub mod adapter;
/// Indicator JSON source.
pub mod indicator;
/// Ready-made dashboards.
pub mod presets;
/// Delimited price-row source.
pub mod price_csv;

pub use adapter::{HttpFetch, HttpReply, RealAdapter};
pub use indicator::{INDICATOR_BASE_URL, IndicatorSource, parse_indicator_json};
pub use presets::{
    Preset, PresetSeries, chile_home, chile_tradfi, commodities, global_indices,
};
pub use price_csv::{DEFAULT_PROXY, PRICE_CSV_BASE_URL, PriceCsvSource, parse_price_csv};
