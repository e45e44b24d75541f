//! Bitacora turns several irregular financial feeds into one comparable chart.
//!
//! Overview
//! - Fetches every registered series concurrently, each under its own timeout.
//! - Aligns the series on a shared date axis, closes short gaps, cuts a
//!   trailing window and rescales into a display lens (real, base 100, delta %).
//! - Hands finished frames to a [`Renderer`]; painting stays outside this crate.
//!
//! Key behaviors and trade-offs
//! - Failure policy:
//!   - `Degrade` (default): a failed source becomes an empty series plus a
//!     warning; fewer lines beat a blank chart.
//!   - `AllOrNothing`: any failed source fails the load.
//! - Alignment:
//!   - `Union` (default): every date any series has; series stay sparse.
//!   - `Intersection`: only dates every active series has; stricter
//!     comparisons, fewer points.
//! - Granularity: `Monthly` collapses each series to its last value per
//!   month before alignment, so daily indicators and monthly price rows share
//!   first-of-month dates.
//! - Forward fill only bridges short gaps (`max_gap_days`, default 2): weekends
//!   and holidays are closed, longer outages stay visible.
//! - The pipeline is synchronous. Mode and visibility changes re-run it against
//!   cached raw data; only a period change that reaches past the cached window
//!   triggers a new fetch.
//! - Last state wins: a load that resolves after a newer one started is
//!   discarded, never published.
//!
//! Examples
//! Building an orchestrator and driving it with a controller:
//! ```rust,ignore
//! use std::sync::Arc;
//! use bitacora::{Bitacora, DisplayMode, PeriodToken, PipelineController, SeriesKey, SeriesMeta};
//! use bitacora_mock::MockSource;
//!
//! let bitacora = Bitacora::builder()
//!     .with_source(SeriesKey::new("uf"), SeriesMeta::new("UF", "#63b3ed"), Arc::new(MockSource::new("uf")))
//!     .with_source(SeriesKey::new("usd"), SeriesMeta::new("USD/CLP", "#f6ad55"), Arc::new(MockSource::new("dolar")))
//!     .build()?;
//!
//! let controller = PipelineController::new(Arc::new(bitacora), Arc::new(MyChart::default()));
//! controller.load().await?;
//! controller.set_mode(DisplayMode::DeltaPct)?;        // recompute, no fetch
//! controller.set_period(PeriodToken::All).await?;     // wider window, fetches again
//! ```
//!
//! Running a single pass without a controller:
//! ```rust,ignore
//! let raw = bitacora.fetch_for(PeriodToken::Ytd).await?;
//! let frame = bitacora.run_pipeline(&raw, &state)?;
//! for s in frame.visible() {
//!     println!("{}: {} points", s.meta.label, s.plotted.len());
//! }
//! ```
#![warn(missing_docs)]

mod controller;
pub(crate) mod core;
mod fetch;
mod pipeline;
mod render;
mod util;

pub use bitacora_core::{
    Alignment, BitacoraConfig, BitacoraError, DisplayMode, FailurePolicy, FetchWindow,
    Granularity, PeriodToken, PipelineState, Point, Series, SeriesKey, SeriesMeta, SeriesSource,
    ValueUnit,
};
pub use controller::{Phase, PipelineController};
pub use crate::core::{Bitacora, BitacoraBuilder, Clock, FixedClock, SourceEntry, SystemClock, tag_err};
pub use fetch::RawSnapshot;
pub use render::{ErrorNotice, NullRenderer, RenderFrame, RenderedSeries, Renderer, TooltipRow};
pub use util::{collapse_errors, join_with_deadline};
