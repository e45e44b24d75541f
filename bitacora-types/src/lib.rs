//! Bitacora data transfer objects, configuration primitives and errors.
#![warn(missing_docs)]

mod config;
mod error;
mod series;
mod state;

pub use config::{Alignment, BitacoraConfig, FailurePolicy, Granularity};
pub use error::BitacoraError;
pub use series::{Point, Series, SeriesKey, SeriesMeta, ValueUnit};
pub use state::{DisplayMode, PeriodToken, PipelineState};
