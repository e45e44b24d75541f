//! Re-export of foundational types from `bitacora-types`.
// Consolidated so downstream crates can depend on `bitacora-core` only

pub use bitacora_types::BitacoraError;
pub use bitacora_types::{Alignment, BitacoraConfig, FailurePolicy, Granularity};
pub use bitacora_types::{DisplayMode, PeriodToken, PipelineState};
pub use bitacora_types::{Point, Series, SeriesKey, SeriesMeta, ValueUnit};
