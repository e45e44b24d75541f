//! Boundary to the rendering layer.
//!
//! The pipeline never paints anything itself. It hands a finished
//! [`RenderFrame`] (or an [`ErrorNotice`]) to whatever implements [`Renderer`]:
//! a chart widget, a terminal table, or a recorder in tests.

use chrono::NaiveDate;

use bitacora_core::{BitacoraError, DisplayMode, PipelineState, Series, SeriesKey, SeriesMeta};

/// One registered series, ready to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSeries {
    /// Series key.
    pub key: SeriesKey,
    /// Legend label, color and unit.
    pub meta: SeriesMeta,
    /// Whether the series is active in the current state.
    pub visible: bool,
    /// Points to draw, in the applied lens. Empty when not visible.
    pub plotted: Series,
    /// Filled and windowed real values, for tooltips. Empty when not visible.
    pub real: Series,
    /// Lens actually applied; `Real` when a relative lens was degenerate.
    pub applied: DisplayMode,
    /// Base value of the relative lens, if one was applied.
    pub base: Option<f64>,
}

/// Everything a renderer needs to draw one state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// State this frame was computed for.
    pub state: PipelineState,
    /// First date of the window.
    pub cutoff: NaiveDate,
    /// Last date of the window.
    pub today: NaiveDate,
    /// Union of the plotted dates of every visible series.
    pub axis: Vec<NaiveDate>,
    /// Every registered series, in registration order.
    pub series: Vec<RenderedSeries>,
    /// Source failures and per-series problems that did not stop the render.
    pub warnings: Vec<BitacoraError>,
}

/// One line of a tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    /// Series key.
    pub key: SeriesKey,
    /// Legend label.
    pub label: String,
    /// Legend color.
    pub color: String,
    /// Value in the applied lens.
    pub plotted: f64,
    /// Real value on the same date.
    pub real: f64,
}

impl RenderFrame {
    /// Rendered series for `key`.
    #[must_use]
    pub fn get(&self, key: SeriesKey) -> Option<&RenderedSeries> {
        self.series.iter().find(|s| s.key == key)
    }

    /// Visible series, in registration order.
    pub fn visible(&self) -> impl Iterator<Item = &RenderedSeries> {
        self.series.iter().filter(|s| s.visible)
    }

    /// Real value of `key` on `date`, if the series is visible and has a point there.
    #[must_use]
    pub fn value_at(&self, key: SeriesKey, date: NaiveDate) -> Option<f64> {
        self.get(key)
            .filter(|s| s.visible)
            .and_then(|s| s.real.value_at(date))
    }

    /// Tooltip rows for `date`: every visible series with a point on that date.
    #[must_use]
    pub fn tooltip(&self, date: NaiveDate) -> Vec<TooltipRow> {
        self.visible()
            .filter_map(|s| {
                let plotted = s.plotted.value_at(date)?;
                let real = s.real.value_at(date)?;
                Some(TooltipRow {
                    key: s.key,
                    label: s.meta.label.clone(),
                    color: s.meta.color.clone(),
                    plotted,
                    real,
                })
            })
            .collect()
    }

    /// Returns true if nothing is plotted.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.visible().all(|s| s.plotted.is_empty())
    }
}

/// What the renderer shows in place of the chart when a load or recompute fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNotice {
    /// User-facing message.
    pub message: String,
    /// Whether a retry may help.
    pub retryable: bool,
    /// The underlying error.
    pub error: BitacoraError,
    /// State that failed.
    pub state: PipelineState,
}

impl ErrorNotice {
    /// Build a notice from an error and the state that produced it.
    #[must_use]
    pub fn new(error: BitacoraError, state: PipelineState) -> Self {
        Self {
            message: error.user_message(),
            retryable: error.is_retryable(),
            error,
            state,
        }
    }
}

/// Rendering layer driven by the controller.
///
/// Calls are made outside any controller lock, so implementations may query
/// the controller from inside a callback.
pub trait Renderer: Send + Sync {
    /// A load started. Default: do nothing.
    fn loading(&self, _state: &PipelineState) {}

    /// A new frame is ready.
    fn publish(&self, frame: &RenderFrame);

    /// The current state could not be rendered.
    fn error(&self, notice: &ErrorNotice);
}

/// Renderer that ignores everything. Useful when driving the controller
/// purely for its frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn publish(&self, _frame: &RenderFrame) {}

    fn error(&self, _notice: &ErrorNotice) {}
}
