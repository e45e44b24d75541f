use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use bitacora_core::{BitacoraError, DisplayMode, PeriodToken, PipelineState, SeriesKey};

use crate::Bitacora;
use crate::fetch::RawSnapshot;
use crate::render::{ErrorNotice, RenderFrame, Renderer};

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last recompute produced a frame.
    Ready,
    /// The last load or recompute failed.
    Error,
}

#[derive(Default)]
struct Inner {
    phase: Phase,
    state: PipelineState,
    raw: Option<Arc<RawSnapshot>>,
    // bumped by every load; a load finishing under an older value is stale
    generation: u64,
    // bumped by every recompute; publishes never go backwards
    revision: u64,
    frame: Option<RenderFrame>,
    last_error: Option<BitacoraError>,
}

enum Outcome {
    Frame(RenderFrame),
    Failed(ErrorNotice),
}

/// Owns the pipeline state and drives fetches, recomputes and renderer updates.
///
/// - `load`/`reload` fetch every source for the current period.
/// - Mode and visibility changes recompute from cached raw data; they never
///   re-fetch.
/// - A period change re-fetches only when its window is not covered by the
///   cached one.
///
/// Loads are tagged with a generation number. A load that resolves after a
/// newer one started is discarded with `Superseded` and never published.
pub struct PipelineController {
    bitacora: Arc<Bitacora>,
    renderer: Arc<dyn Renderer>,
    inner: Mutex<Inner>,
    // last revision handed to the renderer
    published: AtomicU64,
}

impl PipelineController {
    /// Create a controller with every registered series active, `YTD` and `Base100`.
    #[must_use]
    pub fn new(bitacora: Arc<Bitacora>, renderer: Arc<dyn Renderer>) -> Self {
        let state = PipelineState::new(
            bitacora.keys(),
            PeriodToken::default(),
            DisplayMode::default(),
        );
        Self {
            bitacora,
            renderer,
            inner: Mutex::new(Inner {
                state,
                ..Inner::default()
            }),
            published: AtomicU64::new(0),
        }
    }

    /// Replace the initial state.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `state` activates a key that is not registered.
    pub fn with_state(self, state: PipelineState) -> Result<Self, BitacoraError> {
        for key in &state.active {
            self.bitacora.check_key(*key)?;
        }
        self.lock().state = state;
        Ok(self)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The orchestrator behind this controller.
    #[must_use]
    pub fn bitacora(&self) -> &Arc<Bitacora> {
        &self.bitacora
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.lock().state.clone()
    }

    /// Last frame computed, if any.
    #[must_use]
    pub fn frame(&self) -> Option<RenderFrame> {
        self.lock().frame.clone()
    }

    /// Error of the last failed load or recompute, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<BitacoraError> {
        self.lock().last_error.clone()
    }

    /// Number of loads started so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Cached raw snapshot, if the last load succeeded.
    #[must_use]
    pub fn raw(&self) -> Option<Arc<RawSnapshot>> {
        self.lock().raw.clone()
    }

    /// Real value of `key` on `date` in the last frame.
    #[must_use]
    pub fn value_at(&self, key: SeriesKey, date: NaiveDate) -> Option<f64> {
        self.lock()
            .frame
            .as_ref()
            .and_then(|f| f.value_at(key, date))
    }

    /// Fetch every source for the current period and render.
    ///
    /// # Errors
    /// - `Superseded` when another load started before this one finished; the
    ///   result is dropped without touching the renderer.
    /// - The fetch error (after notifying the renderer) when the load fails.
    /// - `NoDataInRange` (after notifying the renderer) when the fetched data
    ///   has nothing to show for the current state.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "bitacora::controller::load", skip(self))
    )]
    pub async fn load(&self) -> Result<RenderFrame, BitacoraError> {
        let (generation, state) = {
            let mut g = self.lock();
            g.generation += 1;
            g.phase = Phase::Loading;
            (g.generation, g.state.clone())
        };
        self.renderer.loading(&state);

        let window = self.bitacora.window_for(state.period);
        let res = self.bitacora.fetch_raw(window).await;

        let outcome = {
            let mut g = self.lock();
            if g.generation != generation {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    generation,
                    current = g.generation,
                    "discarding stale load"
                );
                return Err(BitacoraError::Superseded { generation });
            }
            match res {
                Ok(raw) => {
                    g.raw = Some(Arc::new(raw));
                    self.recompute(&mut g)
                }
                Err(e) => {
                    g.raw = None;
                    Self::fail(&mut g, e)
                }
            }
        };
        self.emit(outcome)
    }

    /// Same as [`load`](Self::load); kept as the explicit retry entry point.
    ///
    /// # Errors
    /// Same as [`load`](Self::load).
    pub async fn reload(&self) -> Result<RenderFrame, BitacoraError> {
        self.load().await
    }

    /// Switch the trailing window.
    ///
    /// Recomputes from cached data when the cached fetch window covers the new
    /// one; otherwise starts a new load.
    ///
    /// # Errors
    /// Same as [`load`](Self::load) when a fetch is needed; `NoDataInRange`
    /// when a recompute has nothing to show.
    pub async fn set_period(&self, period: PeriodToken) -> Result<RenderFrame, BitacoraError> {
        let window = self.bitacora.window_for(period);
        let outcome = {
            let mut g = self.lock();
            g.state.period = period;
            let covered = g.phase != Phase::Loading
                && g.raw.as_ref().is_some_and(|raw| raw.covers(&window));
            if covered {
                Some(self.recompute(&mut g))
            } else {
                None
            }
        };
        match outcome {
            Some(o) => self.emit(o),
            None => self.load().await,
        }
    }

    /// Switch the display lens. Never fetches.
    ///
    /// Returns the new frame when raw data is cached and no load is in flight;
    /// otherwise the change is applied by the next load.
    ///
    /// # Errors
    /// `NoDataInRange` when the recompute has nothing to show.
    pub fn set_mode(&self, mode: DisplayMode) -> Result<Option<RenderFrame>, BitacoraError> {
        self.update(|s| s.mode = mode)
    }

    /// Show or hide one series. Never fetches.
    ///
    /// # Errors
    /// `InvalidArg` for an unknown key; `NoDataInRange` when the recompute has
    /// nothing to show.
    pub fn set_active(
        &self,
        key: SeriesKey,
        active: bool,
    ) -> Result<Option<RenderFrame>, BitacoraError> {
        self.bitacora.check_key(key)?;
        self.update(|s| {
            if active {
                s.active.insert(key);
            } else {
                s.active.remove(&key);
            }
        })
    }

    /// Flip the visibility of one series. Never fetches.
    ///
    /// # Errors
    /// Same as [`set_active`](Self::set_active).
    pub fn toggle(&self, key: SeriesKey) -> Result<Option<RenderFrame>, BitacoraError> {
        self.bitacora.check_key(key)?;
        self.update(|s| {
            if !s.active.remove(&key) {
                s.active.insert(key);
            }
        })
    }

    fn update<F>(&self, change: F) -> Result<Option<RenderFrame>, BitacoraError>
    where
        F: FnOnce(&mut PipelineState),
    {
        let outcome = {
            let mut g = self.lock();
            change(&mut g.state);
            let settled = matches!(g.phase, Phase::Ready | Phase::Error);
            if settled && g.raw.is_some() {
                Some(self.recompute(&mut g))
            } else {
                None
            }
        };
        outcome.map(|o| self.emit(o)).transpose()
    }

    fn recompute(&self, g: &mut Inner) -> (u64, Outcome) {
        let Some(raw) = g.raw.clone() else {
            return Self::fail(g, BitacoraError::no_data("no data loaded"));
        };
        match self.bitacora.run_pipeline(&raw, &g.state) {
            Ok(frame) => {
                g.revision += 1;
                g.phase = Phase::Ready;
                g.frame = Some(frame.clone());
                g.last_error = None;
                (g.revision, Outcome::Frame(frame))
            }
            Err(e) => Self::fail(g, e),
        }
    }

    fn fail(g: &mut Inner, e: BitacoraError) -> (u64, Outcome) {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %e, "pipeline entered error state");
        g.revision += 1;
        g.phase = Phase::Error;
        g.frame = None;
        g.last_error = Some(e.clone());
        (g.revision, Outcome::Failed(ErrorNotice::new(e, g.state.clone())))
    }

    // Called without any lock held; renderers may call back into the controller.
    fn emit(&self, (revision, outcome): (u64, Outcome)) -> Result<RenderFrame, BitacoraError> {
        let fresh = self.published.fetch_max(revision, Ordering::AcqRel) < revision;
        match outcome {
            Outcome::Frame(frame) => {
                if fresh {
                    self.renderer.publish(&frame);
                }
                Ok(frame)
            }
            Outcome::Failed(notice) => {
                if fresh {
                    self.renderer.error(&notice);
                }
                Err(notice.error)
            }
        }
    }
}
