#![allow(dead_code)]
#![allow(clippy::type_complexity)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bitacora::{BitacoraError, FetchWindow, Point, Series, SeriesSource};
use tokio::time::{Duration, sleep};

/// In-memory source used by integration tests.
///
/// Answers with a fixed series (clipped to the requested window), a scripted
/// error, or whatever `fetch_fn` returns. Counts every call.
pub struct ScriptedSource {
    pub name: &'static str,
    pub points: Vec<Point>,
    pub error: Option<BitacoraError>,
    pub delay: Duration,
    // Optional per-call delay, e.g. to make an older window resolve last.
    pub delay_fn: Option<Arc<dyn Fn(&FetchWindow) -> Duration + Send + Sync>>,
    pub fetch_fn: Option<Arc<dyn Fn(&FetchWindow) -> Result<Series, BitacoraError> + Send + Sync>>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn builder() -> ScriptedSourceBuilder {
        ScriptedSourceBuilder::new()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeriesSource for ScriptedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Scripted"
    }

    async fn fetch(&self, window: &FetchWindow) -> Result<Series, BitacoraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_fn.as_ref().map_or(self.delay, |f| f(window));
        if !delay.is_zero() {
            sleep(delay).await;
        }
        if let Some(f) = &self.fetch_fn {
            return f(window);
        }
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        Ok(self
            .points
            .iter()
            .copied()
            .filter(|p| window.contains(p.date))
            .collect())
    }
}

pub struct ScriptedSourceBuilder {
    inner: ScriptedSource,
}

impl ScriptedSourceBuilder {
    pub fn new() -> Self {
        Self {
            inner: ScriptedSource {
                name: "scripted",
                points: vec![],
                error: None,
                delay: Duration::ZERO,
                delay_fn: None,
                fetch_fn: None,
                calls: Arc::new(AtomicUsize::new(0)),
            },
        }
    }

    pub fn name(mut self, name: &'static str) -> Self {
        self.inner.name = name;
        self
    }

    pub fn points(mut self, points: Vec<Point>) -> Self {
        self.inner.points = points;
        self
    }

    pub fn fails_with(mut self, e: BitacoraError) -> Self {
        self.inner.error = Some(e);
        self
    }

    pub fn delay(mut self, d: Duration) -> Self {
        self.inner.delay = d;
        self
    }

    pub fn delay_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&FetchWindow) -> Duration + Send + Sync + 'static,
    {
        self.inner.delay_fn = Some(Arc::new(f));
        self
    }

    pub fn fetch_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&FetchWindow) -> Result<Series, BitacoraError> + Send + Sync + 'static,
    {
        self.inner.fetch_fn = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Arc<ScriptedSource> {
        Arc::new(self.inner)
    }
}
