// Re-export helpers so tests can `use helpers::*;`
#![allow(dead_code)]

pub mod scripted;

pub use scripted::{ScriptedSource, ScriptedSourceBuilder};

use std::sync::{Arc, Mutex};

use bitacora::{
    Bitacora, BitacoraBuilder, ErrorNotice, FixedClock, PipelineState, Point, RenderFrame,
    Renderer, SeriesKey, SeriesMeta, SeriesSource,
};
use chrono::NaiveDate;

// ---------- Lightweight fixtures and helpers for tests ----------

pub const UF: SeriesKey = SeriesKey::new("uf");
pub const USD: SeriesKey = SeriesKey::new("usd");
pub const IPSA: SeriesKey = SeriesKey::new("ipsa");

/// Construct a calendar date for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("invalid date")
}

/// Build points from `(date, value)` tuples.
pub fn pts(raw: &[(NaiveDate, f64)]) -> Vec<Point> {
    raw.iter().map(|(date, v)| Point::new(*date, *v)).collect()
}

/// One point per calendar day in `[start, end]`, starting at `v0` and rising by `step`.
pub fn daily(start: NaiveDate, end: NaiveDate, v0: f64, step: f64) -> Vec<Point> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .enumerate()
        .map(|(i, day)| Point::new(day, v0 + step * i as f64))
        .collect()
}

pub fn meta(label: &str) -> SeriesMeta {
    SeriesMeta::new(label, "#000000")
}

/// Builder pinned to `today`, with the given sources registered in order.
pub fn builder_at(today: NaiveDate, sources: &[(SeriesKey, Arc<dyn SeriesSource>)]) -> BitacoraBuilder {
    sources.iter().fold(
        Bitacora::builder().clock(Arc::new(FixedClock(today))),
        |b, (key, src)| b.with_source(*key, meta(key.as_str()), src.clone()),
    )
}

/// Everything the controller told the renderer, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Loading(PipelineState),
    Published(RenderFrame),
    Error(ErrorNotice),
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<RenderFrame> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Published(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<ErrorNotice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn loadings(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Loading(_)))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn loading(&self, state: &PipelineState) {
        self.events.lock().unwrap().push(Event::Loading(state.clone()));
    }

    fn publish(&self, frame: &RenderFrame) {
        self.events.lock().unwrap().push(Event::Published(frame.clone()));
    }

    fn error(&self, notice: &ErrorNotice) {
        self.events.lock().unwrap().push(Event::Error(notice.clone()));
    }
}
