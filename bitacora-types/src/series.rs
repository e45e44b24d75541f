//! Point and series primitives shared by every stage of the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Calendar date (UTC, day granularity).
    pub date: NaiveDate,
    /// Observed value. Only finite values survive into a [`Series`].
    pub value: f64,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An immutable sequence of points, strictly ascending by date.
///
/// Invariants upheld by every constructor:
/// - dates are strictly ascending (no duplicates);
/// - every value is finite.
///
/// Transformations never mutate a series in place; they build a new one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Point>", into = "Vec<Point>")]
pub struct Series {
    points: Vec<Point>,
}

impl Series {
    /// Build a series from points in any order.
    ///
    /// Non-finite values are dropped. Points are sorted by date and, when a date
    /// repeats, the latest-seen point wins.
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let mut raw: Vec<Point> = points.into_iter().filter(|p| p.value.is_finite()).collect();
        // stable: equal dates keep arrival order, so the last one is the latest seen
        raw.sort_by_key(|p| p.date);
        let mut out: Vec<Point> = Vec::with_capacity(raw.len());
        for p in raw {
            match out.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => out.push(p),
            }
        }
        Self { points: out }
    }

    /// An empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Borrow the points in ascending date order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterate points in ascending date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Iterate dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when the series holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest point.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Latest point.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Value observed exactly on `date`, if any.
    #[must_use]
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Apply `f` to every value, keeping dates. Results that are not finite are dropped.
    #[must_use]
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.date, f(p.value)))
                .filter(|p| p.value.is_finite())
                .collect(),
        }
    }

    /// Keep points matching `keep`.
    #[must_use]
    pub fn retain<F>(&self, keep: F) -> Self
    where
        F: Fn(&Point) -> bool,
    {
        Self {
            points: self.points.iter().copied().filter(|p| keep(p)).collect(),
        }
    }

    /// Consume the series and return its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl From<Vec<Point>> for Series {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl From<Series> for Vec<Point> {
    fn from(s: Series) -> Self {
        s.points
    }
}

impl FromIterator<Point> for Series {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Typed key identifying a series across the pipeline (e.g. `"uf"`, `"usd"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesKey(pub &'static str);

impl SeriesKey {
    /// Construct a new typed series key from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the inner static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<SeriesKey> for &'static str {
    fn from(k: SeriesKey) -> Self {
        k.0
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// How the real value of a series should be read by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ValueUnit {
    /// Monetary amount (e.g. CLP per UF, CLP per USD).
    #[default]
    Currency,
    /// Index points.
    IndexPoints,
    /// Traded price of an instrument.
    Price,
}

/// Display metadata attached to a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    /// Legend label.
    pub label: String,
    /// CSS-style color, e.g. `#63b3ed`.
    pub color: String,
    /// Unit of the real value.
    pub unit: ValueUnit,
}

impl SeriesMeta {
    /// Build metadata with the default unit.
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            unit: ValueUnit::default(),
        }
    }

    /// Override the unit.
    #[must_use]
    pub const fn with_unit(mut self, unit: ValueUnit) -> Self {
        self.unit = unit;
        self
    }
}
