use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::{Series, SeriesKey};

/// Series projected onto a shared, ascending, duplicate-free date axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSet {
    /// Shared date axis.
    pub axis: Vec<NaiveDate>,
    /// Per-key projections, in input order. Each is a subset of `axis`.
    pub series: Vec<(SeriesKey, Series)>,
}

impl AlignedSet {
    /// Projection for `key`, if present.
    #[must_use]
    pub fn get(&self, key: SeriesKey) -> Option<&Series> {
        self.series.iter().find(|(k, _)| *k == key).map(|(_, s)| s)
    }
}

/// Align series on the union of their dates.
///
/// - The axis is the sorted, de-duplicated union of every input date.
/// - Each series keeps only its own points; absent dates are omitted, never
///   fabricated, so projections may be sparser than the axis.
/// - Empty inputs stay in the output as empty projections.
/// - Duplicate keys: the first appearance wins.
pub fn merge_aligned<I>(inputs: I) -> AlignedSet
where
    I: IntoIterator<Item = (SeriesKey, Series)>,
{
    let mut axis: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut series: Vec<(SeriesKey, Series)> = Vec::new();
    for (key, s) in inputs {
        if series.iter().any(|(k, _)| *k == key) {
            continue;
        }
        axis.extend(s.dates());
        series.push((key, s));
    }
    AlignedSet {
        axis: axis.into_iter().collect(),
        series,
    }
}

/// Align series on the dates shared by every non-empty input.
///
/// Empty inputs do not constrain the axis and come back as empty projections.
/// Every non-empty projection is restricted to exactly the returned axis.
pub fn intersect_aligned<I>(inputs: I) -> AlignedSet
where
    I: IntoIterator<Item = (SeriesKey, Series)>,
{
    let union = merge_aligned(inputs);
    let non_empty = union.series.iter().filter(|(_, s)| !s.is_empty()).count();

    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for (_, s) in &union.series {
        for date in s.dates() {
            *counts.entry(date).or_insert(0) += 1;
        }
    }
    let axis: Vec<NaiveDate> = counts
        .into_iter()
        .filter_map(|(date, n)| (n == non_empty).then_some(date))
        .collect();

    #[cfg(feature = "tracing")]
    if axis.is_empty() && non_empty > 0 {
        tracing::debug!(inputs = non_empty, "intersection of series dates is empty");
    }

    let keep: BTreeSet<NaiveDate> = axis.iter().copied().collect();
    let series = union
        .series
        .into_iter()
        .map(|(k, s)| (k, s.retain(|p| keep.contains(&p.date))))
        .collect();
    AlignedSet { axis, series }
}
