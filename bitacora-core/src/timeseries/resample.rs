use chrono::{Datelike, NaiveDate};

use crate::{Granularity, Point, Series};

/// First day of the month containing `date`.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Group points by a bucket function and keep the last value of each bucket,
/// dated at the bucket key.
fn resample_by<F>(series: &Series, bucket_of: F) -> Series
where
    F: Fn(NaiveDate) -> NaiveDate,
{
    let mut out: Vec<Point> = Vec::new();
    for p in series {
        let bucket = bucket_of(p.date);
        match out.last_mut() {
            Some(last) if last.date == bucket => last.value = p.value,
            _ => out.push(Point::new(bucket, p.value)),
        }
    }
    Series::new(out)
}

/// Collapse a series to one point per month, dated the first of the month,
/// carrying the last observation of that month.
#[must_use]
pub fn monthly_last(series: &Series) -> Series {
    resample_by(series, month_start)
}

/// Apply the configured sampling step.
#[must_use]
pub fn resample(series: &Series, granularity: Granularity) -> Series {
    match granularity {
        Granularity::Monthly => monthly_last(series),
        _ => series.clone(),
    }
}
