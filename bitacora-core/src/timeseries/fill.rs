use chrono::Days;

use crate::{Point, Series};

/// Close short calendar gaps by carrying the preceding value forward.
///
/// For each adjacent pair of points `d` days apart with `1 < d <= max_gap_days + 1`,
/// one synthetic point per missing day is inserted with the earlier point's
/// value. Longer gaps are left open. Empty and single-point inputs come back
/// unchanged.
#[must_use]
pub fn forward_fill(series: &Series, max_gap_days: u32) -> Series {
    let pts = series.points();
    if pts.len() < 2 {
        return series.clone();
    }
    let limit = i64::from(max_gap_days) + 1;

    let mut out: Vec<Point> = Vec::with_capacity(pts.len());
    out.push(pts[0]);
    for pair in pts.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let gap = (curr.date - prev.date).num_days();
        if gap > 1 && gap <= limit {
            for step in 1..gap.unsigned_abs() {
                if let Some(date) = prev.date.checked_add_days(Days::new(step)) {
                    out.push(Point::new(date, prev.value));
                }
            }
        }
        out.push(curr);
    }
    Series::new(out)
}
