//! Calendar-date helpers used when decoding upstream payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Convert an upstream date or timestamp string to a UTC calendar date.
///
/// Accepted shapes, in order:
/// - RFC 3339 timestamps with offset (`2024-01-02T03:00:00.000Z`), converted to UTC first;
/// - naive timestamps (`2024-01-02T03:00:00`), taken as UTC;
/// - plain dates (`2024-01-02`).
///
/// Returns `None` for anything else.
#[must_use]
pub fn utc_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
