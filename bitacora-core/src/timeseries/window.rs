use chrono::{Datelike, Months, NaiveDate};

use crate::{PeriodToken, Series};

/// First date kept by `period` when evaluated on `today`.
///
/// - `1M`, `3M`, `6M`, `1Y`: calendar-month arithmetic; a day that does not
///   exist in the target month clamps to that month's last day
///   (March 31 minus one month is February 28 or 29).
/// - `YTD`: January 1 of `today`'s year.
/// - `All`: `all_horizon_years` calendar years before `today`.
#[must_use]
pub fn cutoff(period: PeriodToken, today: NaiveDate, all_horizon_years: u32) -> NaiveDate {
    let months_back = match period {
        PeriodToken::Ytd => return today.with_ordinal(1).unwrap_or(today),
        PeriodToken::All => all_horizon_years.saturating_mul(12),
        other => other.months().unwrap_or(0),
    };
    today
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(NaiveDate::MIN)
}

/// Keep points dated on or after `since`.
#[must_use]
pub fn filter_since(series: &Series, since: NaiveDate) -> Series {
    series.retain(|p| p.date >= since)
}

/// Trim `series` to the trailing window selected by `period`.
///
/// An empty result is a legitimate "no data in range" outcome, left to the
/// caller to report.
#[must_use]
pub fn filter_period(
    series: &Series,
    period: PeriodToken,
    today: NaiveDate,
    all_horizon_years: u32,
) -> Series {
    filter_since(series, cutoff(period, today, all_horizon_years))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_arithmetic_clamps_to_month_end() {
        assert_eq!(cutoff(PeriodToken::M1, d(2024, 3, 31), 15), d(2024, 2, 29));
        assert_eq!(cutoff(PeriodToken::M1, d(2023, 3, 31), 15), d(2023, 2, 28));
        assert_eq!(cutoff(PeriodToken::M6, d(2024, 8, 31), 15), d(2024, 2, 29));
    }

    #[test]
    fn year_tokens() {
        assert_eq!(cutoff(PeriodToken::Ytd, d(2024, 7, 15), 15), d(2024, 1, 1));
        assert_eq!(cutoff(PeriodToken::Y1, d(2024, 2, 29), 15), d(2023, 2, 28));
        assert_eq!(cutoff(PeriodToken::All, d(2024, 7, 15), 15), d(2009, 7, 15));
        assert_eq!(cutoff(PeriodToken::All, d(2024, 7, 15), 3), d(2021, 7, 15));
    }
}
