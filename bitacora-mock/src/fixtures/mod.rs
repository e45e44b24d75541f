use chrono::{Datelike, Days, NaiveDate, Weekday};

use bitacora_core::{FetchWindow, Point, Series};

/// Shape of a synthetic feed.
struct Profile {
    start: f64,
    daily_drift: f64,
    wobble: f64,
    trading_days_only: bool,
    first_of_month_only: bool,
}

fn profile(code: &str) -> Option<Profile> {
    let p = match code {
        // indicators published every calendar day
        "uf" => Profile {
            start: 36_000.0,
            daily_drift: 0.000_1,
            wobble: 0.0,
            trading_days_only: false,
            first_of_month_only: false,
        },
        "dolar" | "usd" => Profile {
            start: 880.0,
            daily_drift: 0.000_05,
            wobble: 12.0,
            trading_days_only: true,
            first_of_month_only: false,
        },
        // monthly indicator, first-of-month dates
        "ipc" => Profile {
            start: 100.0,
            daily_drift: 0.000_1,
            wobble: 0.0,
            trading_days_only: false,
            first_of_month_only: true,
        },
        "ech.us" | "ipsa" => Profile {
            start: 27.0,
            daily_drift: 0.000_2,
            wobble: 0.8,
            trading_days_only: true,
            first_of_month_only: false,
        },
        "spy.us" => Profile {
            start: 470.0,
            daily_drift: 0.000_4,
            wobble: 6.0,
            trading_days_only: true,
            first_of_month_only: false,
        },
        "ewg.us" => Profile {
            start: 30.0,
            daily_drift: 0.000_15,
            wobble: 0.6,
            trading_days_only: true,
            first_of_month_only: false,
        },
        "ewj.us" => Profile {
            start: 65.0,
            daily_drift: 0.000_2,
            wobble: 1.1,
            trading_days_only: true,
            first_of_month_only: false,
        },
        "gld.us" => Profile {
            start: 190.0,
            daily_drift: 0.000_3,
            wobble: 2.5,
            trading_days_only: true,
            first_of_month_only: false,
        },
        "slv.us" => Profile {
            start: 21.0,
            daily_drift: 0.000_1,
            wobble: 0.7,
            trading_days_only: true,
            first_of_month_only: false,
        },
        "copx.us" => Profile {
            start: 38.0,
            daily_drift: 0.000_1,
            wobble: 1.4,
            trading_days_only: true,
            first_of_month_only: false,
        },
        "alb.us" => Profile {
            start: 140.0,
            daily_drift: -0.000_6,
            wobble: 5.0,
            trading_days_only: true,
            first_of_month_only: false,
        },
        _ => return None,
    };
    Some(p)
}

/// Anchor date for every synthetic feed; values are a pure function of the day offset from it.
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Deterministic series for `code` over `window`, or `None` for unknown codes.
pub fn by_code(code: &str, window: &FetchWindow) -> Option<Series> {
    let p = profile(code)?;
    let base = epoch();
    let mut out = Vec::new();
    let mut day = window.start;
    while day <= window.end {
        let keep = if p.first_of_month_only {
            day.day() == 1
        } else if p.trading_days_only {
            !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
        } else {
            true
        };
        if keep {
            let n = (day - base).num_days() as f64;
            let value = p.start * (1.0 + p.daily_drift).powf(n) + p.wobble * (n / 9.0).sin();
            out.push(Point::new(day, value));
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    Some(Series::new(out))
}
