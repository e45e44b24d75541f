use bitacora_core::{
    DisplayMode, Granularity, Point, Series, SeriesKey, intersect_aligned, month_start,
    monthly_last, normalize, resample,
};
use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn arb_series() -> impl Strategy<Value = Series> {
    proptest::collection::vec((0u64..800, 1.0f64..1.0e4), 0..120).prop_map(|pts| {
        Series::new(
            pts.into_iter()
                .map(|(o, v)| Point::new(d(2022, 1, 1) + Days::new(o), v)),
        )
    })
}

proptest! {
    #[test]
    fn one_point_per_month_holding_the_last_value(series in arb_series()) {
        let monthly = monthly_last(&series);

        prop_assert!(monthly.iter().all(|p| p.date.day() == 1));
        prop_assert!(monthly.points().windows(2).all(|w| w[0].date < w[1].date));

        let months: std::collections::BTreeSet<NaiveDate> =
            series.dates().map(month_start).collect();
        prop_assert_eq!(monthly.len(), months.len());

        for p in &monthly {
            let last = series
                .iter()
                .filter(|q| month_start(q.date) == p.date)
                .last()
                .map(|q| q.value);
            prop_assert_eq!(Some(p.value), last);
        }

        // already monthly input is left alone
        prop_assert_eq!(monthly_last(&monthly), monthly.clone());
        prop_assert_eq!(resample(&series, Granularity::Monthly), monthly);
    }
}

#[test]
fn daily_indicator_collapses_to_month_end_values() {
    let uf = Series::new(vec![
        Point::new(d(2024, 1, 2), 36_800.0),
        Point::new(d(2024, 1, 31), 36_850.0),
        Point::new(d(2024, 2, 1), 36_860.0),
        Point::new(d(2024, 2, 29), 36_900.0),
    ]);
    assert_eq!(
        monthly_last(&uf),
        Series::new(vec![
            Point::new(d(2024, 1, 1), 36_850.0),
            Point::new(d(2024, 2, 1), 36_900.0),
        ])
    );
}

#[test]
fn monthly_inputs_intersect_and_rebase() {
    // daily indicator against month-stamped price rows
    let uf = monthly_last(&Series::new(vec![
        Point::new(d(2024, 1, 15), 50.0),
        Point::new(d(2024, 2, 20), 60.0),
        Point::new(d(2024, 3, 10), 75.0),
    ]));
    let ech = Series::new(vec![
        Point::new(d(2024, 2, 1), 30.0),
        Point::new(d(2024, 3, 1), 33.0),
        Point::new(d(2024, 4, 1), 36.0),
    ]);
    let aligned = intersect_aligned(vec![
        (SeriesKey::new("uf"), uf),
        (SeriesKey::new("ipsa"), ech),
    ]);
    assert_eq!(aligned.axis, vec![d(2024, 2, 1), d(2024, 3, 1)]);

    let rebased = normalize(aligned.get(SeriesKey::new("uf")).unwrap(), DisplayMode::Base100);
    assert_eq!(
        rebased.series,
        Series::new(vec![Point::new(d(2024, 2, 1), 100.0), Point::new(d(2024, 3, 1), 125.0)])
    );
}
