use bitacora_types::{Point, Series};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn arb_point() -> impl Strategy<Value = Point> {
    (0i64..4_000, prop_oneof![
        8 => -1.0e6f64..1.0e6,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ])
        .prop_map(|(offset, value)| Point::new(d(2010, 1, 1) + chrono::Days::new(offset as u64), value))
}

proptest! {
    #[test]
    fn new_is_strictly_ascending_finite_and_last_seen_wins(
        points in proptest::collection::vec(arb_point(), 0..300)
    ) {
        let mut expected: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for p in &points {
            if p.value.is_finite() {
                expected.insert(p.date, p.value);
            }
        }

        let s = Series::new(points);
        prop_assert_eq!(s.len(), expected.len());
        for w in s.points().windows(2) {
            prop_assert!(w[0].date < w[1].date);
        }
        for (p, (date, value)) in s.iter().zip(expected.iter()) {
            prop_assert_eq!(p.date, *date);
            prop_assert_eq!(p.value, *value);
            prop_assert!(p.value.is_finite());
        }
    }
}

#[test]
fn value_at_finds_exact_dates_only() {
    let s = Series::new(vec![
        Point::new(d(2024, 3, 5), 3.0),
        Point::new(d(2024, 3, 1), 1.0),
    ]);
    assert_eq!(s.value_at(d(2024, 3, 1)), Some(1.0));
    assert_eq!(s.value_at(d(2024, 3, 5)), Some(3.0));
    assert_eq!(s.value_at(d(2024, 3, 3)), None);
}

#[test]
fn map_values_drops_results_that_overflow() {
    let s = Series::new(vec![
        Point::new(d(2024, 1, 1), 1.0),
        Point::new(d(2024, 1, 2), f64::MAX),
    ]);
    let doubled = s.map_values(|v| v * 2.0);
    assert_eq!(doubled.len(), 1);
    assert_eq!(doubled.first().map(|p| p.value), Some(2.0));
}

#[test]
fn deserialize_restores_invariants() {
    let json = r#"[
        {"date":"2024-01-03","value":3.0},
        {"date":"2024-01-01","value":1.0},
        {"date":"2024-01-03","value":4.0}
    ]"#;
    let s: Series = serde_json::from_str(json).expect("deserialize series");
    let dates: Vec<NaiveDate> = s.dates().collect();
    assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 3)]);
    assert_eq!(s.value_at(d(2024, 1, 3)), Some(4.0));
}
