mod helpers;

use std::sync::Arc;

use bitacora::{
    Alignment, BitacoraError, DisplayMode, FetchWindow, Granularity, PeriodToken, PipelineState,
    RawSnapshot, Series, SeriesKey, SeriesSource,
};
use chrono::{Datelike, NaiveDate, Weekday};
use helpers::{IPSA, ScriptedSource, UF, USD, builder_at, d, daily, pts};

fn unused() -> Arc<dyn SeriesSource> {
    ScriptedSource::builder().build()
}

fn snapshot(today: NaiveDate, series: Vec<(SeriesKey, Vec<bitacora::Point>)>) -> RawSnapshot {
    RawSnapshot {
        window: FetchWindow::new(d(2009, 1, 1), today),
        series: series.into_iter().map(|(k, p)| (k, Series::new(p))).collect(),
        warnings: vec![],
    }
}

fn state(keys: &[SeriesKey], period: PeriodToken, mode: DisplayMode) -> PipelineState {
    PipelineState::new(keys.iter().copied(), period, mode)
}

#[test]
fn ytd_window_keeps_only_current_year() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused())]).build().unwrap();
    let raw = snapshot(today, vec![(UF, daily(d(2020, 1, 1), today, 30_000.0, 1.0))]);

    let frame = b
        .run_pipeline(&raw, &state(&[UF], PeriodToken::Ytd, DisplayMode::Real))
        .unwrap();
    let uf = frame.get(UF).unwrap();
    assert_eq!(frame.cutoff, d(2024, 1, 1));
    assert_eq!(uf.real.first().unwrap().date, d(2024, 1, 1));
    assert!(uf.real.iter().all(|p| p.date >= d(2024, 1, 1)));
    assert_eq!(uf.plotted, uf.real);
}

#[test]
fn base100_and_delta_over_a_sparse_series() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(USD, unused())]).build().unwrap();
    let raw = snapshot(
        today,
        vec![(USD, pts(&[(d(2024, 1, 1), 50.0), (d(2024, 6, 1), 75.0)]))],
    );

    let frame = b
        .run_pipeline(&raw, &state(&[USD], PeriodToken::Ytd, DisplayMode::Base100))
        .unwrap();
    let usd = frame.get(USD).unwrap();
    let values: Vec<f64> = usd.plotted.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![100.0, 150.0]);
    assert_eq!(usd.applied, DisplayMode::Base100);
    assert_eq!(usd.base, Some(50.0));

    let frame = b
        .run_pipeline(&raw, &state(&[USD], PeriodToken::Ytd, DisplayMode::DeltaPct))
        .unwrap();
    let values: Vec<f64> = frame.get(USD).unwrap().plotted.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![0.0, 50.0]);
}

#[test]
fn weekend_gap_is_filled_with_friday_value() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(USD, unused())]).build().unwrap();
    // Friday then Monday
    let raw = snapshot(
        today,
        vec![(USD, pts(&[(d(2024, 7, 5), 940.0), (d(2024, 7, 8), 945.0)]))],
    );

    let frame = b
        .run_pipeline(&raw, &state(&[USD], PeriodToken::M1, DisplayMode::Real))
        .unwrap();
    let usd = frame.get(USD).unwrap();
    assert_eq!(usd.real.len(), 4);
    assert_eq!(usd.real.value_at(d(2024, 7, 6)), Some(940.0));
    assert_eq!(usd.real.value_at(d(2024, 7, 7)), Some(940.0));
    assert_eq!(frame.axis.len(), 4);
}

#[test]
fn window_is_applied_after_fill() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(USD, unused())]).build().unwrap();
    // the filled Sunday falls on the 1M cutoff; the Friday before it does not
    let raw = snapshot(
        today,
        vec![(USD, pts(&[(d(2024, 6, 14), 900.0), (d(2024, 6, 17), 910.0)]))],
    );
    let frame = b
        .run_pipeline(&raw, &state(&[USD], PeriodToken::M1, DisplayMode::Base100))
        .unwrap();
    let usd = frame.get(USD).unwrap();
    assert_eq!(frame.cutoff, d(2024, 6, 15));
    assert_eq!(usd.real.first().unwrap().date, d(2024, 6, 15));
    assert_eq!(usd.real.first().unwrap().value, 900.0);
    assert_eq!(usd.plotted.first().unwrap().value, 100.0);
}

#[test]
fn degenerate_series_falls_back_to_real_with_warning() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused()), (USD, unused())])
        .build()
        .unwrap();
    let raw = snapshot(
        today,
        vec![
            (UF, pts(&[(d(2024, 3, 1), 0.0), (d(2024, 4, 1), 0.0)])),
            (USD, pts(&[(d(2024, 3, 1), 900.0), (d(2024, 4, 1), 990.0)])),
        ],
    );

    let frame = b
        .run_pipeline(&raw, &state(&[UF, USD], PeriodToken::Ytd, DisplayMode::Base100))
        .unwrap();
    let uf = frame.get(UF).unwrap();
    assert_eq!(uf.applied, DisplayMode::Real);
    assert_eq!(uf.base, None);
    assert_eq!(uf.plotted, uf.real);
    assert_eq!(frame.get(USD).unwrap().applied, DisplayMode::Base100);
    assert_eq!(
        frame.warnings,
        vec![BitacoraError::degenerate("uf")]
    );
}

#[test]
fn inactive_series_are_kept_but_hidden() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused()), (USD, unused()), (IPSA, unused())])
        .build()
        .unwrap();
    let raw = snapshot(
        today,
        vec![
            (UF, pts(&[(d(2024, 3, 1), 1.0)])),
            (USD, pts(&[(d(2024, 3, 2), 2.0)])),
            (IPSA, pts(&[(d(2024, 3, 3), 3.0)])),
        ],
    );

    let frame = b
        .run_pipeline(&raw, &state(&[UF, IPSA], PeriodToken::Ytd, DisplayMode::Real))
        .unwrap();
    let keys: Vec<SeriesKey> = frame.series.iter().map(|s| s.key).collect();
    assert_eq!(keys, vec![UF, USD, IPSA]);
    let usd = frame.get(USD).unwrap();
    assert!(!usd.visible);
    assert!(usd.plotted.is_empty());
    assert_eq!(frame.axis, vec![d(2024, 3, 1), d(2024, 3, 3)]);
    assert_eq!(frame.value_at(USD, d(2024, 3, 2)), None);
}

#[test]
fn active_series_without_points_in_window_warn() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused()), (USD, unused())])
        .build()
        .unwrap();
    let raw = snapshot(
        today,
        vec![
            (UF, pts(&[(d(2024, 7, 1), 37_500.0)])),
            (USD, pts(&[(d(2023, 7, 1), 800.0)])),
        ],
    );
    let frame = b
        .run_pipeline(&raw, &state(&[UF, USD], PeriodToken::M1, DisplayMode::Real))
        .unwrap();
    assert!(frame.get(USD).unwrap().real.is_empty());
    assert!(matches!(
        frame.warnings.as_slice(),
        [BitacoraError::NoDataInRange { what }] if what == "usd for 1M"
    ));
}

#[test]
fn nothing_in_window_is_an_error() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused())]).build().unwrap();
    let raw = snapshot(today, vec![(UF, daily(d(2020, 1, 1), d(2020, 12, 31), 1.0, 0.0))]);

    let err = b
        .run_pipeline(&raw, &state(&[UF], PeriodToken::M1, DisplayMode::Base100))
        .unwrap_err();
    assert!(matches!(err, BitacoraError::NoDataInRange { .. }));
    assert_eq!(err.user_message(), "no overlapping data for this period");
}

#[test]
fn no_active_series_renders_an_empty_frame() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused())]).build().unwrap();
    let raw = snapshot(today, vec![(UF, pts(&[(d(2024, 7, 1), 1.0)]))]);
    let frame = b
        .run_pipeline(&raw, &state(&[], PeriodToken::Ytd, DisplayMode::Real))
        .unwrap();
    assert!(frame.axis.is_empty());
    assert!(frame.is_blank());
}

#[test]
fn intersection_restricts_to_common_dates() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused()), (USD, unused())])
        .alignment(Alignment::Intersection)
        .build()
        .unwrap();
    let weekly: Vec<NaiveDate> = (0..4).map(|w| d(2024, 6, 3) + chrono::Days::new(7 * w)).collect();
    let raw = snapshot(
        today,
        vec![
            (UF, daily(d(2024, 6, 1), d(2024, 7, 15), 37_000.0, 1.0)),
            (
                USD,
                weekly.iter().map(|day| bitacora::Point::new(*day, 930.0)).collect(),
            ),
        ],
    );

    let frame = b
        .run_pipeline(&raw, &state(&[UF, USD], PeriodToken::M3, DisplayMode::Real))
        .unwrap();
    assert_eq!(frame.axis, weekly);
    assert!(frame.axis.iter().all(|day| day.weekday() == Weekday::Mon));
    assert_eq!(frame.get(UF).unwrap().real.len(), 4);
}

#[test]
fn intersection_of_disjoint_series_is_an_error() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused()), (USD, unused())])
        .alignment(Alignment::Intersection)
        .build()
        .unwrap();
    let raw = snapshot(
        today,
        vec![
            (UF, pts(&[(d(2024, 7, 1), 1.0)])),
            (USD, pts(&[(d(2024, 7, 2), 2.0)])),
        ],
    );
    let err = b
        .run_pipeline(&raw, &state(&[UF, USD], PeriodToken::Ytd, DisplayMode::Real))
        .unwrap_err();
    assert!(matches!(err, BitacoraError::NoDataInRange { .. }));
}

#[test]
fn monthly_granularity_aligns_daily_and_month_end_rows() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused()), (IPSA, unused())])
        .alignment(Alignment::Intersection)
        .granularity(Granularity::Monthly)
        .build()
        .unwrap();
    // uf is daily; ipsa comes as month-end rows and stops in March
    let raw = snapshot(
        today,
        vec![
            (UF, daily(d(2024, 1, 1), d(2024, 6, 30), 100.0, 1.0)),
            (
                IPSA,
                pts(&[
                    (d(2024, 1, 31), 20.0),
                    (d(2024, 2, 29), 22.0),
                    (d(2024, 3, 28), 25.0),
                ]),
            ),
        ],
    );

    let frame = b
        .run_pipeline(&raw, &state(&[UF, IPSA], PeriodToken::Ytd, DisplayMode::Base100))
        .unwrap();
    assert_eq!(frame.axis, vec![d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1)]);

    let ipsa = frame.get(IPSA).unwrap();
    let plotted: Vec<f64> = ipsa.plotted.iter().map(|p| p.value).collect();
    assert_eq!(plotted, vec![100.0, 110.0, 125.0]);

    // last daily value of each month
    let uf = frame.get(UF).unwrap();
    let real: Vec<f64> = uf.real.iter().map(|p| p.value).collect();
    assert_eq!(real, vec![130.0, 159.0, 190.0]);
    assert_eq!(uf.plotted.first().unwrap().value, 100.0);
}

#[test]
fn tooltip_reports_plotted_and_real_values() {
    let today = d(2024, 7, 15);
    let b = builder_at(today, &[(UF, unused()), (USD, unused())])
        .build()
        .unwrap();
    let raw = snapshot(
        today,
        vec![
            (UF, pts(&[(d(2024, 7, 1), 200.0), (d(2024, 7, 2), 210.0)])),
            (USD, pts(&[(d(2024, 7, 1), 50.0), (d(2024, 7, 3), 55.0)])),
        ],
    );
    let frame = b
        .run_pipeline(&raw, &state(&[UF, USD], PeriodToken::M1, DisplayMode::DeltaPct))
        .unwrap();

    let rows = frame.tooltip(d(2024, 7, 2));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].key, UF);
    assert!((rows[0].plotted - 5.0).abs() < 1e-9);
    assert_eq!(rows[0].real, 210.0);
    // usd was filled forward onto the 2nd
    assert_eq!(rows[1].plotted, 0.0);
    assert_eq!(frame.value_at(UF, d(2024, 7, 2)), Some(210.0));
    assert_eq!(frame.value_at(UF, d(2024, 7, 9)), None);
}

#[test]
fn pipeline_over_fetched_mock_data() {
    use bitacora_mock::MockSource;

    let today = d(2024, 7, 15);
    let b = builder_at(
        today,
        &[
            (UF, Arc::new(MockSource::new("uf")) as Arc<dyn SeriesSource>),
            (USD, Arc::new(MockSource::new("dolar")) as Arc<dyn SeriesSource>),
            (IPSA, Arc::new(MockSource::new("ech.us")) as Arc<dyn SeriesSource>),
        ],
    )
    .build()
    .unwrap();

    let raw = tokio_test::block_on(b.fetch_for(PeriodToken::Ytd)).unwrap();
    assert_eq!(raw.window, FetchWindow::new(d(2024, 1, 1), today));
    let frame = b
        .run_pipeline(&raw, &state(&[UF, USD, IPSA], PeriodToken::Ytd, DisplayMode::Base100))
        .unwrap();
    for s in frame.visible() {
        assert_eq!(s.applied, DisplayMode::Base100);
        assert_eq!(s.plotted.first().unwrap().value, 100.0);
    }
    assert!(frame.warnings.is_empty());
}
