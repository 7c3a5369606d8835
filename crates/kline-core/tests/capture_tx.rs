// File: crates/kline-core/tests/capture_tx.rs
// Purpose: Capture transaction: bar fitting and save/mutate/restore guarantees.

use chrono::NaiveDate;
use kline_core::{
    capture, fitted_range, ChartError, DataSeries, DrawingEngine, IndicatorKind, LogicalRange,
    OhlcvBar, PaneGroup, PaneKind, TextShaper, Theme,
};

fn make_series(n: usize) -> DataSeries {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let bars = (0..n)
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.15).sin() * 8.0;
            OhlcvBar {
                date: start + chrono::Days::new(i as u64),
                open: base,
                high: base + 2.5,
                low: base - 2.5,
                close: base + 1.0,
                volume: 2_000.0 + (i as f64 * 0.4).cos().abs() * 500.0,
            }
        })
        .collect();
    DataSeries::from_bars(bars)
}

#[test]
fn fitted_range_matches_worked_example() {
    // 1000px pane, 50px axis reserve, 8px spacing:
    // barsNeeded = ceil(950/8) = 119; endIdx 300 -> {182, 301}.
    let range = fitted_range(950.0, 8.0, 300);
    assert_eq!(range, LogicalRange::new(182.0, 301.0));
}

#[test]
fn bar_fit_inequalities_hold() {
    for &(plot_w, spacing) in &[(950.0f32, 8.0f32), (700.0, 6.5), (333.0, 11.0), (1920.0, 3.0)] {
        let range = fitted_range(plot_w, spacing, 500);
        let bars_needed = range.width();
        assert!(
            bars_needed as f32 * spacing >= plot_w,
            "fitted bars cover the plot ({plot_w}px @ {spacing})"
        );
        assert!(
            (bars_needed as f32 - 1.0) * spacing < plot_w,
            "one bar fewer would leave a gap ({plot_w}px @ {spacing})"
        );
    }
}

#[test]
fn fitted_range_clamps_at_series_start() {
    let range = fitted_range(950.0, 8.0, 40);
    assert_eq!(range.from, 0.0);
    assert_eq!(range.to, 41.0);
}

#[test]
fn capture_restores_ranges_on_success() {
    let series = make_series(400);
    let mut group = PaneGroup::new();
    let main = group.register(PaneKind::Price, 1000, 480);
    group.register(PaneKind::Volume, 1000, 160);
    group.register(PaneKind::Indicator(IndicatorKind::Rsi), 1000, 160);
    group.set_range(main, LogicalRange::new(10.0, 60.0));
    group.layout_all(&series);
    let events_before = group.range_events();

    let eng = DrawingEngine::new(Theme::dark().drawing);
    let shaper = TextShaper::new();
    let shots = capture(
        &mut group,
        &series,
        eng.objects(),
        None,
        &Theme::dark(),
        &shaper,
        None,
    )
    .expect("capture succeeds");

    assert_eq!(shots.len(), 3);
    for shot in &shots {
        assert!(shot.png.starts_with(&[137, 80, 78, 71]), "PNG header");
        assert_eq!(shot.width, 1000);
    }
    for pane in group.panes() {
        assert_eq!(pane.visible(), LogicalRange::new(10.0, 60.0), "range restored");
    }
    assert_eq!(
        group.range_events(),
        events_before,
        "transient capture window emits no range events"
    );
}

#[test]
fn capture_at_target_date_aborts_cleanly_when_unresolvable() {
    let series = make_series(100);
    let mut group = PaneGroup::new();
    let main = group.register(PaneKind::Price, 1000, 480);
    group.set_range(main, LogicalRange::new(20.0, 80.0));
    group.layout_all(&series);

    let eng = DrawingEngine::new(Theme::dark().drawing);
    let shaper = TextShaper::new();
    // A date before the first bar cannot be resolved.
    let bad = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
    let err = capture(&mut group, &series, eng.objects(), None, &Theme::dark(), &shaper, Some(bad))
        .unwrap_err();
    assert!(matches!(err, ChartError::CaptureTargetNotFound(_)));

    // Abort happened before any mutation.
    assert_eq!(
        group.pane(main).unwrap().visible(),
        LogicalRange::new(20.0, 80.0)
    );
}

#[test]
fn capture_resolves_target_to_prior_trading_day() {
    let series = make_series(200);
    let mut group = PaneGroup::new();
    let main = group.register(PaneKind::Price, 1000, 480);
    group.set_range(main, LogicalRange::new(0.0, 120.0));
    group.layout_all(&series);

    let eng = DrawingEngine::new(Theme::dark().drawing);
    let shaper = TextShaper::new();
    // Later than the final bar: snaps back to the newest available date.
    let late = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let shots = capture(
        &mut group,
        &series,
        eng.objects(),
        None,
        &Theme::dark(),
        &shaper,
        Some(late),
    )
    .expect("resolves to last bar");
    assert_eq!(shots.len(), 1);
    assert_eq!(
        group.pane(main).unwrap().visible(),
        LogicalRange::new(0.0, 120.0)
    );
}

#[test]
fn capture_on_unready_group_is_an_error() {
    let series = make_series(50);
    let mut group = PaneGroup::new();
    group.register(PaneKind::Price, 0, 0);
    group.layout_all(&series);

    let eng = DrawingEngine::new(Theme::dark().drawing);
    let shaper = TextShaper::new();
    let err = capture(&mut group, &series, eng.objects(), None, &Theme::dark(), &shaper, None)
        .unwrap_err();
    assert!(matches!(err, ChartError::PaneNotReady));
}

#[test]
fn capture_on_empty_series_is_an_error() {
    let series = DataSeries::from_bars(Vec::new());
    let mut group = PaneGroup::new();
    group.register(PaneKind::Price, 800, 400);
    group.layout_all(&series);

    let eng = DrawingEngine::new(Theme::dark().drawing);
    let shaper = TextShaper::new();
    let err = capture(&mut group, &series, eng.objects(), None, &Theme::dark(), &shaper, None)
        .unwrap_err();
    assert!(matches!(err, ChartError::EmptySeries));
}
