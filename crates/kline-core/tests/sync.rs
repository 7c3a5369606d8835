// File: crates/kline-core/tests/sync.rs
// Purpose: Validate lock-step range propagation across registered panes.

use chrono::NaiveDate;
use kline_core::{
    DataSeries, IndicatorKind, LogicalRange, OhlcvBar, PaneGroup, PaneKind,
};

fn make_series(n: usize) -> DataSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars = (0..n)
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.2).sin() * 10.0;
            OhlcvBar {
                date: start + chrono::Days::new(i as u64),
                open: base,
                high: base + 2.0,
                low: base - 2.0,
                close: base + 1.0,
                volume: 1_000.0 + i as f64,
            }
        })
        .collect();
    DataSeries::from_bars(bars)
}

fn ready_group(series: &DataSeries) -> PaneGroup {
    let mut group = PaneGroup::new();
    group.register(PaneKind::Price, 800, 480);
    group.register(PaneKind::Volume, 800, 160);
    group.register(PaneKind::Indicator(IndicatorKind::Rsi), 800, 160);
    group.layout_all(series);
    group
}

#[test]
fn one_pass_propagation_no_echo() {
    let series = make_series(400);
    let mut group = ready_group(&series);
    let main = group.panes()[0].id;

    group.set_range(main, LogicalRange::new(10.0, 60.0));

    for pane in group.panes() {
        assert_eq!(pane.visible(), LogicalRange::new(10.0, 60.0));
    }
    assert_eq!(group.range_events(), 1, "exactly one emission per pass");

    // Re-querying the origin after propagation shows no echo drift.
    let main_range = group.pane(main).unwrap().visible();
    assert_eq!(main_range, LogicalRange::new(10.0, 60.0));

    // Applying the identical range again must not fire another event.
    group.set_range(main, LogicalRange::new(10.0, 60.0));
    assert_eq!(group.range_events(), 1);
}

#[test]
fn propagation_from_any_pane() {
    let series = make_series(400);
    let mut group = ready_group(&series);
    let volume = group.panes()[1].id;

    group.set_range(volume, LogicalRange::new(50.0, 150.0));
    for pane in group.panes() {
        assert_eq!(pane.visible(), LogicalRange::new(50.0, 150.0));
    }
}

#[test]
fn unregistered_pane_stops_receiving() {
    let series = make_series(400);
    let mut group = ready_group(&series);
    let main = group.panes()[0].id;
    let volume = group.panes()[1].id;

    assert!(group.unregister(volume));
    assert_eq!(group.len(), 2);
    group.set_range(main, LogicalRange::new(5.0, 45.0));
    assert!(group.pane(volume).is_none());
    assert!(!group.unregister(volume), "double unregister is rejected");
}

#[test]
fn jump_to_range_trails_latest_bar() {
    let series = make_series(400);
    let mut group = ready_group(&series);

    group.jump_to_range(&series, 120);
    let range = group.common_range().unwrap();
    assert!((range.from - (399.0 - 120.0)).abs() < 1e-9);
    assert!((range.to - (399.0 + 5.0)).abs() < 1e-9);
}

#[test]
fn zoom_scales_about_midpoint() {
    let series = make_series(400);
    let mut group = ready_group(&series);
    let main = group.panes()[0].id;
    group.set_range(main, LogicalRange::new(100.0, 200.0));
    group.layout_all(&series);

    group.zoom_in();
    let r = group.common_range().unwrap();
    assert!((r.width() - 70.0).abs() < 1e-9);
    assert!((r.midpoint() - 150.0).abs() < 1e-9);

    group.zoom_out();
    let r = group.common_range().unwrap();
    assert!((r.width() - 98.0).abs() < 1e-9, "0.7 * 1.4 round trip");
    assert!((r.midpoint() - 150.0).abs() < 1e-9);
}

#[test]
fn pan_clamps_at_data_edges() {
    let series = make_series(100);
    let mut group = ready_group(&series);
    let main = group.panes()[0].id;

    group.set_range(main, LogicalRange::new(0.0, 50.0));
    group.layout_all(&series);
    group.pan_left(&series);
    let r = group.common_range().unwrap();
    assert!((r.from - 0.0).abs() < 1e-9, "left edge is hard-clamped");

    group.set_range(main, LogicalRange::new(60.0, 100.0));
    group.layout_all(&series);
    group.pan_right(&series);
    let r = group.common_range().unwrap();
    assert!(r.to <= 100.0 + 5.0 + 1e-9, "right edge stops at len + margin");
}

#[test]
fn jump_to_edges_preserves_width() {
    let series = make_series(300);
    let mut group = ready_group(&series);
    let main = group.panes()[0].id;
    group.set_range(main, LogicalRange::new(100.0, 160.0));
    group.layout_all(&series);

    group.jump_to_latest(&series);
    let r = group.common_range().unwrap();
    assert!((r.width() - 60.0).abs() < 1e-9);
    assert!((r.to - (299.0 + 5.0)).abs() < 1e-9);

    group.jump_to_earliest(&series);
    let r = group.common_range().unwrap();
    assert!((r.width() - 60.0).abs() < 1e-9);
    assert!((r.from - 0.0).abs() < 1e-9);
}

#[test]
fn derived_ops_noop_on_unready_group() {
    let series = make_series(100);
    let mut group = PaneGroup::new();
    // Degenerate pixel size: pane never becomes ready.
    group.register(PaneKind::Price, 0, 0);
    group.layout_all(&series);

    let before = group.common_range().unwrap();
    group.zoom_in();
    group.pan_left(&series);
    group.jump_to_range(&series, 60);
    assert_eq!(group.common_range().unwrap(), before);
    assert_eq!(group.range_events(), 0);
}
