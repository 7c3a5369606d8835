// File: crates/kline-core/tests/series_data.rs
// Purpose: Series lookups, period aggregation, and indicator columns.

use chrono::NaiveDate;
use kline_core::{indicators, AggregatePeriod, DataSeries, OhlcvBar};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bar(date: NaiveDate, o: f64, h: f64, l: f64, c: f64, v: f64) -> OhlcvBar {
    OhlcvBar::try_new(date, o, h, l, c, v).unwrap()
}

#[test]
fn ohlc_invariants_are_enforced() {
    let d = day(2024, 1, 2);
    assert!(OhlcvBar::try_new(d, 10.0, 9.0, 8.0, 9.5, 100.0).is_err(), "high below close");
    assert!(OhlcvBar::try_new(d, 10.0, 11.0, 10.5, 10.8, 100.0).is_err(), "low above open");
    assert!(OhlcvBar::try_new(d, 10.0, 11.0, 9.0, 10.5, -1.0).is_err(), "negative volume");
    assert!(OhlcvBar::try_new(d, 10.0, 11.0, 9.0, 10.5, 100.0).is_ok());
}

#[test]
fn date_lookup_exact_and_prior() {
    // Mon..Fri, then the following Mon (weekend gap).
    let bars = vec![
        bar(day(2024, 1, 1), 10.0, 11.0, 9.0, 10.5, 100.0),
        bar(day(2024, 1, 2), 10.5, 11.5, 10.0, 11.0, 110.0),
        bar(day(2024, 1, 3), 11.0, 12.0, 10.5, 11.5, 120.0),
        bar(day(2024, 1, 4), 11.5, 12.5, 11.0, 12.0, 130.0),
        bar(day(2024, 1, 5), 12.0, 13.0, 11.5, 12.5, 140.0),
        bar(day(2024, 1, 8), 12.5, 13.5, 12.0, 13.0, 150.0),
    ];
    let series = DataSeries::from_bars(bars);

    assert_eq!(series.index_of(day(2024, 1, 3)), Some(2));
    assert_eq!(series.index_of(day(2024, 1, 6)), None, "Saturday has no bar");
    // Saturday resolves to Friday's bar.
    assert_eq!(series.index_at_or_before(day(2024, 1, 6)), Some(4));
    assert_eq!(series.index_at_or_before(day(2023, 12, 31)), None);
    assert_eq!(series.index_at_or_before(day(2024, 2, 1)), Some(5));
}

#[test]
fn weekly_aggregation_merges_iso_weeks() {
    // 2024-01-01 is a Monday; two full weeks of daily bars.
    let mut bars = Vec::new();
    for i in 0..5 {
        bars.push(bar(day(2024, 1, 1 + i), 10.0 + i as f64, 12.0 + i as f64, 9.0, 11.0 + i as f64, 100.0));
    }
    for i in 0..5 {
        bars.push(bar(day(2024, 1, 8 + i), 20.0 + i as f64, 22.0 + i as f64, 19.0, 21.0 + i as f64, 200.0));
    }
    let series = DataSeries::from_bars(bars);
    let weekly = series.aggregate(AggregatePeriod::Weekly);

    assert_eq!(weekly.len(), 2);
    let w1 = weekly.bar(0).unwrap();
    assert_eq!(w1.date, day(2024, 1, 1), "bucket keyed by its first day");
    assert_eq!(w1.open, 10.0, "open of first day");
    assert_eq!(w1.close, 15.0, "close of last day");
    assert_eq!(w1.high, 16.0, "max high across the week");
    assert_eq!(w1.low, 9.0);
    assert_eq!(w1.volume, 500.0, "summed volume");
}

#[test]
fn monthly_aggregation_splits_on_calendar_month() {
    let bars = vec![
        bar(day(2024, 1, 30), 10.0, 11.0, 9.0, 10.5, 100.0),
        bar(day(2024, 1, 31), 10.5, 11.5, 10.0, 11.0, 100.0),
        bar(day(2024, 2, 1), 11.0, 12.0, 10.5, 11.5, 100.0),
    ];
    let series = DataSeries::from_bars(bars);
    let monthly = series.aggregate(AggregatePeriod::Monthly);
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly.bar(0).unwrap().close, 11.0);
    assert_eq!(monthly.bar(1).unwrap().open, 11.0);
}

#[test]
fn daily_aggregation_is_identity() {
    let bars = vec![
        bar(day(2024, 1, 1), 10.0, 11.0, 9.0, 10.5, 100.0),
        bar(day(2024, 1, 2), 10.5, 11.5, 10.0, 11.0, 100.0),
    ];
    let series = DataSeries::from_bars(bars);
    assert_eq!(series.aggregate(AggregatePeriod::Daily).len(), 2);
}

#[test]
fn sma_fills_after_window() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let out = indicators::sma(&values, 3);
    assert_eq!(out[0], None);
    assert_eq!(out[1], None);
    assert_eq!(out[2], Some(2.0));
    assert_eq!(out[4], Some(4.0));
}

#[test]
fn rsi_saturates_on_monotonic_gains() {
    let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let out = indicators::rsi(&values, 14);
    assert_eq!(out[13], None, "window not yet filled");
    assert_eq!(out[14], Some(100.0), "all gains, no losses");
    assert_eq!(out[29], Some(100.0));
}

#[test]
fn macd_defined_after_slow_window() {
    let values: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.3).sin()).collect();
    let (line, signal, hist) = indicators::macd(&values, 12, 26, 9);
    assert!(line[24].is_none());
    assert!(line[25].is_some(), "defined once the slow EMA seeds");
    let first_signal = line.iter().position(|v| v.is_some()).unwrap() + 8;
    assert!(signal[first_signal].is_some());
    for i in 0..60 {
        if let (Some(m), Some(s), Some(h)) = (line[i], signal[i], hist[i]) {
            assert!((h - (m - s)).abs() < 1e-12);
        }
    }
}

#[test]
fn indicator_columns_align_with_bars() {
    let bars: Vec<OhlcvBar> = (0..80)
        .map(|i| bar(day(2024, 1, 1) + chrono::Days::new(i), 10.0, 11.0, 9.0, 10.0 + (i as f64 * 0.1).sin(), 50.0))
        .collect();
    let series = DataSeries::from_bars(bars);
    assert!(series.indicator(3).unwrap().ma5.is_none());
    assert!(series.indicator(4).unwrap().ma5.is_some());
    assert!(series.indicator(58).unwrap().ma60.is_none());
    assert!(series.indicator(59).unwrap().ma60.is_some());
    assert!(series.indicator(14).unwrap().rsi14.is_some());
}
