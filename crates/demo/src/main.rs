// File: crates/demo/src/main.rs
// Summary: Demo loads daily OHLCV (CSV or synthetic), builds a three-pane
// board, draws a few annotations, and exports fitted captures to PNGs.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kline_core::{
    ChartBoard, ChartPoint, DataSeries, DrawingKind, IndicatorKind, OhlcvBar, PaneKind, Theme,
};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let series = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            let bars = load_ohlcv_csv(&path)
                .with_context(|| format!("failed to load CSV '{}'", path.display()))?;
            println!("Loaded {} bars from {}", bars.len(), path.display());
            DataSeries::from_bars(bars)
        }
        None => {
            let series = synthetic_series(500);
            println!("No CSV given; generated {} synthetic bars", series.len());
            series
        }
    };
    if series.is_empty() {
        anyhow::bail!("no bars loaded — check headers/delimiter.");
    }

    let mut board = ChartBoard::new(series, Theme::dark());
    board.add_pane(PaneKind::Price, 1024, 480);
    board.add_pane(PaneKind::Volume, 1024, 160);
    board.add_pane(PaneKind::Indicator(IndicatorKind::Rsi), 1024, 160);
    board.jump_to_range(120);

    annotate(&mut board)?;

    // Live frames (what a host UI would blit).
    let frames = board.redraw()?;
    for frame in &frames {
        println!(
            "Rendered {} at {}x{} ({} bytes RGBA)",
            frame.pane_id,
            frame.width,
            frame.height,
            frame.rgba.len()
        );
    }

    // Fitted export at the newest bar.
    let out_dir = PathBuf::from("target/out");
    std::fs::create_dir_all(&out_dir)?;
    for shot in board.capture(None)? {
        let path = out_dir.join(format!("pane{}_latest.png", shot.pane_id.0));
        std::fs::write(&path, &shot.png)?;
        println!("Wrote {}", path.display());
    }

    // Fitted export at a historical date; the live view is untouched.
    let view_before = board.visible_range();
    let mid_date = board
        .series()
        .date_at(board.series().len() / 2)
        .context("series midpoint date")?;
    for shot in board.capture(Some(mid_date))? {
        let path = out_dir.join(format!("pane{}_{}.png", shot.pane_id.0, mid_date));
        std::fs::write(&path, &shot.png)?;
        println!("Wrote {}", path.display());
    }
    assert_eq!(view_before, board.visible_range());

    Ok(())
}

/// Drop a few example annotations around the recent price action.
fn annotate(board: &mut ChartBoard) -> Result<()> {
    let series = board.series();
    let last = series.len() as f64 - 1.0;
    let (lo, hi) = series
        .price_bounds_in(last - 120.0, last)
        .context("price bounds of the visible window")?;
    let last_close = series.bar(series.len() - 1).context("last bar")?.close;

    board
        .add_drawing(
            DrawingKind::Trendline,
            vec![
                ChartPoint::new(last - 110.0, lo + (hi - lo) * 0.2),
                ChartPoint::new(last - 20.0, lo + (hi - lo) * 0.6),
            ],
            None,
        )
        .map_err(anyhow::Error::msg)?;
    board
        .add_drawing(
            DrawingKind::Fibonacci,
            vec![
                ChartPoint::new(last - 90.0, lo),
                ChartPoint::new(last - 10.0, hi),
            ],
            None,
        )
        .map_err(anyhow::Error::msg)?;
    board
        .add_drawing(
            DrawingKind::Horizontal,
            vec![ChartPoint::new(last, last_close)],
            None,
        )
        .map_err(anyhow::Error::msg)?;
    board
        .add_drawing(
            DrawingKind::Text,
            vec![ChartPoint::new(last - 60.0, hi)],
            Some("watch this level".to_string()),
        )
        .map_err(anyhow::Error::msg)?;
    Ok(())
}

/// Deterministic random-walk series for running without input data.
fn synthetic_series(n: usize) -> DataSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut close = 100.0f64;
    let mut bars = Vec::with_capacity(n);
    for i in 0..n {
        let drift = (i as f64 * 0.05).sin() * 1.5 + (i as f64 * 0.013).cos() * 0.8;
        let open = close;
        close = (close + drift).max(5.0);
        let high = open.max(close) + 0.8;
        let low = open.min(close) - 0.8;
        let volume = 1_500.0 + (i as f64 * 0.21).sin().abs() * 900.0;
        bars.push(OhlcvBar {
            date: start + chrono::Days::new(i as u64),
            open,
            high,
            low,
            close,
            volume,
        });
    }
    DataSeries::from_bars(bars)
}

/// Load a daily OHLCV CSV with flexible headers (date/open/high/low/close/volume).
fn load_ohlcv_csv(path: &Path) -> Result<Vec<OhlcvBar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>();

    let idx = |names: &[&str]| -> Option<usize> {
        headers.iter().position(|h| names.contains(&h.as_str()))
    };

    let i_date = idx(&["date", "time", "datetime", "day"]).context("no date column")?;
    let i_open = idx(&["open", "o"]).context("no open column")?;
    let i_high = idx(&["high", "h"]).context("no high column")?;
    let i_low = idx(&["low", "l"]).context("no low column")?;
    let i_close = idx(&["close", "c", "adj_close"]).context("no close column")?;
    let i_volume = idx(&["volume", "vol", "v"]);

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let num = |i: usize| -> Option<f64> { rec.get(i).and_then(|s| s.trim().parse().ok()) };
        let Some(date) = rec.get(i_date).and_then(parse_date) else { continue };
        let (Some(o), Some(h), Some(l), Some(c)) =
            (num(i_open), num(i_high), num(i_low), num(i_close))
        else {
            continue;
        };
        let v = i_volume.and_then(num).unwrap_or(0.0);
        match OhlcvBar::try_new(date, o, h, l, c, v) {
            Ok(bar) => out.push(bar),
            Err(reason) => println!("Skipping {date}: {reason}"),
        }
    }
    out.sort_by_key(|b| b.date);
    Ok(out)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Epoch seconds or milliseconds fall back to the date in UTC.
    if let Ok(n) = s.parse::<i64>() {
        let secs = if n > 10_i64.pow(12) { n / 1000 } else { n };
        return chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive());
    }
    None
}
