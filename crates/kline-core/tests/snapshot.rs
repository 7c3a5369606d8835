// File: crates/kline-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders deterministic pane rasters (labels off) to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares decoded pixels for exact match.
// - Else, logs a note and returns (skips) without failing to ease first run.

use chrono::NaiveDate;
use kline_core::render::render_pane_png;
use kline_core::{
    ChartPoint, DataSeries, DrawingEngine, DrawingKind, LogicalRange, OhlcvBar, PaneGroup,
    PaneKind, TextShaper, Theme,
};

fn bless_mode() -> bool {
    std::env::var("UPDATE_SNAPSHOTS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn write_or_compare(path: &std::path::Path, bytes: &[u8]) {
    if bless_mode() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        std::fs::write(path, bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", path.display(), bytes.len());
        return;
    }
    if path.exists() {
        let want = std::fs::read(path).expect("read snapshot");
        // Compare decoded pixel buffers to avoid PNG encoder variance
        let got_img = image::load_from_memory(bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "Pixels differ: {}", path.display());
    } else {
        eprintln!("[snapshot] Missing {}; set UPDATE_SNAPSHOTS=1 to bless.", path.display());
    }
}

fn make_series(n: usize) -> DataSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars = (0..n)
        .map(|i| {
            let base = 70.0 + (i as f64 * 0.4).sin() * 6.0;
            OhlcvBar {
                date: start + chrono::Days::new(i as u64),
                open: base,
                high: base + 2.0,
                low: base - 2.0,
                close: base + (if i % 2 == 0 { 1.0 } else { -1.0 }),
                volume: 1_200.0 + (i % 7) as f64 * 100.0,
            }
        })
        .collect();
    DataSeries::from_bars(bars)
}

fn render_pane_bytes(kind: PaneKind, with_drawings: bool) -> Vec<u8> {
    let series = make_series(160);
    let mut group = PaneGroup::new();
    let id = group.register(kind, 640, 320);
    group.pane_mut(id).unwrap().draw_labels = false; // avoid text nondeterminism
    group.set_range(id, LogicalRange::new(20.0, 140.0));
    group.layout_all(&series);

    let mut eng = DrawingEngine::new(Theme::dark().drawing);
    if with_drawings {
        eng.add(
            DrawingKind::Trendline,
            vec![ChartPoint::new(40.0, 66.0), ChartPoint::new(120.0, 74.0)],
            None,
        )
        .unwrap();
        eng.add(
            DrawingKind::Rectangle,
            vec![ChartPoint::new(60.0, 64.0), ChartPoint::new(90.0, 72.0)],
            None,
        )
        .unwrap();
        eng.add(
            DrawingKind::Channel,
            vec![
                ChartPoint::new(30.0, 65.0),
                ChartPoint::new(110.0, 70.0),
                ChartPoint::new(70.0, 76.0),
            ],
            None,
        )
        .unwrap();
    }

    let shaper = TextShaper::new();
    render_pane_png(
        group.pane(id).unwrap(),
        &series,
        eng.objects(),
        None,
        &Theme::dark(),
        &shaper,
    )
    .expect("render bytes")
}

fn snap_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/__snapshots__")
        .join(name)
}

#[test]
fn golden_price_pane() {
    let bytes = render_pane_bytes(PaneKind::Price, false);
    write_or_compare(&snap_path("price_pane.png"), &bytes);
}

#[test]
fn golden_volume_pane() {
    let bytes = render_pane_bytes(PaneKind::Volume, false);
    write_or_compare(&snap_path("volume_pane.png"), &bytes);
}

#[test]
fn golden_price_pane_with_drawings() {
    let bytes = render_pane_bytes(PaneKind::Price, true);
    write_or_compare(&snap_path("price_pane_drawings.png"), &bytes);
}
