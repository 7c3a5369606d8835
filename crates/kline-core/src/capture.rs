// File: crates/kline-core/src/capture.rs
// Summary: Bar-count-fitted raster export as a save/mutate/restore transaction.

use chrono::NaiveDate;
use log::debug;

use crate::drawing::{DrawingId, DrawingObject};
use crate::error::ChartError;
use crate::render;
use crate::scale::LogicalRange;
use crate::series::DataSeries;
use crate::sync::PaneGroup;
use crate::text::TextShaper;
use crate::theme::Theme;
use crate::types::PaneId;

/// One pane's exported raster.
#[derive(Debug)]
pub struct PaneSnapshot {
    pub pane_id: PaneId,
    pub width: i32,
    pub height: i32,
    pub png: Vec<u8>,
}

/// Produce pixel-accurate snapshots of every pane, trimmed so the rightmost
/// visible bar is `target_date` (or the newest bar), regardless of where the
/// user has scrolled.
///
/// The live viewport is mutated only inside a strict transaction: every
/// pane's range is saved up front and restored on every exit path, so the
/// post-call visible ranges always equal the pre-call ones. An unresolvable
/// target aborts before any mutation (nothing to restore).
pub fn capture(
    group: &mut PaneGroup,
    series: &DataSeries,
    objects: &[DrawingObject],
    selected: Option<DrawingId>,
    theme: &Theme,
    shaper: &TextShaper,
    target_date: Option<NaiveDate>,
) -> Result<Vec<PaneSnapshot>, ChartError> {
    let last = series.last_index().ok_or(ChartError::EmptySeries)?;
    let end_idx = match target_date {
        Some(date) => series
            .index_at_or_before(date)
            .ok_or(ChartError::CaptureTargetNotFound(date))?,
        None => last,
    };

    // Bar fitting reads the first ready pane; spacing is locked uniformly
    // across the group for the duration of the capture.
    let reference = group
        .panes()
        .iter()
        .find(|p| p.is_ready())
        .ok_or(ChartError::PaneNotReady)?;
    let spacing = reference.bar_spacing().ok_or(ChartError::PaneNotReady)?;
    let plot_width = reference.plot_right() - reference.plot_left();
    let window = fitted_range(plot_width, spacing, end_idx);

    let saved = group.snapshot_ranges();
    debug!(
        "capture: end_idx={end_idx} window=[{}, {}] over {} panes",
        window.from,
        window.to,
        group.len()
    );

    let result: Result<Vec<PaneSnapshot>, ChartError> = (|| {
        group.apply_all_silent(window);
        // One cooperative render tick between viewport mutation and pixel
        // readback; the contract is "layout has completed", not a delay.
        group.layout_all(series);
        let mut shots = Vec::with_capacity(group.len());
        for pane in group.panes() {
            let png = render::render_pane_png(pane, series, objects, selected, theme, shaper)
                .map_err(ChartError::Render)?;
            shots.push(PaneSnapshot {
                pane_id: pane.id,
                width: pane.width,
                height: pane.height,
                png,
            });
        }
        Ok(shots)
    })();

    // Restore unconditionally, then re-layout so live scales match the
    // restored ranges again.
    group.restore_ranges(&saved);
    group.layout_all(series);
    result
}

/// Bar-count-fitted window for a plot of `plot_width` pixels at the locked
/// `bar_spacing`: enough whole bars to cover the plot, right edge flush with
/// `end_idx`, zero right margin.
pub fn fitted_range(plot_width: f32, bar_spacing: f32, end_idx: usize) -> LogicalRange {
    let bars_needed = ((plot_width / bar_spacing.max(f32::EPSILON)).ceil() as usize).max(1);
    let from = (end_idx as f64 - bars_needed as f64 + 1.0).max(0.0);
    LogicalRange::new(from, end_idx as f64 + 1.0)
}
