// File: crates/kline-core/src/board.rs
// Summary: Host-facing facade tying series, panes, drawings, and capture together.

use chrono::NaiveDate;

use crate::capture::{self, PaneSnapshot};
use crate::drawing::{DrawingEngine, DrawingId, DrawingKind, DrawingObject, InteractionMode};
use crate::error::ChartError;
use crate::pane::{Pane, PaneKind};
use crate::render::{self, PaneFrame};
use crate::scale::LogicalRange;
use crate::series::DataSeries;
use crate::sync::PaneGroup;
use crate::text::TextShaper;
use crate::theme::Theme;
use crate::transform::ChartPoint;
use crate::types::PaneId;

/// Bars shown when a board first becomes ready, matching the default kline
/// window of the host dashboard.
pub const DEFAULT_VISIBLE_BARS: usize = 120;

/// Owns the whole engine state for one symbol: the immutable data series,
/// the synchronized pane registry, the drawing engine, and the theme. The
/// host UI drives it exclusively through this surface and owns the frame
/// loop; redraw work only happens on the explicit `redraw` entry point when
/// the dirty flag is set.
pub struct ChartBoard {
    series: DataSeries,
    group: PaneGroup,
    drawings: DrawingEngine,
    theme: Theme,
    shaper: TextShaper,
    dirty: bool,
}

impl ChartBoard {
    pub fn new(series: DataSeries, theme: Theme) -> Self {
        Self {
            series,
            group: PaneGroup::new(),
            drawings: DrawingEngine::new(theme.drawing),
            theme,
            shaper: TextShaper::new(),
            dirty: true,
        }
    }

    pub fn series(&self) -> &DataSeries {
        &self.series
    }

    /// Swap the data series wholesale (symbol switch, period switch).
    /// Drawings persist: they live in chart space, not in the data.
    pub fn set_series(&mut self, series: DataSeries) {
        self.series = series;
        self.group.layout_all(&self.series);
        self.group.jump_to_range(&self.series, DEFAULT_VISIBLE_BARS);
        self.dirty = true;
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    // ---- panes --------------------------------------------------------------

    /// Register a pane. The newest pane carries the date strip; earlier ones
    /// drop theirs. The first registered pane initializes the shared window
    /// to the trailing default range.
    pub fn add_pane(&mut self, kind: PaneKind, width: i32, height: i32) -> PaneId {
        let id = self.group.register(kind, width, height);
        let count = self.group.len();
        for pane in self.group.panes_mut() {
            pane.show_time_axis = pane.id == id;
        }
        self.group.layout_all(&self.series);
        if count == 1 {
            self.group.jump_to_range(&self.series, DEFAULT_VISIBLE_BARS);
            self.group.layout_all(&self.series);
        }
        self.dirty = true;
        id
    }

    pub fn remove_pane(&mut self, id: PaneId) -> bool {
        let removed = self.group.unregister(id);
        if removed {
            if let Some(bottom) = self.group.panes().last().map(|p| p.id) {
                for pane in self.group.panes_mut() {
                    pane.show_time_axis = pane.id == bottom;
                }
            }
            self.dirty = true;
        }
        removed
    }

    pub fn resize_pane(&mut self, id: PaneId, width: i32, height: i32) {
        if let Some(pane) = self.group.pane_mut(id) {
            pane.resize(width, height);
            self.group.layout_all(&self.series);
            self.dirty = true;
        }
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.group.pane(id)
    }

    pub fn panes(&self) -> &[Pane] {
        self.group.panes()
    }

    pub fn visible_range(&self) -> Option<LogicalRange> {
        self.group.common_range()
    }

    // ---- range control ------------------------------------------------------

    pub fn set_range(&mut self, origin: PaneId, range: LogicalRange) {
        self.group.set_range(origin, range);
        self.group.layout_all(&self.series);
        self.dirty = true;
    }

    pub fn jump_to_range(&mut self, days: usize) {
        self.group.jump_to_range(&self.series, days);
        self.after_range_op();
    }

    pub fn zoom_in(&mut self) {
        self.group.zoom_in();
        self.after_range_op();
    }

    pub fn zoom_out(&mut self) {
        self.group.zoom_out();
        self.after_range_op();
    }

    pub fn pan_left(&mut self) {
        self.group.pan_left(&self.series);
        self.after_range_op();
    }

    pub fn pan_right(&mut self) {
        self.group.pan_right(&self.series);
        self.after_range_op();
    }

    pub fn jump_to_latest(&mut self) {
        self.group.jump_to_latest(&self.series);
        self.after_range_op();
    }

    pub fn jump_to_earliest(&mut self) {
        self.group.jump_to_earliest(&self.series);
        self.after_range_op();
    }

    fn after_range_op(&mut self) {
        self.group.layout_all(&self.series);
        self.dirty = true;
    }

    // ---- drawings -----------------------------------------------------------

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.drawings.set_mode(mode);
        self.dirty = true;
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.drawings.mode()
    }

    pub fn drawings(&self) -> &[DrawingObject] {
        self.drawings.objects()
    }

    pub fn add_drawing(
        &mut self,
        kind: DrawingKind,
        points: Vec<ChartPoint>,
        text: Option<String>,
    ) -> Result<DrawingId, &'static str> {
        let id = self.drawings.add(kind, points, text)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn delete_drawing(&mut self, id: DrawingId) -> bool {
        let removed = self.drawings.delete(id);
        self.dirty |= removed;
        removed
    }

    pub fn select_drawing(&mut self, id: Option<DrawingId>) {
        self.drawings.select(id);
        self.dirty = true;
    }

    pub fn selected_drawing(&self) -> Option<DrawingId> {
        self.drawings.selected()
    }

    // ---- pointer routing ----------------------------------------------------
    //
    // In `Off` mode nothing is intercepted; the host's own pan/zoom/crosshair
    // handling stays in charge of the pointer.

    pub fn pointer_down(&mut self, pane_id: PaneId, x: f32, y: f32) {
        if self.drawings.mode() == InteractionMode::Off {
            return;
        }
        let Some(pane) = self.group.pane(pane_id) else { return };
        self.drawings.pointer_down(pane, x, y);
        self.dirty = true;
    }

    pub fn pointer_move(&mut self, pane_id: PaneId, x: f32, y: f32) {
        if self.drawings.mode() == InteractionMode::Off {
            return;
        }
        let Some(pane) = self.group.pane(pane_id) else { return };
        self.drawings.pointer_move(pane, x, y);
    }

    pub fn pointer_up(&mut self, pane_id: PaneId, x: f32, y: f32) -> Option<DrawingId> {
        if self.drawings.mode() == InteractionMode::Off {
            return None;
        }
        let Some(pane) = self.group.pane(pane_id) else { return None };
        let committed = self.drawings.pointer_up(pane, x, y);
        self.dirty = true;
        committed
    }

    pub fn pointer_leave(&mut self, pane_id: PaneId) -> Option<DrawingId> {
        let Some(pane) = self.group.pane(pane_id) else { return None };
        let committed = self.drawings.pointer_leave(pane);
        self.dirty |= committed.is_some();
        committed
    }

    pub fn pending_text(&self) -> bool {
        self.drawings.pending_text()
    }

    pub fn confirm_text(&mut self, pane_id: PaneId, label: &str) -> Option<DrawingId> {
        let Some(pane) = self.group.pane(pane_id) else { return None };
        let committed = self.drawings.confirm_text(pane, label);
        self.dirty |= committed.is_some();
        committed
    }

    pub fn cancel_text(&mut self) {
        self.drawings.cancel_text();
    }

    // ---- rendering & export -------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Re-layout and rasterize every pane. The owner of the frame loop calls
    /// this when `is_dirty` reports pending work.
    pub fn redraw(&mut self) -> Result<Vec<PaneFrame>, ChartError> {
        self.group.layout_all(&self.series);
        let mut frames = Vec::with_capacity(self.group.len());
        for pane in self.group.panes() {
            let frame = render::render_pane_rgba(
                pane,
                &self.series,
                self.drawings.objects(),
                self.drawings.selected(),
                &self.theme,
                &self.shaper,
            )
            .map_err(ChartError::Render)?;
            frames.push(frame);
        }
        self.dirty = false;
        Ok(frames)
    }

    /// Fitted snapshot export; the live viewport is untouched afterwards.
    pub fn capture(&mut self, target_date: Option<NaiveDate>) -> Result<Vec<PaneSnapshot>, ChartError> {
        capture::capture(
            &mut self.group,
            &self.series,
            self.drawings.objects(),
            self.drawings.selected(),
            &self.theme,
            &self.shaper,
            target_date,
        )
    }
}
