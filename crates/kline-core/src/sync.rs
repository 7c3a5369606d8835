// File: crates/kline-core/src/sync.rs
// Summary: Pane registry and lock-step range synchronization.

use crate::pane::{Pane, PaneKind};
use crate::scale::LogicalRange;
use crate::series::DataSeries;
use crate::types::{PaneId, RIGHT_MARGIN_BARS};

/// Registry of panes sharing one logical-index axis. Replaces per-pane global
/// chart handles with explicit register/unregister lifecycle; all range
/// propagation funnels through here.
///
/// Propagation is origin-tagged: the pane that initiated a change is the only
/// emitter, receiving panes adopt silently, and a guard flag rejects
/// re-entrant notifications. Propagation therefore terminates in exactly one
/// hop no matter how many panes are registered.
#[derive(Debug, Default)]
pub struct PaneGroup {
    panes: Vec<Pane>,
    next_id: u32,
    propagating: bool,
    range_events: u64,
}

impl PaneGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pane and return its handle. New panes adopt the group's
    /// current range so they join the lock-step window immediately.
    pub fn register(&mut self, kind: PaneKind, width: i32, height: i32) -> PaneId {
        let id = PaneId(self.next_id);
        self.next_id += 1;
        let mut pane = Pane::new(id, kind, width, height);
        if let Some(range) = self.common_range() {
            pane.adopt_range(range);
        }
        self.panes.push(pane);
        id
    }

    /// Remove a pane from the registry. Returns false for unknown ids.
    pub fn unregister(&mut self, id: PaneId) -> bool {
        let before = self.panes.len();
        self.panes.retain(|p| p.id != id);
        self.panes.len() != before
    }

    pub fn len(&self) -> usize { self.panes.len() }
    pub fn is_empty(&self) -> bool { self.panes.is_empty() }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id == id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id == id)
    }

    pub fn panes(&self) -> &[Pane] { &self.panes }

    pub fn panes_mut(&mut self) -> &mut [Pane] { &mut self.panes }

    /// The shared visible range. All panes agree after any propagation pass;
    /// the first pane is authoritative.
    pub fn common_range(&self) -> Option<LogicalRange> {
        self.panes.first().map(|p| p.visible())
    }

    /// Count of range-change notifications emitted so far. Exactly one per
    /// accepted `set_range` pass; silent adoption does not count.
    pub fn range_events(&self) -> u64 { self.range_events }

    /// Range-change entry point, tagged with the originating pane. Applies
    /// `range` to the origin and every sibling. Re-entrant calls (a receiving
    /// pane echoing the change back) are dropped by the guard, so propagation
    /// is single-hop by construction.
    pub fn set_range(&mut self, origin: PaneId, range: LogicalRange) {
        if self.propagating {
            return;
        }
        if range.width() <= 0.0 || !range.from.is_finite() || !range.to.is_finite() {
            return;
        }
        let Some(current) = self.pane(origin).map(|p| p.visible()) else {
            return;
        };
        if current == range {
            return; // no change, no event
        }
        self.propagating = true;
        self.range_events += 1;
        for pane in &mut self.panes {
            pane.adopt_range(range);
        }
        self.propagating = false;
    }

    /// Apply a range to every pane without emitting an event. Used by the
    /// capture transaction so transient viewport mutation stays invisible to
    /// range listeners.
    pub(crate) fn apply_all_silent(&mut self, range: LogicalRange) {
        for pane in &mut self.panes {
            pane.adopt_range(range);
        }
    }

    /// Undo log for the capture transaction.
    pub(crate) fn snapshot_ranges(&self) -> Vec<(PaneId, LogicalRange)> {
        self.panes.iter().map(|p| (p.id, p.visible())).collect()
    }

    pub(crate) fn restore_ranges(&mut self, log: &[(PaneId, LogicalRange)]) {
        for (id, range) in log {
            if let Some(pane) = self.pane_mut(*id) {
                pane.adopt_range(*range);
            }
        }
    }

    /// Re-layout every pane: the cooperative render tick. Called once per
    /// frame by the board and once inside capture as the barrier between
    /// viewport mutation and raster readback.
    pub fn layout_all(&mut self, series: &DataSeries) {
        for pane in &mut self.panes {
            pane.layout(series);
        }
    }

    // ---- derived range operations -------------------------------------------
    //
    // All of these compute one new window from the current shared range and
    // apply it to every pane atomically. They are no-ops until at least one
    // pane is registered, measured, and laid out.

    /// Show the trailing `days` bars plus the small right margin.
    pub fn jump_to_range(&mut self, series: &DataSeries, days: usize) {
        let Some(origin) = self.ready_origin() else { return };
        let Some(last) = series.last_index() else { return };
        let from = (last as f64 - days as f64).max(0.0);
        let to = last as f64 + RIGHT_MARGIN_BARS;
        self.set_range(origin, LogicalRange::new(from, to));
    }

    /// Scale the window width by 0.7 around its midpoint.
    pub fn zoom_in(&mut self) {
        self.zoom_by(0.7);
    }

    /// Scale the window width by 1.4 around its midpoint.
    pub fn zoom_out(&mut self) {
        self.zoom_by(1.4);
    }

    fn zoom_by(&mut self, factor: f64) {
        let Some(origin) = self.ready_origin() else { return };
        let Some(range) = self.common_range() else { return };
        self.set_range(origin, range.scaled_about_midpoint(factor));
    }

    /// Shift the window left by 30% of its width, clamped at the data start.
    pub fn pan_left(&mut self, _series: &DataSeries) {
        let Some(origin) = self.ready_origin() else { return };
        let Some(range) = self.common_range() else { return };
        let mut delta = -0.3 * range.width();
        if range.from + delta < 0.0 {
            delta = -range.from;
        }
        if delta == 0.0 {
            return;
        }
        self.set_range(origin, range.shifted(delta));
    }

    /// Shift the window right by 30% of its width, clamped so `to` never
    /// exceeds the data length plus the right margin.
    pub fn pan_right(&mut self, series: &DataSeries) {
        let Some(origin) = self.ready_origin() else { return };
        let Some(range) = self.common_range() else { return };
        let limit = series.len() as f64 + RIGHT_MARGIN_BARS;
        let mut delta = 0.3 * range.width();
        if range.to + delta > limit {
            delta = (limit - range.to).max(0.0);
        }
        if delta == 0.0 {
            return;
        }
        self.set_range(origin, range.shifted(delta));
    }

    /// Slide the window so its right edge sits past the newest bar,
    /// preserving width.
    pub fn jump_to_latest(&mut self, series: &DataSeries) {
        let Some(origin) = self.ready_origin() else { return };
        let Some(range) = self.common_range() else { return };
        let Some(last) = series.last_index() else { return };
        let to = last as f64 + RIGHT_MARGIN_BARS;
        self.set_range(origin, LogicalRange::new(to - range.width(), to));
    }

    /// Slide the window to the oldest data, preserving width.
    pub fn jump_to_earliest(&mut self, _series: &DataSeries) {
        let Some(origin) = self.ready_origin() else { return };
        let Some(range) = self.common_range() else { return };
        self.set_range(origin, LogicalRange::new(0.0, range.width()));
    }

    /// The pane a derived operation is attributed to: the first ready one.
    /// No ready pane (nothing measured yet) makes every derived op a no-op.
    fn ready_origin(&self) -> Option<PaneId> {
        self.panes.iter().find(|p| p.is_ready()).map(|p| p.id)
    }
}
