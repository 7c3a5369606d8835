// File: crates/kline-core/src/drawing/interact.rs
// Summary: Interaction state machine building annotations from pointer input.

use log::warn;
use skia_safe as skia;

use crate::drawing::hit::hit_test;
use crate::drawing::{DrawingId, DrawingKind, DrawingObject};
use crate::pane::Pane;
use crate::transform::{pixel_to_chart, ChartPoint};

/// Exactly one mode is active at a time. `Off` intercepts nothing (pan/zoom
/// and crosshair stay untouched), `Select` hit-tests clicks, `Draw` captures
/// pointer gestures into one new object. Switching modes cancels any capture
/// in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Off,
    Select,
    Draw(DrawingKind),
}

/// In-progress capture. Pixel positions only; conversion to chart space
/// happens once, at commit time.
#[derive(Clone, Debug)]
enum Draft {
    /// Single-gesture capture (every kind except the channel's second step).
    Pending {
        kind: DrawingKind,
        anchor: (f32, f32),
        last: (f32, f32),
    },
    /// Channel step 1: baseline committed, waiting for the offset anchor.
    ChannelOffset {
        baseline: [ChartPoint; 2],
        dragging: bool,
        last: (f32, f32),
    },
    /// Text annotation waiting for its inline input to be confirmed.
    TextEntry { at: (f32, f32) },
}

/// Owns the persisted drawing set and the capture state machine. Never
/// mutates pane internals; all geometry flows through the coordinate
/// transform.
pub struct DrawingEngine {
    objects: Vec<DrawingObject>,
    mode: InteractionMode,
    draft: Option<Draft>,
    selected: Option<DrawingId>,
    next_id: u64,
    default_color: skia::Color,
}

impl DrawingEngine {
    pub fn new(default_color: skia::Color) -> Self {
        Self {
            objects: Vec::new(),
            mode: InteractionMode::Off,
            draft: None,
            selected: None,
            next_id: 1,
            default_color,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch modes, discarding any in-progress capture.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.draft = None;
        if mode != InteractionMode::Select {
            self.selected = None;
        }
        self.mode = mode;
    }

    pub fn objects(&self) -> &[DrawingObject] {
        &self.objects
    }

    pub fn selected(&self) -> Option<DrawingId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<DrawingId>) {
        self.selected = id.filter(|id| self.objects.iter().any(|o| o.id == *id));
    }

    /// Insert a fully specified object on behalf of the host UI.
    pub fn add(
        &mut self,
        kind: DrawingKind,
        points: Vec<ChartPoint>,
        text: Option<String>,
    ) -> Result<DrawingId, &'static str> {
        let id = self.alloc_id();
        let obj = DrawingObject::try_new(id, kind, points, self.default_color, text)?;
        self.objects.push(obj);
        Ok(id)
    }

    /// Delete by id. Objects are never edited in place; delete-and-redraw is
    /// the only mutation.
    pub fn delete(&mut self, id: DrawingId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| o.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.objects.len() != before
    }

    /// Session reset: drop every object, the selection, and any draft.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected = None;
        self.draft = None;
    }

    /// True while a text annotation waits for its inline input.
    pub fn pending_text(&self) -> bool {
        matches!(self.draft, Some(Draft::TextEntry { .. }))
    }

    // ---- pointer protocol ---------------------------------------------------

    pub fn pointer_down(&mut self, pane: &Pane, x: f32, y: f32) {
        match self.mode {
            InteractionMode::Off => {}
            InteractionMode::Select => {
                self.selected = hit_test(&self.objects, pane, x, y);
            }
            InteractionMode::Draw(kind) => match &mut self.draft {
                Some(Draft::ChannelOffset { dragging, last, .. }) => {
                    *dragging = true;
                    *last = (x, y);
                }
                Some(_) => {}
                None => {
                    if kind == DrawingKind::Text {
                        self.draft = Some(Draft::TextEntry { at: (x, y) });
                    } else {
                        self.draft = Some(Draft::Pending { kind, anchor: (x, y), last: (x, y) });
                    }
                }
            },
        }
    }

    pub fn pointer_move(&mut self, _pane: &Pane, x: f32, y: f32) {
        match &mut self.draft {
            Some(Draft::Pending { last, .. }) => *last = (x, y),
            Some(Draft::ChannelOffset { dragging: true, last, .. }) => *last = (x, y),
            _ => {}
        }
    }

    pub fn pointer_up(&mut self, pane: &Pane, x: f32, y: f32) -> Option<DrawingId> {
        match self.draft.take() {
            Some(Draft::Pending { kind, anchor, .. }) => {
                self.finish_pending(pane, kind, anchor, (x, y))
            }
            Some(Draft::ChannelOffset { baseline, dragging: true, .. }) => {
                self.commit_channel(pane, baseline, (x, y))
            }
            other => {
                self.draft = other;
                None
            }
        }
    }

    /// Pointer left the capture surface. A single-step draw in progress
    /// auto-commits at the last known position; the channel's baseline step
    /// is abandoned instead, since no valid object can be formed from it.
    pub fn pointer_leave(&mut self, pane: &Pane) -> Option<DrawingId> {
        match self.draft.take() {
            Some(Draft::Pending { kind: DrawingKind::Channel, .. }) => None,
            Some(Draft::Pending { kind, anchor, last }) => {
                self.finish_pending(pane, kind, anchor, last)
            }
            Some(Draft::ChannelOffset { baseline, dragging: true, last }) => {
                self.commit_channel(pane, baseline, last)
            }
            Some(Draft::ChannelOffset { .. }) => None,
            Some(entry @ Draft::TextEntry { .. }) => {
                // Inline input stays open; leaving the canvas is not a cancel.
                self.draft = Some(entry);
                None
            }
            None => None,
        }
    }

    /// Commit the pending text annotation with the entered label.
    pub fn confirm_text(&mut self, pane: &Pane, label: &str) -> Option<DrawingId> {
        match self.draft.take() {
            Some(Draft::TextEntry { at }) => {
                if label.is_empty() {
                    return None;
                }
                let Some(pt) = pixel_to_chart(pane, at.0, at.1) else {
                    warn!("discarding text annotation: pane not ready for chart-space conversion");
                    return None;
                };
                self.push_object(DrawingKind::Text, vec![pt], Some(label.to_string()))
            }
            other => {
                self.draft = other;
                None
            }
        }
    }

    pub fn cancel_text(&mut self) {
        if matches!(self.draft, Some(Draft::TextEntry { .. })) {
            self.draft = None;
        }
    }

    // ---- commit helpers -----------------------------------------------------

    fn finish_pending(
        &mut self,
        pane: &Pane,
        kind: DrawingKind,
        anchor: (f32, f32),
        end: (f32, f32),
    ) -> Option<DrawingId> {
        let a = pixel_to_chart(pane, anchor.0, anchor.1);
        let b = pixel_to_chart(pane, end.0, end.1);
        let (Some(a), Some(b)) = (a, b) else {
            warn!("discarding {kind:?} draw: chart-space conversion failed at commit");
            return None;
        };
        match kind {
            DrawingKind::Horizontal | DrawingKind::Vertical => {
                self.push_object(kind, vec![b], None)
            }
            DrawingKind::Channel => {
                // Step 0 done: keep the baseline and wait for the offset anchor.
                self.draft = Some(Draft::ChannelOffset {
                    baseline: [a, b],
                    dragging: false,
                    last: end,
                });
                None
            }
            _ => self.push_object(kind, vec![a, b], None),
        }
    }

    fn commit_channel(
        &mut self,
        pane: &Pane,
        baseline: [ChartPoint; 2],
        end: (f32, f32),
    ) -> Option<DrawingId> {
        let Some(offset) = pixel_to_chart(pane, end.0, end.1) else {
            warn!("discarding channel draw: chart-space conversion failed at commit");
            return None;
        };
        self.push_object(
            DrawingKind::Channel,
            vec![baseline[0], baseline[1], offset],
            None,
        )
    }

    fn push_object(
        &mut self,
        kind: DrawingKind,
        points: Vec<ChartPoint>,
        text: Option<String>,
    ) -> Option<DrawingId> {
        let id = self.alloc_id();
        match DrawingObject::try_new(id, kind, points, self.default_color, text) {
            Ok(obj) => {
                self.objects.push(obj);
                Some(id)
            }
            Err(reason) => {
                warn!("discarding {kind:?} draw: {reason}");
                None
            }
        }
    }

    fn alloc_id(&mut self) -> DrawingId {
        let id = DrawingId(self.next_id);
        self.next_id += 1;
        id
    }
}
