// File: crates/kline-core/src/drawing/hit.rs
// Summary: Per-kind pixel-space proximity tests; newest object wins overlaps.

use crate::drawing::geom;
use crate::drawing::{DrawingId, DrawingKind, DrawingObject};
use crate::pane::Pane;
use crate::transform::{chart_to_pixel, ChartPoint};

/// Proximity threshold for line-like kinds, in pixels.
pub const HIT_THRESHOLD_PX: f32 = 10.0;
/// Outward margin for box containment (rectangle, fib, golden).
pub const BOX_MARGIN_PX: f32 = 4.0;
/// Label metrics used to approximate a text annotation's box.
const TEXT_SIZE_PX: f32 = 13.0;
const TEXT_ADVANCE_RATIO: f32 = 0.6;

/// Topmost (most recently added) object under the pointer, if any.
pub fn hit_test(objects: &[DrawingObject], pane: &Pane, x: f32, y: f32) -> Option<DrawingId> {
    objects
        .iter()
        .rev()
        .find(|obj| hit_object(obj, pane, x, y))
        .map(|obj| obj.id)
}

fn hit_object(obj: &DrawingObject, pane: &Pane, x: f32, y: f32) -> bool {
    let p = (x, y);
    let rect = plot_rect(pane);
    let px = |pt: ChartPoint| chart_to_pixel(pane, pt);
    match obj.kind {
        DrawingKind::Segment => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return false };
            geom::dist_point_segment(p, a, b) <= HIT_THRESHOLD_PX
        }
        DrawingKind::Trendline => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return false };
            match geom::trendline_pixels(a, b, rect) {
                Some((e0, e1)) => geom::dist_point_segment(p, e0, e1) <= HIT_THRESHOLD_PX,
                None => geom::dist_point_segment(p, a, a) <= HIT_THRESHOLD_PX,
            }
        }
        DrawingKind::Ray => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return false };
            match geom::ray_pixels(a, b, rect) {
                Some((e0, e1)) => geom::dist_point_segment(p, e0, e1) <= HIT_THRESHOLD_PX,
                None => geom::dist_point_segment(p, a, a) <= HIT_THRESHOLD_PX,
            }
        }
        DrawingKind::Horizontal => {
            let Some((_, ly)) = px(obj.points[0]) else { return false };
            (y - ly).abs() <= HIT_THRESHOLD_PX
        }
        DrawingKind::Vertical => {
            let Some((lx, _)) = px(obj.points[0]) else { return false };
            (x - lx).abs() <= HIT_THRESHOLD_PX
        }
        DrawingKind::Channel => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return false };
            let Some(offset) = obj.channel_offset() else { return false };
            let shift = |pt: ChartPoint| ChartPoint::new(pt.index, pt.price + offset);
            let (Some(a2), Some(b2)) = (px(shift(obj.points[0])), px(shift(obj.points[1]))) else {
                return false;
            };
            geom::dist_point_segment(p, a, b) <= HIT_THRESHOLD_PX
                || geom::dist_point_segment(p, a2, b2) <= HIT_THRESHOLD_PX
        }
        DrawingKind::Rectangle | DrawingKind::Fibonacci | DrawingKind::GoldenRatio => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return false };
            geom::contains(geom::bounds_with_margin(a, b, BOX_MARGIN_PX), p)
        }
        DrawingKind::Text => {
            let Some(anchor) = px(obj.points[0]) else { return false };
            let chars = obj.text.as_deref().map_or(0, |t| t.chars().count()) as f32;
            let w = (chars * TEXT_SIZE_PX * TEXT_ADVANCE_RATIO).max(TEXT_SIZE_PX);
            let h = TEXT_SIZE_PX * 1.4;
            geom::contains((anchor.0, anchor.1 - h, anchor.0 + w, anchor.1 + h * 0.4), p)
        }
    }
}

fn plot_rect(pane: &Pane) -> geom::PlotRect {
    (pane.plot_left(), pane.plot_top(), pane.plot_right(), pane.plot_bottom())
}
