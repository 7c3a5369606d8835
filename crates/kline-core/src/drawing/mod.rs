// File: crates/kline-core/src/drawing/mod.rs
// Summary: Annotation object model; geometry stored exclusively in chart space.

pub mod geom;
pub mod hit;
pub mod interact;
pub mod render;

use skia_safe as skia;

use crate::transform::ChartPoint;

pub use hit::{hit_test, HIT_THRESHOLD_PX};
pub use interact::{DrawingEngine, InteractionMode};

/// Retracement levels of the Fibonacci grid, with percentage labels.
pub const FIB_LEVELS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];
/// Levels of the golden-ratio grid; 0.618 is drawn emphasized and the band
/// between 0.382 and 0.618 is shaded.
pub const GOLDEN_LEVELS: [f64; 5] = [0.0, 0.382, 0.5, 0.618, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawingId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawingKind {
    /// Line through two points, extended to both plot edges.
    Trendline,
    /// Line confined to its two points.
    Segment,
    /// Line extended past the second point only.
    Ray,
    /// Full-width line at one price.
    Horizontal,
    /// Full-height line at one index.
    Vertical,
    /// Baseline plus a parallel line through the third point, filled between.
    Channel,
    /// Seven labeled retracement levels between two anchor prices.
    Fibonacci,
    /// Five levels, 0.618 emphasized, band shaded.
    GoldenRatio,
    /// Axis-aligned box spanning two points.
    Rectangle,
    /// Literal label anchored at one point.
    Text,
}

impl DrawingKind {
    /// Fixed vertex cardinality per kind.
    pub fn point_count(&self) -> usize {
        match self {
            DrawingKind::Horizontal | DrawingKind::Vertical | DrawingKind::Text => 1,
            DrawingKind::Channel => 3,
            _ => 2,
        }
    }

    /// Kinds captured in two interactive steps (baseline, then offset anchor).
    pub fn is_two_step(&self) -> bool {
        matches!(self, DrawingKind::Channel)
    }
}

/// One persisted annotation. Vertices live in chart space only; pixel
/// geometry is re-derived from the current transform on every redraw, so
/// pan/zoom/resize never touch the stored points.
#[derive(Clone, Debug)]
pub struct DrawingObject {
    pub id: DrawingId,
    pub kind: DrawingKind,
    pub points: Vec<ChartPoint>,
    pub color: skia::Color,
    pub text: Option<String>,
}

impl DrawingObject {
    /// Construct, enforcing the kind's vertex cardinality and requiring a
    /// label for text annotations.
    pub fn try_new(
        id: DrawingId,
        kind: DrawingKind,
        points: Vec<ChartPoint>,
        color: skia::Color,
        text: Option<String>,
    ) -> Result<Self, &'static str> {
        if points.len() != kind.point_count() {
            return Err("wrong vertex count for drawing kind");
        }
        if kind == DrawingKind::Text && text.as_deref().map_or(true, str::is_empty) {
            return Err("text annotation requires a label");
        }
        Ok(Self { id, kind, points, color, text })
    }

    /// Vertical chart-space offset of the channel's parallel line relative to
    /// its baseline: `p3.price - baseline_price_at(p3.index)`. Constant under
    /// any zoom, which is what keeps the two rendered lines parallel.
    pub fn channel_offset(&self) -> Option<f64> {
        if self.kind != DrawingKind::Channel {
            return None;
        }
        let [a, b, c] = [self.points[0], self.points[1], self.points[2]];
        let dx = b.index - a.index;
        let base_at_c = if dx.abs() < 1e-12 {
            a.price
        } else {
            a.price + (b.price - a.price) * (c.index - a.index) / dx
        };
        Some(c.price - base_at_c)
    }
}
