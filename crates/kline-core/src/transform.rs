// File: crates/kline-core/src/transform.rs
// Summary: Pure pixel <-> chart-space conversion for one pane.

use crate::pane::Pane;

/// A vertex in chart space: (logical index, price). The only representation
/// ever persisted for annotation geometry; invariant under pan/zoom/resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    pub index: f64,
    pub price: f64,
}

impl ChartPoint {
    pub fn new(index: f64, price: f64) -> Self {
        Self { index, price }
    }
}

/// Map a pixel position to chart space. `None` while the pane's scales are
/// not yet established or the result is not representable; callers retry on
/// the next frame instead of treating this as an error.
pub fn pixel_to_chart(pane: &Pane, px: f32, py: f32) -> Option<ChartPoint> {
    let ts = pane.time_scale()?;
    let ps = pane.price_scale()?;
    let index = ts.from_px(px);
    let price = ps.from_px(py);
    if !index.is_finite() || !price.is_finite() {
        return None;
    }
    Some(ChartPoint { index, price })
}

/// Map a chart-space point back to pixels. Points outside the visible window
/// still convert (drawings are clipped at render time); only unready scales
/// or unrepresentable values yield `None`.
pub fn chart_to_pixel(pane: &Pane, point: ChartPoint) -> Option<(f32, f32)> {
    let ts = pane.time_scale()?;
    let ps = pane.price_scale()?;
    let x = ts.to_px(point.index);
    let y = ps.to_px(point.price);
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((x, y))
}
