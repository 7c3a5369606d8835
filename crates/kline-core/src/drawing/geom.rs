// File: crates/kline-core/src/drawing/geom.rs
// Summary: Pixel-space line math: segment distance, edge extension.

/// Plot rectangle in pixels: (left, top, right, bottom).
pub type PlotRect = (f32, f32, f32, f32);

/// Distance from point `p` to segment `a`-`b`, with the projection parameter
/// clamped to `t in [0, 1]`. Degenerate segments collapse to point distance.
pub fn dist_point_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (px, py) = p;
    let (ax, ay) = a;
    let (bx, by) = b;
    let dx = bx - ax;
    let dy = by - ay;
    let len2 = dx * dx + dy * dy;
    if len2 <= f32::EPSILON {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0);
    let cx = ax + t * dx;
    let cy = ay + t * dy;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Walk from `anchor` along `dir` to the plot boundary: the minimal positive
/// `t` where `anchor + t*dir` crosses the edge on whichever axis the
/// direction heads toward. `None` for a zero-length direction (the caller
/// renders a single-pixel marker instead of normalizing a null vector).
pub fn extend_to_rect(anchor: (f32, f32), dir: (f32, f32), rect: PlotRect) -> Option<(f32, f32)> {
    let (ax, ay) = anchor;
    let (ux, uy) = dir;
    let (left, top, right, bottom) = rect;
    let len = (ux * ux + uy * uy).sqrt();
    if len <= f32::EPSILON {
        return None;
    }
    let (ux, uy) = (ux / len, uy / len);
    let tx = if ux > 0.0 {
        (right - ax) / ux
    } else if ux < 0.0 {
        (left - ax) / ux
    } else {
        f32::INFINITY
    };
    let ty = if uy > 0.0 {
        (bottom - ay) / uy
    } else if uy < 0.0 {
        (top - ay) / uy
    } else {
        f32::INFINITY
    };
    let t = tx.min(ty).max(0.0);
    if !t.is_finite() {
        return None;
    }
    Some((ax + t * ux, ay + t * uy))
}

/// Endpoints of the line through `a` and `b` extended to both plot edges.
/// `None` when the two anchors coincide.
pub fn trendline_pixels(a: (f32, f32), b: (f32, f32), rect: PlotRect) -> Option<((f32, f32), (f32, f32))> {
    let dir = (b.0 - a.0, b.1 - a.1);
    let fwd = extend_to_rect(a, dir, rect)?;
    let back = extend_to_rect(a, (-dir.0, -dir.1), rect)?;
    Some((back, fwd))
}

/// Endpoints of the ray from `a` through `b`, extended past `b` only.
pub fn ray_pixels(a: (f32, f32), b: (f32, f32), rect: PlotRect) -> Option<((f32, f32), (f32, f32))> {
    let dir = (b.0 - a.0, b.1 - a.1);
    let fwd = extend_to_rect(a, dir, rect)?;
    Some((a, fwd))
}

/// Axis-aligned bounds of two pixel points, grown outward by `margin`.
pub fn bounds_with_margin(a: (f32, f32), b: (f32, f32), margin: f32) -> (f32, f32, f32, f32) {
    (
        a.0.min(b.0) - margin,
        a.1.min(b.1) - margin,
        a.0.max(b.0) + margin,
        a.1.max(b.1) + margin,
    )
}

/// Point-in-box test against `(left, top, right, bottom)`.
pub fn contains(bounds: (f32, f32, f32, f32), p: (f32, f32)) -> bool {
    p.0 >= bounds.0 && p.0 <= bounds.2 && p.1 >= bounds.1 && p.1 <= bounds.3
}
