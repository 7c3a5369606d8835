// File: crates/kline-core/src/drawing/render.rs
// Summary: Draw the annotation overlay onto a pane's canvas.

use skia_safe as skia;

use crate::drawing::geom;
use crate::drawing::{DrawingId, DrawingKind, DrawingObject, FIB_LEVELS, GOLDEN_LEVELS};
use crate::pane::Pane;
use crate::text::TextShaper;
use crate::theme::Theme;
use crate::transform::{chart_to_pixel, ChartPoint};

const LABEL_SIZE: f32 = 11.0;
const TEXT_SIZE: f32 = 13.0;
const HANDLE_HALF: f32 = 3.0;

/// Render every drawing over the pane's plot area, clipped to it. Pixel
/// geometry is derived from the current transform here and nowhere else;
/// the stored chart-space points are never touched.
pub fn draw_overlay(
    canvas: &skia::Canvas,
    pane: &Pane,
    objects: &[DrawingObject],
    selected: Option<DrawingId>,
    theme: &Theme,
    shaper: &TextShaper,
) {
    if !pane.is_ready() {
        return;
    }
    let rect = (pane.plot_left(), pane.plot_top(), pane.plot_right(), pane.plot_bottom());
    canvas.save();
    canvas.clip_rect(
        skia::Rect::from_ltrb(rect.0, rect.1, rect.2, rect.3),
        None,
        Some(true),
    );
    for obj in objects {
        let is_selected = selected == Some(obj.id);
        let color = if is_selected { theme.selection } else { obj.color };
        draw_object(canvas, pane, obj, color, rect, theme, shaper);
        if is_selected {
            draw_handles(canvas, pane, obj, theme);
        }
    }
    canvas.restore();
}

fn draw_object(
    canvas: &skia::Canvas,
    pane: &Pane,
    obj: &DrawingObject,
    color: skia::Color,
    rect: geom::PlotRect,
    theme: &Theme,
    shaper: &TextShaper,
) {
    let px = |pt: ChartPoint| chart_to_pixel(pane, pt);
    match obj.kind {
        DrawingKind::Segment => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return };
            draw_line_or_marker(canvas, a, Some((a, b)), color);
        }
        DrawingKind::Trendline => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return };
            draw_line_or_marker(canvas, a, geom::trendline_pixels(a, b, rect), color);
        }
        DrawingKind::Ray => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return };
            draw_line_or_marker(canvas, a, geom::ray_pixels(a, b, rect), color);
        }
        DrawingKind::Horizontal => {
            let Some((_, y)) = px(obj.points[0]) else { return };
            canvas.draw_line((rect.0, y), (rect.2, y), &stroke(color, 1.5));
        }
        DrawingKind::Vertical => {
            let Some((x, _)) = px(obj.points[0]) else { return };
            canvas.draw_line((x, rect.1), (x, rect.3), &stroke(color, 1.5));
        }
        DrawingKind::Channel => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return };
            let Some(offset) = obj.channel_offset() else { return };
            let shift = |pt: ChartPoint| ChartPoint::new(pt.index, pt.price + offset);
            let (Some(a2), Some(b2)) = (px(shift(obj.points[0])), px(shift(obj.points[1]))) else {
                return;
            };
            let mut path = skia::Path::new();
            path.move_to(a);
            path.line_to(b);
            path.line_to(b2);
            path.line_to(a2);
            path.close();
            canvas.draw_path(&path, &fill(theme.drawing_fill));
            let pen = stroke(color, 2.0);
            canvas.draw_line(a, b, &pen);
            canvas.draw_line(a2, b2, &pen);
        }
        DrawingKind::Fibonacci => {
            draw_level_grid(canvas, pane, obj, color, &FIB_LEVELS, None, shaper);
        }
        DrawingKind::GoldenRatio => {
            draw_level_grid(canvas, pane, obj, color, &GOLDEN_LEVELS, Some(theme.golden_band), shaper);
        }
        DrawingKind::Rectangle => {
            let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return };
            let r = skia::Rect::from_ltrb(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1));
            canvas.draw_rect(r, &fill(theme.drawing_fill));
            canvas.draw_rect(r, &stroke(color, 1.5));
        }
        DrawingKind::Text => {
            let Some((x, y)) = px(obj.points[0]) else { return };
            if let Some(label) = obj.text.as_deref() {
                shaper.draw_left(canvas, label, x, y, TEXT_SIZE, color, false);
            }
        }
    }
}

/// Extended line when the endpoints resolve, single-pixel marker when the
/// direction vector has zero length. The marker keeps degenerate drawings
/// visible instead of dividing by zero in the extension math.
fn draw_line_or_marker(
    canvas: &skia::Canvas,
    anchor: (f32, f32),
    endpoints: Option<((f32, f32), (f32, f32))>,
    color: skia::Color,
) {
    match endpoints {
        Some((e0, e1)) if e0 != e1 => {
            canvas.draw_line(e0, e1, &stroke(color, 2.0));
        }
        _ => {
            let r = skia::Rect::from_ltrb(anchor.0 - 0.5, anchor.1 - 0.5, anchor.0 + 0.5, anchor.1 + 0.5);
            canvas.draw_rect(r, &fill(color));
        }
    }
}

/// Horizontal level lines interpolated between the two anchor prices, each
/// labeled with its percentage. The golden variant shades its .382-.618 band
/// and emphasizes the .618 line.
fn draw_level_grid(
    canvas: &skia::Canvas,
    pane: &Pane,
    obj: &DrawingObject,
    color: skia::Color,
    levels: &[f64],
    band: Option<skia::Color>,
    shaper: &TextShaper,
) {
    let px = |pt: ChartPoint| chart_to_pixel(pane, pt);
    let (Some(a), Some(b)) = (px(obj.points[0]), px(obj.points[1])) else { return };
    let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
    let (p0, p1) = (obj.points[0].price, obj.points[1].price);
    let level_y = |l: f64| -> Option<f32> {
        let price = p0 + (p1 - p0) * l;
        px(ChartPoint::new(obj.points[0].index, price)).map(|(_, y)| y)
    };
    if let Some(band_color) = band {
        if let (Some(ya), Some(yb)) = (level_y(0.382), level_y(0.618)) {
            let r = skia::Rect::from_ltrb(x0, ya.min(yb), x1, ya.max(yb));
            canvas.draw_rect(r, &fill(band_color));
        }
    }
    for &l in levels {
        let Some(y) = level_y(l) else { continue };
        let width = if band.is_some() && (l - 0.618).abs() < 1e-9 { 2.5 } else { 1.2 };
        canvas.draw_line((x0, y), (x1, y), &stroke(color, width));
        let label = format!("{:.1}%", l * 100.0);
        shaper.draw_left(canvas, &label, x0 + 3.0, y - 2.0, LABEL_SIZE, color, true);
    }
}

/// Small square handles at each stored vertex of the selected object; the
/// delete affordance anchors to these.
fn draw_handles(canvas: &skia::Canvas, pane: &Pane, obj: &DrawingObject, theme: &Theme) {
    for pt in &obj.points {
        if let Some((x, y)) = chart_to_pixel(pane, *pt) {
            let r = skia::Rect::from_ltrb(
                x - HANDLE_HALF,
                y - HANDLE_HALF,
                x + HANDLE_HALF,
                y + HANDLE_HALF,
            );
            canvas.draw_rect(r, &fill(theme.selection));
        }
    }
}

fn stroke(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    paint
}

fn fill(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color);
    paint
}
