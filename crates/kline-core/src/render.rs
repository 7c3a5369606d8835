// File: crates/kline-core/src/render.rs
// Summary: Headless pane rendering pipeline using Skia CPU raster surfaces.

use anyhow::Result;
use skia_safe as skia;

use crate::drawing::render::draw_overlay;
use crate::drawing::{DrawingId, DrawingObject};
use crate::pane::{IndicatorKind, Pane, PaneKind};
use crate::series::DataSeries;
use crate::text::TextShaper;
use crate::theme::Theme;
use crate::types::PaneId;

const AXIS_LABEL_SIZE: f32 = 12.0;

/// One rendered frame of a pane, RGBA8, ready to blit.
#[derive(Debug)]
pub struct PaneFrame {
    pub pane_id: PaneId,
    pub rgba: Vec<u8>,
    pub width: i32,
    pub height: i32,
    pub stride: usize,
}

/// Render a pane to an RGBA8 buffer.
pub fn render_pane_rgba(
    pane: &Pane,
    series: &DataSeries,
    objects: &[DrawingObject],
    selected: Option<DrawingId>,
    theme: &Theme,
    shaper: &TextShaper,
) -> Result<PaneFrame> {
    let mut surface = paint_surface(pane, series, objects, selected, theme, shaper)?;
    let (w, h) = (pane.width, pane.height);
    let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
    let stride = w as usize * 4;
    let mut rgba = vec![0u8; stride * h as usize];
    if !surface.read_pixels(&info, &mut rgba, stride, (0, 0)) {
        anyhow::bail!("pixel readback failed");
    }
    Ok(PaneFrame { pane_id: pane.id, rgba, width: w, height: h, stride })
}

/// Render a pane and encode the raster as PNG bytes.
pub fn render_pane_png(
    pane: &Pane,
    series: &DataSeries,
    objects: &[DrawingObject],
    selected: Option<DrawingId>,
    theme: &Theme,
    shaper: &TextShaper,
) -> Result<Vec<u8>> {
    let mut surface = paint_surface(pane, series, objects, selected, theme, shaper)?;
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

fn paint_surface(
    pane: &Pane,
    series: &DataSeries,
    objects: &[DrawingObject],
    selected: Option<DrawingId>,
    theme: &Theme,
    shaper: &TextShaper,
) -> Result<skia::Surface> {
    let w = pane.width.max(1);
    let h = pane.height.max(1);
    let mut surface = skia::surfaces::raster_n32_premul((w, h))
        .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
    let canvas = surface.canvas();
    canvas.clear(theme.background);

    // Unmeasured/unlaid-out panes render as bare background.
    if !pane.is_ready() {
        return Ok(surface);
    }

    draw_grid(canvas, pane, theme);

    canvas.save();
    canvas.clip_rect(
        skia::Rect::from_ltrb(pane.plot_left(), pane.plot_top(), pane.plot_right(), pane.plot_bottom()),
        None,
        Some(true),
    );
    match pane.kind {
        PaneKind::Price => draw_price(canvas, pane, series, theme),
        PaneKind::Volume => draw_volume(canvas, pane, series, theme),
        PaneKind::Indicator(IndicatorKind::Rsi) => draw_rsi(canvas, pane, series, theme),
        PaneKind::Indicator(IndicatorKind::Macd) => draw_macd(canvas, pane, series, theme),
    }
    canvas.restore();

    draw_overlay(canvas, pane, objects, selected, theme, shaper);
    draw_axes(canvas, pane, series, theme, shaper);
    Ok(surface)
}

// ---- chrome -----------------------------------------------------------------

fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 {
        return vec![start, end];
    }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

fn draw_grid(canvas: &skia::Canvas, pane: &Pane, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid);
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);
    let (l, t, r, b) = (pane.plot_left(), pane.plot_top(), pane.plot_right(), pane.plot_bottom());
    for x in linspace(l as f64, r as f64, 9) {
        canvas.draw_line((x as f32, t), (x as f32, b), &paint);
    }
    for y in linspace(t as f64, b as f64, 5) {
        canvas.draw_line((l, y as f32), (r, y as f32), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, pane: &Pane, series: &DataSeries, theme: &Theme, shaper: &TextShaper) {
    let (l, t, r, b) = (pane.plot_left(), pane.plot_top(), pane.plot_right(), pane.plot_bottom());
    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(theme.axis_line);
    axis_paint.set_anti_alias(true);
    axis_paint.set_stroke_width(1.5);
    canvas.draw_line((l, b), (r, b), &axis_paint);
    canvas.draw_line((r, t), (r, b), &axis_paint);

    if !pane.draw_labels {
        return;
    }
    let Some(ps) = pane.price_scale() else { return };
    for v in linspace(ps.vmin, ps.vmax, 5) {
        let y = ps.to_px(v);
        let label = format_value(v);
        shaper.draw_left(canvas, &label, r + 4.0, y + 4.0, AXIS_LABEL_SIZE, theme.axis_label, true);
    }

    if pane.show_time_axis {
        let Some(ts) = pane.time_scale() else { return };
        for x in linspace(ts.range.from, ts.range.to, 6) {
            let idx = x.round();
            if idx < 0.0 {
                continue;
            }
            let Some(date) = series.date_at(idx as usize) else { continue };
            let px = ts.to_px(idx);
            shaper.draw_centered(
                canvas,
                &date.format("%Y-%m-%d").to_string(),
                px,
                b + 16.0,
                AXIS_LABEL_SIZE,
                theme.axis_label,
                true,
            );
        }
    }
}

fn format_value(v: f64) -> String {
    if v.abs() >= 10_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 10_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else if v.abs() >= 100.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.2}", v)
    }
}

// ---- content ----------------------------------------------------------------

/// Integer bar indices covered by the pane's visible window.
fn visible_indices(pane: &Pane, len: usize) -> std::ops::Range<usize> {
    let range = pane.visible();
    if len == 0 || range.to < 0.0 || range.from >= len as f64 {
        return 0..0;
    }
    let lo = range.from.floor().max(0.0) as usize;
    let hi = (range.to.ceil() as usize).min(len - 1);
    lo..(hi + 1)
}

fn draw_price(canvas: &skia::Canvas, pane: &Pane, series: &DataSeries, theme: &Theme) {
    let (Some(ts), Some(ps)) = (pane.time_scale(), pane.price_scale()) else { return };
    let spacing = ts.bar_spacing();
    let half = (spacing * 0.7 * 0.5).max(0.5);

    let mut wick = skia::Paint::default();
    wick.set_anti_alias(true);
    wick.set_style(skia::paint::Style::Stroke);
    wick.set_stroke_width(1.0);
    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);

    for i in visible_indices(pane, series.len()) {
        let Some(bar) = series.bar(i) else { continue };
        let x = ts.to_px(i as f64);
        let color = if bar.close >= bar.open { theme.candle_up } else { theme.candle_down };
        wick.set_color(color);
        body.set_color(color);
        canvas.draw_line((x, ps.to_px(bar.high)), (x, ps.to_px(bar.low)), &wick);
        let top = ps.to_px(bar.open.max(bar.close));
        let bot = ps.to_px(bar.open.min(bar.close));
        let rect = skia::Rect::from_ltrb(x - half, top, x + half, bot.max(top + 1.0));
        canvas.draw_rect(rect, &body);
    }

    let pickers: [fn(&crate::series::IndicatorValues) -> Option<f64>; 4] = [
        |iv| iv.ma5,
        |iv| iv.ma10,
        |iv| iv.ma20,
        |iv| iv.ma60,
    ];
    for (k, pick) in pickers.into_iter().enumerate() {
        draw_indicator_line(canvas, pane, series, theme.ma[k], 1.5, pick);
    }
}

fn draw_volume(canvas: &skia::Canvas, pane: &Pane, series: &DataSeries, theme: &Theme) {
    let (Some(ts), Some(ps)) = (pane.time_scale(), pane.price_scale()) else { return };
    let half = (ts.bar_spacing() * 0.7 * 0.5).max(0.5);
    let base = ps.to_px(0.0);
    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);
    for i in visible_indices(pane, series.len()) {
        let Some(bar) = series.bar(i) else { continue };
        let x = ts.to_px(i as f64);
        let color = if bar.close >= bar.open { theme.volume_up } else { theme.volume_down };
        body.set_color(color);
        let top = ps.to_px(bar.volume);
        let rect = skia::Rect::from_ltrb(x - half, top.min(base - 1.0), x + half, base);
        canvas.draw_rect(rect, &body);
    }
}

fn draw_rsi(canvas: &skia::Canvas, pane: &Pane, series: &DataSeries, theme: &Theme) {
    let Some(ps) = pane.price_scale() else { return };
    let mut guide = skia::Paint::default();
    guide.set_anti_alias(true);
    guide.set_style(skia::paint::Style::Stroke);
    guide.set_stroke_width(1.0);
    guide.set_color(theme.rsi_guide);
    guide.set_path_effect(skia::dash_path_effect::new(&[6.0, 4.0], 0.0));
    for level in [30.0, 70.0] {
        let y = ps.to_px(level);
        canvas.draw_line((pane.plot_left(), y), (pane.plot_right(), y), &guide);
    }
    draw_indicator_line(canvas, pane, series, theme.rsi_line, 1.5, |iv| iv.rsi14);
}

fn draw_macd(canvas: &skia::Canvas, pane: &Pane, series: &DataSeries, theme: &Theme) {
    let (Some(ts), Some(ps)) = (pane.time_scale(), pane.price_scale()) else { return };
    let half = (ts.bar_spacing() * 0.5 * 0.5).max(0.5);
    let base = ps.to_px(0.0);
    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);
    for i in visible_indices(pane, series.len()) {
        let Some(hist) = series.indicator(i).and_then(|iv| iv.macd_hist) else { continue };
        let x = ts.to_px(i as f64);
        body.set_color(if hist >= 0.0 { theme.volume_up } else { theme.volume_down });
        let y = ps.to_px(hist);
        let rect = skia::Rect::from_ltrb(x - half, y.min(base), x + half, y.max(base));
        canvas.draw_rect(rect, &body);
    }
    draw_indicator_line(canvas, pane, series, theme.macd_line, 1.5, |iv| iv.macd);
    draw_indicator_line(canvas, pane, series, theme.macd_signal, 1.5, |iv| iv.macd_signal);
}

/// Polyline over one indicator column, broken wherever the column is null.
fn draw_indicator_line<F>(
    canvas: &skia::Canvas,
    pane: &Pane,
    series: &DataSeries,
    color: skia::Color,
    width: f32,
    pick: F,
) where
    F: Fn(&crate::series::IndicatorValues) -> Option<f64>,
{
    let (Some(ts), Some(ps)) = (pane.time_scale(), pane.price_scale()) else { return };
    let mut path = skia::Path::new();
    let mut pen_down = false;
    for i in visible_indices(pane, series.len()) {
        let value = series.indicator(i).and_then(&pick);
        match value {
            Some(v) => {
                let p = (ts.to_px(i as f64), ps.to_px(v));
                if pen_down {
                    path.line_to(p);
                } else {
                    path.move_to(p);
                    pen_down = true;
                }
            }
            None => pen_down = false,
        }
    }
    if path.is_empty() {
        return;
    }
    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(width);
    stroke.set_color(color);
    canvas.draw_path(&path, &stroke);
}
