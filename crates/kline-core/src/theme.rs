// File: crates/kline-core/src/theme.rs
// Summary: Light/Dark theming for pane and annotation rendering colors.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    pub candle_up: skia::Color,
    pub candle_down: skia::Color,
    pub volume_up: skia::Color,
    pub volume_down: skia::Color,
    /// MA overlay strokes, fastest (ma5) to slowest (ma60).
    pub ma: [skia::Color; 4],
    pub rsi_line: skia::Color,
    pub rsi_guide: skia::Color,
    pub macd_line: skia::Color,
    pub macd_signal: skia::Color,
    /// Default stroke for newly committed drawings.
    pub drawing: skia::Color,
    /// Translucent fill for channels and rectangles.
    pub drawing_fill: skia::Color,
    /// Stroke for the selected drawing and its anchor handles.
    pub selection: skia::Color,
    /// Shaded band of the golden-ratio grid.
    pub golden_band: skia::Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            grid: skia::Color::from_argb(255, 40, 40, 45),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            axis_label: skia::Color::from_argb(255, 210, 210, 220),
            candle_up: skia::Color::from_argb(255, 220, 80, 80),
            candle_down: skia::Color::from_argb(255, 40, 200, 120),
            volume_up: skia::Color::from_argb(200, 220, 80, 80),
            volume_down: skia::Color::from_argb(200, 40, 200, 120),
            ma: [
                skia::Color::from_argb(255, 255, 200, 60),
                skia::Color::from_argb(255, 230, 120, 220),
                skia::Color::from_argb(255, 64, 160, 255),
                skia::Color::from_argb(255, 150, 150, 160),
            ],
            rsi_line: skia::Color::from_argb(255, 200, 140, 255),
            rsi_guide: skia::Color::from_argb(255, 90, 90, 100),
            macd_line: skia::Color::from_argb(255, 64, 160, 255),
            macd_signal: skia::Color::from_argb(255, 255, 160, 60),
            drawing: skia::Color::from_argb(255, 255, 230, 70),
            drawing_fill: skia::Color::from_argb(48, 255, 230, 70),
            selection: skia::Color::from_argb(255, 80, 200, 255),
            golden_band: skia::Color::from_argb(40, 240, 190, 80),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 250, 250, 252),
            grid: skia::Color::from_argb(255, 230, 230, 235),
            axis_line: skia::Color::from_argb(255, 60, 60, 70),
            axis_label: skia::Color::from_argb(255, 20, 20, 30),
            candle_up: skia::Color::from_argb(255, 200, 60, 60),
            candle_down: skia::Color::from_argb(255, 20, 160, 90),
            volume_up: skia::Color::from_argb(200, 200, 60, 60),
            volume_down: skia::Color::from_argb(200, 20, 160, 90),
            ma: [
                skia::Color::from_argb(255, 200, 150, 20),
                skia::Color::from_argb(255, 180, 70, 170),
                skia::Color::from_argb(255, 32, 120, 200),
                skia::Color::from_argb(255, 110, 110, 120),
            ],
            rsi_line: skia::Color::from_argb(255, 140, 80, 200),
            rsi_guide: skia::Color::from_argb(255, 180, 180, 190),
            macd_line: skia::Color::from_argb(255, 32, 120, 200),
            macd_signal: skia::Color::from_argb(255, 220, 130, 30),
            drawing: skia::Color::from_argb(255, 30, 120, 240),
            drawing_fill: skia::Color::from_argb(40, 30, 120, 240),
            selection: skia::Color::from_argb(255, 240, 120, 30),
            golden_band: skia::Color::from_argb(36, 200, 150, 40),
        }
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    for t in presets() {
        if t.name.eq_ignore_ascii_case(name) {
            return t;
        }
    }
    Theme::dark()
}
