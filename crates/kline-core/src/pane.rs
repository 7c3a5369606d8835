// File: crates/kline-core/src/pane.rs
// Summary: One rendering viewport: pixel geometry, visible range, scales.

use crate::scale::{LogicalRange, PriceScale, TimeScale};
use crate::series::DataSeries;
use crate::types::{Insets, PaneId};

/// Oscillator pane variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorKind {
    Rsi,
    Macd,
}

/// What a pane renders out of the shared data series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneKind {
    /// Candles plus MA overlays.
    Price,
    /// Volume histogram colored by bar direction.
    Volume,
    /// One oscillator line set.
    Indicator(IndicatorKind),
}

/// One viewport bound to a subset of the series fields. Owns its pixel-space
/// geometry and price scale; the logical-index axis is shared with sibling
/// panes through the synchronizer, which only ever mutates `visible`.
#[derive(Clone, Debug)]
pub struct Pane {
    pub id: PaneId,
    pub kind: PaneKind,
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    /// Draw the date strip along the bottom inset (bottom-most pane only).
    pub show_time_axis: bool,
    /// Draw axis text. Disabled by snapshot tests to avoid font variance.
    pub draw_labels: bool,
    /// Log10 price axis (price pane option).
    pub log_price: bool,
    visible: LogicalRange,
    time_scale: Option<TimeScale>,
    price_scale: Option<PriceScale>,
}

impl Pane {
    pub fn new(id: PaneId, kind: PaneKind, width: i32, height: i32) -> Self {
        Self {
            id,
            kind,
            width,
            height,
            insets: Insets::default(),
            show_time_axis: false,
            draw_labels: true,
            log_price: false,
            visible: LogicalRange::new(0.0, 1.0),
            time_scale: None,
            price_scale: None,
        }
    }

    #[inline]
    pub fn visible(&self) -> LogicalRange { self.visible }

    /// Adopt a range without re-emitting any notification. Only the
    /// synchronizer calls this; scales stay stale until the next layout.
    pub(crate) fn adopt_range(&mut self, range: LogicalRange) {
        self.visible = range;
    }

    /// Resize the pixel surface. Invalidates scales until the next layout.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.time_scale = None;
        self.price_scale = None;
    }

    #[inline]
    pub fn plot_left(&self) -> f32 { self.insets.left as f32 }
    #[inline]
    pub fn plot_right(&self) -> f32 { (self.width - self.insets.right as i32) as f32 }
    #[inline]
    pub fn plot_top(&self) -> f32 { self.insets.top as f32 }
    #[inline]
    pub fn plot_bottom(&self) -> f32 { (self.height - self.insets.bottom as i32) as f32 }

    /// Measured and laid out: transforms are valid only when this holds.
    pub fn is_ready(&self) -> bool {
        self.time_scale.is_some() && self.price_scale.is_some()
    }

    pub fn time_scale(&self) -> Option<&TimeScale> { self.time_scale.as_ref() }
    pub fn price_scale(&self) -> Option<&PriceScale> { self.price_scale.as_ref() }

    /// Pixels per logical index unit, once laid out.
    pub fn bar_spacing(&self) -> Option<f32> {
        self.time_scale.as_ref().map(|ts| ts.bar_spacing())
    }

    /// Recompute both scales for the current visible range and pixel size.
    /// A pane with degenerate pixel dimensions stays unready.
    pub fn layout(&mut self, series: &DataSeries) {
        if self.width <= self.insets.hsum() as i32 || self.height <= self.insets.vsum() as i32 {
            self.time_scale = None;
            self.price_scale = None;
            return;
        }
        self.time_scale = Some(TimeScale::new(
            self.plot_left(),
            self.plot_right(),
            self.visible,
        ));
        self.price_scale = self.autoscale_price(series);
    }

    fn autoscale_price(&self, series: &DataSeries) -> Option<PriceScale> {
        let top = self.plot_top();
        let bottom = self.plot_bottom();
        let (from, to) = (self.visible.from, self.visible.to);
        match self.kind {
            PaneKind::Price => {
                let (lo, hi) = series.price_bounds_in(from, to)?;
                let pad = ((hi - lo) * 0.02).max(1e-9);
                if self.log_price {
                    Some(PriceScale::new_log10(top, bottom, lo - pad, hi + pad))
                } else {
                    Some(PriceScale::new_linear(top, bottom, lo - pad, hi + pad))
                }
            }
            PaneKind::Volume => {
                let max = series.volume_max_in(from, to)?;
                Some(PriceScale::new_linear(top, bottom, 0.0, max * 1.05))
            }
            PaneKind::Indicator(IndicatorKind::Rsi) => {
                Some(PriceScale::new_linear(top, bottom, 0.0, 100.0))
            }
            PaneKind::Indicator(IndicatorKind::Macd) => {
                let bound = series.macd_bound_in(from, to)? * 1.1;
                Some(PriceScale::new_linear(top, bottom, -bound, bound))
            }
        }
    }
}
