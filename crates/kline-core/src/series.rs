// File: crates/kline-core/src/series.rs
// Summary: Date-keyed OHLCV series with per-bar indicator columns.

use chrono::{Datelike, NaiveDate};

use crate::indicators;

/// One daily (or aggregated) bar.
#[derive(Clone, Copy, Debug)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Try to construct a bar enforcing OHLC invariants:
    /// l <= min(o,c) and h >= max(o,c), and l <= h.
    pub fn try_new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, &'static str> {
        let lo = open.min(close);
        let hi = open.max(close);
        if low > lo { return Err("low above min(open,close)"); }
        if high < hi { return Err("high below max(open,close)"); }
        if low > high { return Err("low above high"); }
        if volume < 0.0 { return Err("negative volume"); }
        Ok(Self { date, open, high, low, close, volume })
    }
}

/// Indicator columns for one bar. `None` while the lookback window is filling,
/// mirroring the null-padded arrays of the backend kline payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndicatorValues {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub rsi14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
}

/// Aggregation period for the series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregatePeriod {
    Daily,
    Weekly,
    Monthly,
}

/// Ordered, date-indexed bar sequence. Immutable during a render/draw/capture
/// cycle; every engine component reads, none writes.
#[derive(Clone, Debug, Default)]
pub struct DataSeries {
    bars: Vec<OhlcvBar>,
    indicators: Vec<IndicatorValues>,
}

impl DataSeries {
    /// Build a series from bars, computing indicator columns locally.
    /// Bars must already be sorted ascending by date.
    pub fn from_bars(bars: Vec<OhlcvBar>) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let ma5 = indicators::sma(&closes, 5);
        let ma10 = indicators::sma(&closes, 10);
        let ma20 = indicators::sma(&closes, 20);
        let ma60 = indicators::sma(&closes, 60);
        let rsi14 = indicators::rsi(&closes, 14);
        let (macd, macd_signal, macd_hist) = indicators::macd(&closes, 12, 26, 9);
        let indicators = (0..bars.len())
            .map(|i| IndicatorValues {
                ma5: ma5[i],
                ma10: ma10[i],
                ma20: ma20[i],
                ma60: ma60[i],
                rsi14: rsi14[i],
                macd: macd[i],
                macd_signal: macd_signal[i],
                macd_hist: macd_hist[i],
            })
            .collect();
        Self { bars, indicators }
    }

    pub fn len(&self) -> usize { self.bars.len() }
    pub fn is_empty(&self) -> bool { self.bars.is_empty() }

    pub fn last_index(&self) -> Option<usize> {
        self.bars.len().checked_sub(1)
    }

    pub fn bar(&self, idx: usize) -> Option<&OhlcvBar> {
        self.bars.get(idx)
    }

    pub fn bars(&self) -> &[OhlcvBar] { &self.bars }

    pub fn indicator(&self, idx: usize) -> Option<&IndicatorValues> {
        self.indicators.get(idx)
    }

    pub fn date_at(&self, idx: usize) -> Option<NaiveDate> {
        self.bars.get(idx).map(|b| b.date)
    }

    /// Exact index of `date`, by binary search.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }

    /// Index of the last bar on or before `date` (nearest prior trading day).
    /// `None` if `date` precedes the whole series.
    pub fn index_at_or_before(&self, date: NaiveDate) -> Option<usize> {
        match self.bars.binary_search_by_key(&date, |b| b.date) {
            Ok(i) => Some(i),
            Err(0) => None,
            Err(i) => Some(i - 1),
        }
    }

    /// Price bounds (low/high plus MA overlays) of bars whose index lies in
    /// `[from, to]`. `None` when no bar falls inside the window.
    pub fn price_bounds_in(&self, from: f64, to: f64) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        let mut any = false;
        for i in index_window(from, to, self.bars.len()) {
            let b = &self.bars[i];
            lo = lo.min(b.low);
            hi = hi.max(b.high);
            let iv = &self.indicators[i];
            for ma in [iv.ma5, iv.ma10, iv.ma20, iv.ma60].into_iter().flatten() {
                lo = lo.min(ma);
                hi = hi.max(ma);
            }
            any = true;
        }
        if any { Some((lo, hi)) } else { None }
    }

    /// Largest volume of bars inside the window.
    pub fn volume_max_in(&self, from: f64, to: f64) -> Option<f64> {
        let mut max = f64::NEG_INFINITY;
        let mut any = false;
        for i in index_window(from, to, self.bars.len()) {
            max = max.max(self.bars[i].volume);
            any = true;
        }
        if any { Some(max) } else { None }
    }

    /// Symmetric bound for the MACD pane over the window.
    pub fn macd_bound_in(&self, from: f64, to: f64) -> Option<f64> {
        let mut max = 0.0f64;
        let mut any = false;
        for i in index_window(from, to, self.bars.len()) {
            let iv = &self.indicators[i];
            for v in [iv.macd, iv.macd_signal, iv.macd_hist].into_iter().flatten() {
                max = max.max(v.abs());
                any = true;
            }
        }
        if any { Some(max.max(1e-9)) } else { None }
    }

    /// Aggregate daily bars into weekly (ISO week) or monthly buckets:
    /// open = first open, close = last close, high = max, low = min,
    /// volume = sum, date = first date of the bucket. Indicator columns are
    /// recomputed over the aggregated closes.
    pub fn aggregate(&self, period: AggregatePeriod) -> DataSeries {
        if period == AggregatePeriod::Daily || self.bars.len() <= 1 {
            return self.clone();
        }
        let key = |d: NaiveDate| -> (i32, u32) {
            match period {
                AggregatePeriod::Weekly => (d.iso_week().year(), d.iso_week().week()),
                AggregatePeriod::Monthly => (d.year(), d.month()),
                AggregatePeriod::Daily => unreachable!(),
            }
        };
        let mut out: Vec<OhlcvBar> = Vec::new();
        let mut current: Option<((i32, u32), OhlcvBar)> = None;
        for b in &self.bars {
            let k = key(b.date);
            match current.as_mut() {
                Some((ck, acc)) if *ck == k => {
                    acc.high = acc.high.max(b.high);
                    acc.low = acc.low.min(b.low);
                    acc.close = b.close;
                    acc.volume += b.volume;
                }
                _ => {
                    if let Some((_, done)) = current.take() {
                        out.push(done);
                    }
                    current = Some((k, *b));
                }
            }
        }
        if let Some((_, done)) = current {
            out.push(done);
        }
        DataSeries::from_bars(out)
    }
}

/// Integer indices covered by the fractional window `[from, to]`, clamped to
/// the series bounds.
fn index_window(from: f64, to: f64, len: usize) -> std::ops::Range<usize> {
    if len == 0 || to < 0.0 || from >= len as f64 {
        return 0..0;
    }
    let lo = from.floor().max(0.0) as usize;
    let hi = (to.ceil() as usize).min(len - 1);
    lo..(hi + 1)
}
