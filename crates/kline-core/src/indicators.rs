// File: crates/kline-core/src/indicators.rs
// Summary: Derived indicator lines computed over closes (SMA, RSI, MACD).

/// Simple moving average over `values`. Entries before the window fills are
/// `None`, matching the backend payload where early rows carry nulls.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut sum = 0.0f64;
    for i in 0..values.len() {
        sum += values[i];
        if i + 1 >= period {
            if i + 1 > period {
                sum -= values[i - period];
            }
            out[i] = Some(sum / period as f64);
        }
    }
    out
}

/// Exponential moving average seeded with the SMA of the first window.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(seed);
    let mut prev = seed;
    for i in period..values.len() {
        prev = values[i] * k + prev * (1.0 - k);
        out[i] = Some(prev);
    }
    out
}

/// Relative Strength Index with Wilder smoothing.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }
    let mut avg_gain = 0.0f64;
    let mut avg_loss = 0.0f64;
    for i in 1..=period {
        let delta = values[i] - values[i - 1];
        if delta >= 0.0 { avg_gain += delta; } else { avg_loss -= delta; }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));
    for i in (period + 1)..values.len() {
        let delta = values[i] - values[i - 1];
        let (gain, loss) = if delta >= 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// MACD line, signal line, histogram. Standard (12, 26, 9) parameters are
/// supplied by the caller.
pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let mut line = vec![None; values.len()];
    for i in 0..values.len() {
        if let (Some(f), Some(s)) = (fast_ema[i], slow_ema[i]) {
            line[i] = Some(f - s);
        }
    }
    // Signal = EMA of the MACD line over its defined suffix.
    let defined: Vec<f64> = line.iter().flatten().copied().collect();
    let offset = values.len() - defined.len();
    let signal_defined = ema(&defined, signal);
    let mut signal_out = vec![None; values.len()];
    for (i, v) in signal_defined.into_iter().enumerate() {
        signal_out[offset + i] = v;
    }
    let mut hist = vec![None; values.len()];
    for i in 0..values.len() {
        if let (Some(m), Some(s)) = (line[i], signal_out[i]) {
            hist[i] = Some(m - s);
        }
    }
    (line, signal_out, hist)
}
