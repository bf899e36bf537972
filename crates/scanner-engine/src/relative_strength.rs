//! Relative strength vs. a benchmark symbol.
//!
//! The only cross-symbol computation in the pipeline: each symbol's close is
//! divided by the benchmark close aligned via an explicit as-of join, and the
//! ratio is compared to its own trailing SMA.

use scanner_core::types::Bar;

/// Trailing window for the ratio's moving average.
pub const RS_SMA_WINDOW: usize = 50;
/// Ratio excess over its SMA that maps to a full score.
const RS_CAP: f64 = 0.1;

/// As-of lookup: for each timestamp, the benchmark close at the latest
/// benchmark timestamp `<=` it. `None` before the benchmark's first bar.
/// `bench` must be sorted ascending by timestamp.
pub fn asof_close(timestamps: &[i64], bench: &[Bar]) -> Vec<Option<f64>> {
    timestamps
        .iter()
        .map(|&ts| {
            let idx = bench.partition_point(|b| b.timestamp <= ts);
            if idx == 0 {
                None
            } else {
                Some(bench[idx - 1].close)
            }
        })
        .collect()
}

/// `close / benchmark_close` per bar, `None` where no benchmark close is
/// available yet or it is zero.
pub fn ratio_series(bars: &[Bar], bench: &[Bar]) -> Vec<Option<f64>> {
    let timestamps: Vec<i64> = bars.iter().map(|b| b.timestamp).collect();
    asof_close(&timestamps, bench)
        .into_iter()
        .zip(bars)
        .map(|(bench_close, bar)| match bench_close {
            Some(bc) if bc != 0.0 => Some(bar.close / bc),
            _ => None,
        })
        .collect()
}

/// Normalized relative-strength score per bar:
/// `clip((ratio - sma) / sma, 0, 0.1) / 0.1`, `None` while the ratio or its
/// 50-bar SMA is undefined.
pub fn rs_scores(bars: &[Bar], bench: &[Bar]) -> Vec<Option<f64>> {
    let ratio = ratio_series(bars, bench);
    let sma = rolling_mean_full(&ratio, RS_SMA_WINDOW);

    ratio
        .into_iter()
        .zip(sma)
        .map(|(ratio, sma)| match (ratio, sma) {
            (Some(r), Some(s)) if s > 0.0 => Some(((r - s) / s).clamp(0.0, RS_CAP) / RS_CAP),
            _ => None,
        })
        .collect()
}

/// Trailing mean over optional values, defined only when the full window is
/// present with every value in it defined.
fn rolling_mean_full(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mut sum = 0.0;
            for v in slice {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect()
}
