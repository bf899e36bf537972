//! Shared smoothing and rolling-window kernels.
//!
//! Recursive smoothers are explicit folds seeded with the first input value;
//! the seed policy affects early-window output and is relied on by tests.

/// Exponentially weighted mean with smoothing factor `alpha`.
/// `out[0] = x[0]`, `out[t] = x[t] * alpha + out[t-1] * (1 - alpha)`.
pub(crate) fn ewm(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&v) => v,
        None => return result,
    };
    result.push(prev);

    for &v in &values[1..] {
        prev = v * alpha + prev * (1.0 - alpha);
        result.push(prev);
    }

    result
}

/// EWM parameterized by span: `alpha = 2 / (span + 1)`.
pub(crate) fn ewm_span(values: &[f64], span: usize) -> Vec<f64> {
    ewm(values, 2.0 / (span as f64 + 1.0))
}

/// Wilder smoothing: EWM with `alpha = 1 / period`.
pub(crate) fn wilder(values: &[f64], period: usize) -> Vec<f64> {
    ewm(values, 1.0 / period as f64)
}

/// Trailing mean over `window` values; `None` until the window is full.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i + 1 < window {
            result.push(None);
            continue;
        }
        if i + 1 > window {
            sum -= values[i - window];
        }
        result.push(Some(sum / window as f64));
    }

    result
}

/// Trailing sample standard deviation (ddof = 1) over `window` values.
pub(crate) fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    debug_assert!(window > 1);
    let mut result = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i + 1 < window {
            result.push(None);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        result.push(Some(var.sqrt()));
    }

    result
}
