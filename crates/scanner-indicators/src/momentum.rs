//! Momentum indicators.

use serde::{Deserialize, Serialize};

use scanner_core::traits::{Indicator, MultiOutputIndicator};
use scanner_core::types::Bar;

use crate::smooth;

/// Relative Strength Index (RSI) with Wilder smoothing.
///
/// Positive and negative close-to-close deltas are exponentially smoothed
/// with `alpha = 1 / period`; `RSI = 100 - 100 / (1 + avg_gain / avg_loss)`.
/// When the smoothed loss is zero the value is undefined (`None`), not
/// forced to 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. Common periods are 14 or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        if bars.len() < 2 {
            return vec![None; bars.len()];
        }

        let mut gains = Vec::with_capacity(bars.len() - 1);
        let mut losses = Vec::with_capacity(bars.len() - 1);
        for pair in bars.windows(2) {
            let delta = pair[1].close - pair[0].close;
            gains.push(delta.max(0.0));
            losses.push((-delta).max(0.0));
        }

        let avg_gain = smooth::wilder(&gains, self.period);
        let avg_loss = smooth::wilder(&losses, self.period);

        // No delta exists for the first bar.
        let mut result = Vec::with_capacity(bars.len());
        result.push(None);
        for (&gain, &loss) in avg_gain.iter().zip(avg_loss.iter()) {
            if loss > 0.0 {
                result.push(Some(100.0 - 100.0 / (1.0 + gain / loss)));
            } else {
                result.push(None);
            }
        }

        result
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// One MACD observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub hist: f64,
}

/// MACD (Moving Average Convergence Divergence).
///
/// Both EMAs are seeded with their first input, so the lines are defined
/// from the first bar; early values simply carry heavy seed weight.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast span must be less than slow span");
        Self { fast, slow, signal }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdPoint;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<MacdPoint>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let fast = smooth::ewm_span(&closes, self.fast);
        let slow = smooth::ewm_span(&closes, self.slow);

        let macd_line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
        let signal_line = smooth::ewm_span(&macd_line, self.signal);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| {
                Some(MacdPoint {
                    macd,
                    signal,
                    hist: macd - signal,
                })
            })
            .collect()
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
