//! Volatility indicators.

use serde::{Deserialize, Serialize};

use scanner_core::traits::{Indicator, MultiOutputIndicator};
use scanner_core::types::Bar;

use crate::smooth;

/// Average True Range (ATR).
///
/// True range `max(high - low, |high - prev_close|, |low - prev_close|)`,
/// Wilder-smoothed with `alpha = 1 / period`. The first bar's true range
/// falls back to `high - low` (no previous close).
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut tr = Vec::with_capacity(bars.len());
        let mut prev_close = None;
        for bar in bars {
            tr.push(bar.true_range(prev_close));
            prev_close = Some(bar.close);
        }

        smooth::wilder(&tr, self.period)
            .into_iter()
            .map(Some)
            .collect()
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

/// One Bollinger Bands observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    /// Middle band (SMA)
    pub mid: f64,
    /// Upper band (mid + k * std)
    pub upper: f64,
    /// Lower band (mid - k * std)
    pub lower: f64,
}

/// Bollinger Bands: SMA middle band with bands at `k` sample standard
/// deviations. Undefined until the rolling window is full.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    window: usize,
    k: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(window: usize, k: f64) -> Self {
        assert!(window > 1, "Window must be greater than 1");
        assert!(k > 0.0, "Std dev multiplier must be positive");
        Self { window, k }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerPoint;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<BollingerPoint>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mid = smooth::rolling_mean(&closes, self.window);
        let std = smooth::rolling_std(&closes, self.window);

        mid.into_iter()
            .zip(std)
            .map(|(mid, std)| match (mid, std) {
                (Some(mid), Some(std)) => Some(BollingerPoint {
                    mid,
                    upper: mid + self.k * std,
                    lower: mid - self.k * std,
                }),
                _ => None,
            })
            .collect()
    }

    fn min_periods(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atr_positive_and_aligned() {
        let bars = vec![
            Bar::new(0, 9.0, 10.0, 8.0, 9.0, 0.0),
            Bar::new(1, 10.0, 11.0, 9.0, 10.0, 0.0),
            Bar::new(2, 11.0, 12.0, 10.0, 11.0, 0.0),
            Bar::new(3, 10.0, 11.0, 9.0, 10.0, 0.0),
        ];

        let atr = Atr::new(3);
        let out = atr.compute(&bars);

        assert_eq!(out.len(), bars.len());
        // Seed is the first bar's high - low.
        assert!((out[0].unwrap() - 2.0).abs() < 1e-12);
        for v in out.into_iter().flatten() {
            assert!(v > 0.0);
        }
    }

    #[test]
    fn test_atr_gap_widens_true_range() {
        let bars = vec![
            Bar::new(0, 10.0, 10.0, 10.0, 10.0, 0.0),
            // Gap up: range is 1 but distance from prior close is 5.
            Bar::new(1, 15.0, 15.5, 14.5, 15.0, 0.0),
        ];

        let atr = Atr::new(1);
        let out = atr.compute(&bars);
        assert!((out[1].unwrap() - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0)
            .collect();
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 0.0))
            .collect();

        let bb = BollingerBands::new();
        let out = bb.compute(&bars);

        assert!(out[..19].iter().all(Option::is_none));
        for point in out.into_iter().flatten() {
            assert!(point.upper > point.mid);
            assert!(point.mid > point.lower);
        }
    }

    #[test]
    fn test_bollinger_constant_price_collapses() {
        let bars: Vec<Bar> = (0..10)
            .map(|i| Bar::new(i as i64, 50.0, 50.0, 50.0, 50.0, 0.0))
            .collect();

        let bb = BollingerBands::with_params(5, 2.0);
        let out = bb.compute(&bars);
        let point = out[9].unwrap();

        assert!((point.upper - 50.0).abs() < 1e-12);
        assert!((point.lower - 50.0).abs() < 1e-12);
    }
}
