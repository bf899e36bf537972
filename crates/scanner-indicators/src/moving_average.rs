//! Moving average indicators.

use scanner_core::traits::Indicator;
use scanner_core::types::Bar;

use crate::smooth;

/// Simple Moving Average (SMA) of close prices.
///
/// Undefined until `window` observations exist.
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
}

impl Sma {
    /// Create a new SMA with the specified window.
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "Window must be greater than 0");
        Self { window }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        smooth::rolling_mean(&closes, self.window)
    }

    fn min_periods(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA) of close prices.
///
/// Recurrence `ema[t] = close[t] * k + ema[t-1] * (1 - k)` with
/// `k = 2 / (span + 1)`, seeded with the first close. Defined from the
/// first bar onward.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        Self { span }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        smooth::ewm_span(&closes, self.span)
            .into_iter()
            .map(Some)
            .collect()
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 1000.0))
            .collect()
    }

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let out = sma.compute(&bars(&[1.0, 2.0, 3.0, 4.0, 5.0]));

        assert_eq!(out.len(), 5);
        assert_eq!(out[2], Some(2.0)); // (1+2+3)/3
        assert_eq!(out[3], Some(3.0)); // (2+3+4)/3
        assert_eq!(out[4], Some(4.0)); // (3+4+5)/3
    }

    #[test]
    fn test_sma_warmup_is_undefined() {
        let sma = Sma::new(5);
        let out = sma.compute(&bars(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));

        // Undefined for the first window-1 bars, defined from the window-th.
        assert!(out[..4].iter().all(Option::is_none));
        assert!(out[4..].iter().all(Option::is_some));
    }

    #[test]
    fn test_ema_seed_is_first_close() {
        let ema = Ema::new(3);
        let out = ema.compute(&bars(&[1.0, 2.0, 3.0]));

        // k = 0.5; ema[0] = 1, ema[1] = 2*0.5 + 1*0.5 = 1.5
        assert_eq!(out[0], Some(1.0));
        assert!((out[1].unwrap() - 1.5).abs() < 1e-12);
        assert!((out[2].unwrap() - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_ema_constant_input_stays_constant() {
        let ema = Ema::new(10);
        let out = ema.compute(&bars(&[42.0; 50]));

        for v in out {
            assert!((v.unwrap() - 42.0).abs() < 1e-9);
        }
    }
}
