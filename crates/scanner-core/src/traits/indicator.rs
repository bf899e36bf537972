//! Indicator trait definitions.

use crate::error::IndicatorError;
use crate::types::Bar;

/// Trait for causal, per-symbol technical indicators.
///
/// An indicator consumes one symbol partition's bars (oldest first) and
/// produces one output slot per input bar. `None` marks a value that is
/// undefined at that bar (warm-up, zero denominators) and must never be
/// replaced with a fabricated number. Value `i` may only depend on bars
/// `0..=i`.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values, aligned 1:1 with `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<Self::Output>>;

    /// Number of bars needed before the first defined value.
    fn min_periods(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data for at least one defined value.
    fn validate(&self, bars: &[Bar]) -> Result<(), IndicatorError> {
        if bars.len() < self.min_periods() {
            return Err(IndicatorError::InsufficientData {
                required: self.min_periods(),
                available: bars.len(),
            });
        }
        Ok(())
    }
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
///
/// Some indicators produce multiple related values per bar.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values, aligned 1:1 with `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<Self::Outputs>>;

    /// Number of bars needed before the first defined value.
    fn min_periods(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TrailingSum {
        window: usize,
    }

    impl Indicator for TrailingSum {
        type Output = f64;

        fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
            (0..bars.len())
                .map(|i| {
                    if i + 1 < self.window {
                        None
                    } else {
                        Some(bars[i + 1 - self.window..=i].iter().map(|b| b.close).sum())
                    }
                })
                .collect()
        }

        fn min_periods(&self) -> usize {
            self.window
        }

        fn name(&self) -> &str {
            "trailing_sum"
        }
    }

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 0.0))
            .collect()
    }

    #[test]
    fn test_alignment_and_warmup() {
        let ind = TrailingSum { window: 3 };
        let data = bars(&[1.0, 2.0, 3.0, 4.0]);
        let out = ind.compute(&data);

        assert_eq!(out.len(), data.len());
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(6.0));
        assert_eq!(out[3], Some(9.0));
    }

    #[test]
    fn test_validate() {
        let ind = TrailingSum { window: 5 };
        assert!(ind.validate(&bars(&[1.0, 2.0])).is_err());
        assert!(ind.validate(&bars(&[1.0, 2.0, 3.0, 4.0, 5.0])).is_ok());
    }
}
