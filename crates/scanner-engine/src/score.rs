//! Composite setup scoring.

use serde::{Deserialize, Serialize};
use tracing::warn;

use scanner_core::traits::Indicator;
use scanner_core::types::{Bar, ComponentScores, Panel, ScoreRecord};
use scanner_indicators::{Ema, Rvol};

use crate::relative_strength::rs_scores;

/// EMA span the trend feature measures distance from.
const TREND_EMA_SPAN: usize = 200;
/// Close-to-EMA excess that maps to a full trend score.
const TREND_CAP: f64 = 0.2;
/// Upward gap fraction that maps to a full gap score.
const GAP_CAP: f64 = 0.05;
/// Rolling window for the relative-volume feature.
const RVOL_WINDOW: usize = 20;
/// Relative volume that maps to a full volume score.
const RVOL_CAP: f64 = 5.0;

/// Weights for the five composite-score features.
///
/// Defaults sum to 1.0 so a row with every feature maxed scores exactly 1.0;
/// overrides are accepted as-is with no sum constraint. Unknown keys are
/// rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    /// Trend strength vs. the 200-bar EMA (default 0.25)
    pub trend: f64,
    /// Bullish engulfing pattern (default 0.15)
    pub engulfing: f64,
    /// Relative volume (default 0.20)
    pub rvol: f64,
    /// Upward gap (default 0.15)
    pub gap: f64,
    /// Relative strength vs. the benchmark (default 0.25)
    pub relative_strength: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            trend: 0.25,
            engulfing: 0.15,
            rvol: 0.20,
            gap: 0.15,
            relative_strength: 0.25,
        }
    }
}

impl ScoreWeights {
    /// Weighted sum of normalized feature values.
    pub fn composite(&self, c: &ComponentScores) -> f64 {
        c.trend * self.trend
            + c.engulfing * self.engulfing
            + c.rvol * self.rvol
            + c.gap * self.gap
            + c.relative_strength * self.relative_strength
    }
}

/// Combines per-symbol features into a composite score per
/// (symbol, timestamp) row.
///
/// Every feature is clipped to its bound and normalized to [0, 1]; a feature
/// that cannot be computed (warm-up, missing benchmark) contributes 0 rather
/// than poisoning the sum.
#[derive(Debug, Clone)]
pub struct ScoringModel {
    benchmark: String,
    weights: ScoreWeights,
}

impl ScoringModel {
    /// Create a model scoring against the given benchmark symbol.
    pub fn new(benchmark: impl Into<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            weights: ScoreWeights::default(),
        }
    }

    /// Override the default weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score every row of the panel. The benchmark symbol itself is not
    /// scored; when it is absent entirely, relative strength degrades to a
    /// zero contribution for all rows.
    pub fn score(&self, panel: &Panel) -> Vec<ScoreRecord> {
        let bench: Option<Vec<Bar>> = panel.series(&self.benchmark).map(<[Bar]>::to_vec);
        if bench.is_none() {
            warn!(
                benchmark = %self.benchmark,
                "benchmark missing from panel; relative strength set to 0"
            );
        }

        let ema = Ema::new(TREND_EMA_SPAN);
        let rvol = Rvol::new(RVOL_WINDOW);

        let mut records = Vec::with_capacity(panel.row_count());
        for (symbol, bars) in panel.partitions() {
            if symbol == self.benchmark {
                continue;
            }

            let ema200 = ema.compute(bars);
            let rvol_series = rvol.compute(bars);
            let rs = bench.as_deref().map(|b| rs_scores(bars, b));

            for (i, bar) in bars.iter().enumerate() {
                let prev = (i > 0).then(|| &bars[i - 1]);

                let components = ComponentScores {
                    trend: trend_strength(bar, ema200[i]),
                    engulfing: if is_bullish_engulfing(bar, prev) { 1.0 } else { 0.0 },
                    rvol: rvol_series[i]
                        .map(|r| (r / RVOL_CAP).clamp(0.0, 1.0))
                        .unwrap_or(0.0),
                    gap: gap_score(bar, prev),
                    relative_strength: rs
                        .as_ref()
                        .and_then(|series| series[i])
                        .unwrap_or(0.0),
                };

                records.push(ScoreRecord {
                    symbol: symbol.to_string(),
                    timestamp: bar.timestamp,
                    composite: self.weights.composite(&components),
                    components,
                });
            }
        }

        records
    }
}

/// Positive distance of the close above the trend EMA, normalized.
/// Symbols below the EMA score 0.
fn trend_strength(bar: &Bar, ema: Option<f64>) -> f64 {
    match ema {
        Some(e) if e > 0.0 => ((bar.close - e) / e).clamp(0.0, TREND_CAP) / TREND_CAP,
        _ => 0.0,
    }
}

/// Previous bar red, current bar green, and the current body engulfs the
/// previous body.
fn is_bullish_engulfing(bar: &Bar, prev: Option<&Bar>) -> bool {
    match prev {
        Some(p) => {
            p.is_bearish() && bar.is_bullish() && bar.close >= p.open && bar.open <= p.close
        }
        None => false,
    }
}

/// Upward gap of the open over the prior close, normalized. Negative gaps
/// clip to 0.
fn gap_score(bar: &Bar, prev: Option<&Bar>) -> f64 {
    match prev {
        Some(p) if p.close > 0.0 => {
            ((bar.open - p.close) / p.close).clamp(0.0, GAP_CAP) / GAP_CAP
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_bar(ts: i64, price: f64) -> Bar {
        Bar::new(ts, price, price, price, price, 1000.0)
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoreWeights::default();
        let sum = w.trend + w.engulfing + w.rvol + w.gap + w.relative_strength;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_composite_bounds() {
        let w = ScoreWeights::default();

        let maxed = ComponentScores {
            trend: 1.0,
            engulfing: 1.0,
            rvol: 1.0,
            gap: 1.0,
            relative_strength: 1.0,
        };
        assert!((w.composite(&maxed) - 1.0).abs() < 1e-12);

        let zeroed = ComponentScores::default();
        assert_eq!(w.composite(&zeroed), 0.0);
    }

    #[test]
    fn test_weights_reject_unknown_keys() {
        let err = serde_json::from_str::<ScoreWeights>(r#"{"trend": 0.5, "momentum": 0.5}"#);
        assert!(err.is_err());

        let ok: ScoreWeights = serde_json::from_str(r#"{"trend": 0.5}"#).unwrap();
        assert_eq!(ok.trend, 0.5);
        assert_eq!(ok.gap, 0.15);
    }

    #[test]
    fn test_engulfing_pattern() {
        // Red bar then a green bar whose body covers it.
        let prev = Bar::new(0, 105.0, 106.0, 99.0, 100.0, 1000.0);
        let curr = Bar::new(1, 99.5, 107.0, 99.0, 106.0, 1000.0);
        assert!(is_bullish_engulfing(&curr, Some(&prev)));

        // Green bar that does not reach back to the previous open.
        let weak = Bar::new(1, 101.0, 104.0, 100.0, 103.0, 1000.0);
        assert!(!is_bullish_engulfing(&weak, Some(&prev)));

        // No previous bar.
        assert!(!is_bullish_engulfing(&curr, None));
    }

    #[test]
    fn test_gap_score_clips() {
        let prev = flat_bar(0, 100.0);

        // 2.5% gap up: half the cap.
        let up = Bar::new(1, 102.5, 103.0, 102.0, 102.8, 1000.0);
        assert!((gap_score(&up, Some(&prev)) - 0.5).abs() < 1e-12);

        // 10% gap up: clipped to 1.
        let big = Bar::new(1, 110.0, 111.0, 109.0, 110.5, 1000.0);
        assert!((gap_score(&big, Some(&prev)) - 1.0).abs() < 1e-12);

        // Gap down scores 0.
        let down = Bar::new(1, 95.0, 96.0, 94.0, 95.5, 1000.0);
        assert_eq!(gap_score(&down, Some(&prev)), 0.0);
    }

    #[test]
    fn test_flat_symbol_scores_near_zero() {
        let mut panel = Panel::new();
        panel.insert_series(
            "FLAT".to_string(),
            (0..250).map(|i| flat_bar(i, 100.0)).collect(),
        );

        let records = ScoringModel::new("SPY").score(&panel);
        let last = records.last().unwrap();

        assert_eq!(last.components.trend, 0.0);
        assert_eq!(last.components.engulfing, 0.0);
        assert_eq!(last.components.gap, 0.0);
        // Steady volume: RVOL is exactly 1, a fifth of the cap.
        assert!((last.components.rvol - 0.2).abs() < 1e-9);
        assert_eq!(last.components.relative_strength, 0.0);
        assert!(last.composite < 0.1);
    }

    #[test]
    fn test_missing_benchmark_degrades_without_error() {
        let mut panel = Panel::new();
        panel.insert_series(
            "AAPL".to_string(),
            (0..60).map(|i| flat_bar(i, 100.0 + i as f64)).collect(),
        );

        let records = ScoringModel::new("SPY").score(&panel);
        assert!(!records.is_empty());
        assert!(records
            .iter()
            .all(|r| r.components.relative_strength == 0.0));
    }

    #[test]
    fn test_benchmark_symbol_is_not_scored() {
        let mut panel = Panel::new();
        panel.insert_series("SPY".to_string(), vec![flat_bar(0, 400.0)]);
        panel.insert_series("AAPL".to_string(), vec![flat_bar(0, 100.0)]);

        let records = ScoringModel::new("SPY").score(&panel);
        assert!(records.iter().all(|r| r.symbol != "SPY"));
        assert_eq!(records.len(), 1);
    }
}
