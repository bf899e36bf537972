//! Panel-level indicator application.
//!
//! Indicators run over each symbol partition independently: computing a
//! series for symbol A never reads symbol B's bars. Cross-symbol features
//! (relative strength vs. a benchmark) live in the scoring layer, not here.

use std::collections::BTreeMap;

use scanner_core::traits::{Indicator, MultiOutputIndicator};
use scanner_core::types::Panel;

/// Per-symbol indicator series, aligned 1:1 with each partition's bars.
pub type SeriesMap<T> = BTreeMap<String, Vec<Option<T>>>;

/// Apply a single-output indicator to every partition of a panel.
pub fn apply<I: Indicator>(panel: &Panel, indicator: &I) -> SeriesMap<I::Output> {
    panel
        .partitions()
        .map(|(symbol, bars)| (symbol.to_string(), indicator.compute(bars)))
        .collect()
}

/// Apply a multi-output indicator to every partition of a panel.
pub fn apply_multi<I: MultiOutputIndicator>(panel: &Panel, indicator: &I) -> SeriesMap<I::Outputs> {
    panel
        .partitions()
        .map(|(symbol, bars)| (symbol.to_string(), indicator.compute(bars)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ema, Rsi, Sma};
    use scanner_core::types::Bar;

    fn series(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 86_400_000, c, c + 1.0, c - 1.0, c, 1000.0))
            .collect()
    }

    #[test]
    fn test_apply_covers_all_partitions() {
        let mut panel = Panel::new();
        panel.insert_series("AAPL".to_string(), series(&[1.0, 2.0, 3.0]));
        panel.insert_series("MSFT".to_string(), series(&[10.0, 20.0, 30.0]));

        let out = apply(&panel, &Sma::new(2));
        assert_eq!(out.len(), 2);
        assert_eq!(out["AAPL"].len(), 3);
        assert_eq!(out["MSFT"][2], Some(25.0));
    }

    #[test]
    fn test_cross_symbol_isolation() {
        // Indicator values for one symbol are identical whether or not
        // another symbol's bars are present in the panel.
        let a = series(&[100.0, 101.0, 99.0, 104.0, 103.0, 108.0, 110.0, 107.0]);
        let b = series(&[5.0, 500.0, 0.5, 50.0, 5000.0, 1.0, 2.0, 3.0]);

        let mut solo = Panel::new();
        solo.insert_series("A".to_string(), a.clone());

        let mut mixed = Panel::new();
        mixed.insert_series("A".to_string(), a);
        mixed.insert_series("B".to_string(), b);

        for window in [2, 3, 5] {
            assert_eq!(
                apply(&solo, &Ema::new(window))["A"],
                apply(&mixed, &Ema::new(window))["A"]
            );
        }
        assert_eq!(
            apply(&solo, &Rsi::new(3))["A"],
            apply(&mixed, &Rsi::new(3))["A"]
        );
    }
}
