//! Long-setup trend classifier.

use std::collections::BTreeMap;

use scanner_core::traits::Indicator;
use scanner_core::types::{Bar, Panel};
use scanner_indicators::Ema;

const FAST_SPAN: usize = 50;
const SLOW_SPAN: usize = 200;

/// Per-bar long-setup flag: close above the 200-bar EMA with the 50-bar EMA
/// also above it.
pub fn long_setup(bars: &[Bar]) -> Vec<bool> {
    let fast = Ema::new(FAST_SPAN).compute(bars);
    let slow = Ema::new(SLOW_SPAN).compute(bars);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| match (fast[i], slow[i]) {
            (Some(f), Some(s)) => bar.close > s && f > s,
            _ => false,
        })
        .collect()
}

/// Apply the long-setup classifier to every partition of a panel.
pub fn long_setup_panel(panel: &Panel) -> BTreeMap<String, Vec<bool>> {
    panel
        .partitions()
        .map(|(symbol, bars)| (symbol.to_string(), long_setup(bars)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: impl Iterator<Item = f64>) -> Vec<Bar> {
        closes
            .enumerate()
            .map(|(i, c)| Bar::new(i as i64, c, c, c, c, 1000.0))
            .collect()
    }

    #[test]
    fn test_sustained_uptrend_is_long_setup() {
        let series = bars((0..300).map(|i| 100.0 + i as f64));
        let flags = long_setup(&series);

        // Fast EMA sits above slow EMA once the trend is established.
        assert!(flags[299]);
    }

    #[test]
    fn test_flat_series_is_not_long_setup() {
        let series = bars((0..300).map(|_| 100.0));
        let flags = long_setup(&series);

        // close == EMA and fast == slow: strict comparisons fail.
        assert!(flags.iter().all(|&f| !f));
    }

    #[test]
    fn test_downtrend_is_not_long_setup() {
        let series = bars((0..300).map(|i| 400.0 - i as f64));
        let flags = long_setup(&series);
        assert!(!flags[299]);
    }

    #[test]
    fn test_panel_application() {
        let mut panel = Panel::new();
        panel.insert_series("UP".to_string(), bars((0..300).map(|i| 100.0 + i as f64)));
        panel.insert_series("FLAT".to_string(), bars((0..300).map(|_| 100.0)));

        let flags = long_setup_panel(&panel);
        assert!(flags["UP"][299]);
        assert!(!flags["FLAT"][299]);
    }
}
