//! Intraday confirmation of ranked candidates.

use tracing::debug;

use scanner_core::traits::Indicator;
use scanner_core::types::{ConfirmedSet, Confirmation, Panel};
use scanner_indicators::{IntradayRvol, SessionVwap};

/// Default intraday relative-volume requirement.
pub const DEFAULT_MIN_RVOL: f64 = 1.5;

/// Re-evaluates top-ranked symbols against minute-level microstructure:
/// price above session VWAP and elevated intraday relative volume at the
/// panel's latest minute.
#[derive(Debug, Clone)]
pub struct IntradayConfirmer {
    rvol_lookback_days: usize,
    min_rvol: f64,
}

impl IntradayConfirmer {
    /// Create a confirmer with the given RVOL session lookback.
    pub fn new(rvol_lookback_days: usize) -> Self {
        Self {
            rvol_lookback_days,
            min_rvol: DEFAULT_MIN_RVOL,
        }
    }

    /// Override the minimum intraday RVOL.
    pub fn with_min_rvol(mut self, min_rvol: f64) -> Self {
        self.min_rvol = min_rvol;
        self
    }

    /// Confirm symbols whose bar at the latest minute across the panel has
    /// `close > vwap` and `intraday_rvol > min_rvol`. Symbols with no bar at
    /// that minute, or with either signal undefined, are not confirmed.
    pub fn confirm(&self, minute_panel: &Panel) -> ConfirmedSet {
        let Some(latest) = minute_panel.latest_timestamp() else {
            return ConfirmedSet::default();
        };

        let vwap = SessionVwap::new();
        let rvol = IntradayRvol::new(self.rvol_lookback_days);

        let mut confirmations = Vec::new();
        for (symbol, bars) in minute_panel.partitions() {
            let Some(i) = bars.iter().rposition(|b| b.timestamp == latest) else {
                continue;
            };

            let vwap_series = vwap.compute(bars);
            let rvol_series = rvol.compute(bars);

            if let (Some(v), Some(r)) = (vwap_series[i], rvol_series[i]) {
                if bars[i].close > v && r > self.min_rvol {
                    confirmations.push(Confirmation {
                        symbol: symbol.to_string(),
                        close: bars[i].close,
                        vwap: v,
                        intraday_rvol: r,
                    });
                }
            }
        }

        debug!(
            candidates = minute_panel.symbol_count(),
            confirmed = confirmations.len(),
            "intraday confirmation"
        );

        ConfirmedSet {
            timestamp: Some(latest),
            confirmations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanner_core::types::{Bar, DAY_MS, MINUTE_MS};

    /// Sessions of rising-price minute bars; the final session's volume is
    /// scaled by `surge`.
    fn sessions(days: i64, minutes: i64, base_price: f64, surge: f64) -> Vec<Bar> {
        let mut bars = Vec::new();
        for day in 0..days {
            for m in 0..minutes {
                let ts = day * DAY_MS + (570 + m) * MINUTE_MS;
                let price = base_price + m as f64;
                let volume = if day == days - 1 { 100.0 * surge } else { 100.0 };
                bars.push(Bar::new(ts, price, price + 0.5, price - 0.5, price, volume));
            }
        }
        bars
    }

    #[test]
    fn test_confirms_strong_symbol() {
        let mut panel = Panel::new();
        panel.insert_series("UP".to_string(), sessions(4, 5, 10.0, 3.0));

        let confirmed = IntradayConfirmer::new(3).confirm(&panel);

        assert_eq!(confirmed.symbols(), vec!["UP"]);
        let c = &confirmed.confirmations[0];
        // Rising prices put the close above the session VWAP.
        assert!(c.close > c.vwap);
        assert!((c.intraday_rvol - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_ordinary_volume() {
        let mut panel = Panel::new();
        panel.insert_series("DULL".to_string(), sessions(4, 5, 10.0, 1.0));

        let confirmed = IntradayConfirmer::new(3).confirm(&panel);
        assert!(confirmed.is_empty());
    }

    #[test]
    fn test_rejects_price_below_vwap() {
        // Falling prices within the session: close ends below VWAP even
        // with a volume surge.
        let mut bars = Vec::new();
        for day in 0..4i64 {
            for m in 0..5i64 {
                let ts = day * DAY_MS + (570 + m) * MINUTE_MS;
                let price = 20.0 - m as f64;
                let volume = if day == 3 { 300.0 } else { 100.0 };
                bars.push(Bar::new(ts, price, price + 0.5, price - 0.5, price, volume));
            }
        }
        let mut panel = Panel::new();
        panel.insert_series("FADE".to_string(), bars);

        let confirmed = IntradayConfirmer::new(3).confirm(&panel);
        assert!(confirmed.is_empty());
    }

    #[test]
    fn test_insufficient_history_is_not_confirmed() {
        // Two sessions with a lookback of 3: RVOL is undefined everywhere.
        let mut panel = Panel::new();
        panel.insert_series("NEW".to_string(), sessions(2, 5, 10.0, 3.0));

        let confirmed = IntradayConfirmer::new(3).confirm(&panel);
        assert!(confirmed.is_empty());
    }

    #[test]
    fn test_empty_panel() {
        let confirmed = IntradayConfirmer::new(3).confirm(&Panel::new());
        assert!(confirmed.is_empty());
        assert_eq!(confirmed.timestamp, None);
    }
}
