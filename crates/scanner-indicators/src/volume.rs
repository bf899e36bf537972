//! Volume indicators: relative volume, session VWAP, intraday RVOL.

use std::collections::HashMap;

use scanner_core::traits::Indicator;
use scanner_core::types::Bar;

use crate::smooth;

/// Relative volume: `volume[t] / rolling_mean(volume, window)[t]`.
///
/// Undefined while the window is warming up or when the mean volume is zero.
#[derive(Debug, Clone)]
pub struct Rvol {
    window: usize,
}

impl Rvol {
    /// Create a new RVOL indicator. The common window is 20.
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "Window must be greater than 0");
        Self { window }
    }
}

impl Default for Rvol {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Indicator for Rvol {
    type Output = f64;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let mean = smooth::rolling_mean(&volumes, self.window);

        volumes
            .iter()
            .zip(mean)
            .map(|(&vol, mean)| match mean {
                Some(m) if m > 0.0 => Some(vol / m),
                _ => None,
            })
            .collect()
    }

    fn min_periods(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "RVOL"
    }
}

/// Intraday VWAP with session reset.
///
/// Volume-weighted cumulative average of the typical price, restarting at
/// each UTC calendar day boundary. Undefined while the session's cumulative
/// volume is zero. Intended for minute bars.
#[derive(Debug, Clone, Default)]
pub struct SessionVwap;

impl SessionVwap {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for SessionVwap {
    type Output = f64;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(bars.len());
        let mut session = None;
        let mut cum_vol = 0.0;
        let mut cum_pv = 0.0;

        for bar in bars {
            let day = bar.session_day();
            if session != Some(day) {
                session = Some(day);
                cum_vol = 0.0;
                cum_pv = 0.0;
            }

            cum_vol += bar.volume;
            cum_pv += bar.typical_price() * bar.volume;

            result.push(if cum_vol > 0.0 {
                Some(cum_pv / cum_vol)
            } else {
                None
            });
        }

        result
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}

/// Intraday cumulative relative volume.
///
/// Ratio of the current session's cumulative volume at a given minute-of-day
/// to the average cumulative volume at that same minute over the trailing
/// `lookback_days` sessions, shifted by one session to avoid lookahead.
/// Undefined until a full lookback of prior sessions exists at that minute.
#[derive(Debug, Clone)]
pub struct IntradayRvol {
    lookback_days: usize,
}

impl IntradayRvol {
    /// Create a new intraday RVOL indicator. The common lookback is 20 days.
    pub fn new(lookback_days: usize) -> Self {
        assert!(lookback_days > 0, "Lookback must be greater than 0");
        Self { lookback_days }
    }
}

impl Default for IntradayRvol {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Indicator for IntradayRvol {
    type Output = f64;

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(bars.len());
        let mut session = None;
        let mut cum_vol = 0.0;
        // Cumulative volumes previously seen at each minute-of-day,
        // oldest session first.
        let mut history: HashMap<i64, Vec<f64>> = HashMap::new();

        for bar in bars {
            let day = bar.session_day();
            if session != Some(day) {
                session = Some(day);
                cum_vol = 0.0;
            }
            cum_vol += bar.volume;

            let seen = history.entry(bar.minute_of_day()).or_default();
            let value = if seen.len() >= self.lookback_days {
                let tail = &seen[seen.len() - self.lookback_days..];
                let avg = tail.iter().sum::<f64>() / self.lookback_days as f64;
                (avg > 0.0).then(|| cum_vol / avg)
            } else {
                None
            };
            seen.push(cum_vol);

            result.push(value);
        }

        result
    }

    fn min_periods(&self) -> usize {
        self.lookback_days + 1
    }

    fn name(&self) -> &str {
        "IntradayRVOL"
    }
}
