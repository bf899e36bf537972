//! Scan report generation.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use scanner_core::types::{ConfirmedSet, RankedList};

/// Complete scan report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Symbols that survived the universe filter
    pub universe_size: usize,
    /// Ranked daily candidates
    pub ranked: RankedList,
    /// Intraday-confirmed subset
    pub confirmed: ConfirmedSet,
}

impl ScanReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                       SCAN REPORT                          \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Universe:            {}\n", self.universe_size));
        s.push_str(&format!(
            "  As of:               {}\n",
            format_timestamp(self.ranked.timestamp)
        ));
        s.push('\n');

        s.push_str("RANKED CANDIDATES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        if self.ranked.is_empty() {
            s.push_str("  (none passed the daily filter)\n");
        } else {
            s.push_str("  Symbol     Score   Trend  Engulf  RVOL   Gap    RS\n");
            for r in &self.ranked.records {
                s.push_str(&format!(
                    "  {:<9} {:>6.3}  {:>5.2}  {:>5.2}  {:>5.2}  {:>5.2}  {:>5.2}\n",
                    r.symbol,
                    r.composite,
                    r.components.trend,
                    r.components.engulfing,
                    r.components.rvol,
                    r.components.gap,
                    r.components.relative_strength,
                ));
            }
        }
        s.push('\n');

        s.push_str("INTRADAY CONFIRMED\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        if self.confirmed.is_empty() {
            s.push_str("  (none)\n");
        } else {
            s.push_str("  Symbol      Close     VWAP   iRVOL\n");
            for c in &self.confirmed.confirmations {
                s.push_str(&format!(
                    "  {:<9} {:>7.2}  {:>7.2}  {:>5.2}\n",
                    c.symbol, c.close, c.vwap, c.intraday_rvol,
                ));
            }
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn format_timestamp(ts: Option<i64>) -> String {
    match ts.and_then(DateTime::from_timestamp_millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "-".to_string(),
    }
}
