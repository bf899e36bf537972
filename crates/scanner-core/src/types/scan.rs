//! Scan output types: scored rows, ranked cross-sections, confirmations.

use serde::{Deserialize, Serialize};

/// Per-feature contributions to a composite score, each normalized to [0, 1]
/// before weighting. A feature that could not be computed contributes 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub trend: f64,
    pub engulfing: f64,
    pub rvol: f64,
    pub gap: f64,
    pub relative_strength: f64,
}

/// Composite score for one (symbol, timestamp) row. Transient: recomputed
/// each scan cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub symbol: String,
    /// Unix milliseconds (UTC)
    pub timestamp: i64,
    pub composite: f64,
    pub components: ComponentScores,
}

/// The scored cross-section at the panel's latest timestamp, filtered by
/// threshold and sorted descending by composite score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedList {
    /// Reference timestamp shared by every record; None when empty.
    pub timestamp: Option<i64>,
    pub records: Vec<ScoreRecord>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Symbols of the first `n` records, in rank order.
    pub fn top_symbols(&self, n: usize) -> Vec<String> {
        self.records
            .iter()
            .take(n)
            .map(|r| r.symbol.clone())
            .collect()
    }
}

/// One symbol passing the intraday microstructure filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub symbol: String,
    pub close: f64,
    pub vwap: f64,
    pub intraday_rvol: f64,
}

/// Subset of ranked symbols confirmed by the intraday check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedSet {
    /// Latest minute timestamp the confirmations were evaluated at.
    pub timestamp: Option<i64>,
    pub confirmations: Vec<Confirmation>,
}

impl ConfirmedSet {
    pub fn len(&self) -> usize {
        self.confirmations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmations.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.confirmations.iter().map(|c| c.symbol.as_str()).collect()
    }
}
