//! Daily ranking of scored rows.

use std::cmp::Ordering;

use scanner_core::types::{RankedList, ScoreRecord};

/// Default composite-score cutoff for the ranked list.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Selects the latest-timestamp cross-section, filters by score threshold,
/// and sorts descending. Ties keep their incoming (symbol) order; the sort
/// is stable.
#[derive(Debug, Clone)]
pub struct Ranker {
    threshold: f64,
}

impl Ranker {
    /// Create a ranker with the given score threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Rank the scored rows at the panel's maximum timestamp.
    pub fn rank(&self, records: Vec<ScoreRecord>) -> RankedList {
        let Some(latest) = records.iter().map(|r| r.timestamp).max() else {
            return RankedList::default();
        };

        let mut rows: Vec<ScoreRecord> = records
            .into_iter()
            .filter(|r| r.timestamp == latest && r.composite > self.threshold)
            .collect();

        rows.sort_by(|a, b| {
            b.composite
                .partial_cmp(&a.composite)
                .unwrap_or(Ordering::Equal)
        });

        RankedList {
            timestamp: Some(latest),
            records: rows,
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
