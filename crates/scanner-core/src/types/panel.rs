//! Multi-symbol bar panel.

use std::collections::BTreeMap;

use super::Bar;

/// A multi-symbol, time-partitioned collection of bars.
///
/// Bars are partitioned by symbol; after cleaning, each partition is sorted
/// ascending by timestamp with no duplicate timestamps. Partitions only relate
/// to each other through shared timestamps (e.g. benchmark as-of lookups).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    series: BTreeMap<String, Vec<Bar>>,
}

impl Panel {
    /// Create an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a panel from raw (symbol, bar) rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (String, Bar)>) -> Self {
        let mut panel = Self::new();
        for (symbol, bar) in rows {
            panel.push(symbol, bar);
        }
        panel
    }

    /// Append a bar to a symbol's partition, creating the partition if needed.
    pub fn push(&mut self, symbol: String, bar: Bar) {
        self.series.entry(symbol).or_default().push(bar);
    }

    /// Replace a symbol's partition wholesale.
    pub fn insert_series(&mut self, symbol: String, bars: Vec<Bar>) {
        self.series.insert(symbol, bars);
    }

    /// Absorb another panel, appending its partitions onto this one.
    pub fn merge(&mut self, other: Panel) {
        for (symbol, bars) in other.series {
            self.series.entry(symbol).or_default().extend(bars);
        }
    }

    /// Get a symbol's partition.
    pub fn series(&self, symbol: &str) -> Option<&[Bar]> {
        self.series.get(symbol).map(Vec::as_slice)
    }

    /// Remove and return a symbol's partition.
    pub fn remove(&mut self, symbol: &str) -> Option<Vec<Bar>> {
        self.series.remove(symbol)
    }

    /// Iterate over (symbol, bars) partitions in symbol order.
    pub fn partitions(&self) -> impl Iterator<Item = (&str, &[Bar])> {
        self.series.iter().map(|(s, b)| (s.as_str(), b.as_slice()))
    }

    /// Consume the panel into its partitions.
    pub fn into_partitions(self) -> impl Iterator<Item = (String, Vec<Bar>)> {
        self.series.into_iter()
    }

    /// Symbols present in the panel, in sorted order.
    pub fn symbols(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    /// Check whether a symbol has a non-empty partition.
    pub fn contains(&self, symbol: &str) -> bool {
        self.series.get(symbol).is_some_and(|b| !b.is_empty())
    }

    /// Number of symbol partitions.
    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }

    /// Total number of bars across all partitions.
    pub fn row_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// Check if the panel holds no bars at all.
    pub fn is_empty(&self) -> bool {
        self.series.values().all(Vec::is_empty)
    }

    /// Latest timestamp across all partitions.
    pub fn latest_timestamp(&self) -> Option<i64> {
        self.series
            .values()
            .filter_map(|bars| bars.last().map(|b| b.timestamp))
            .max()
    }

    /// Sort every partition ascending by timestamp.
    pub fn sort_partitions(&mut self) {
        for bars in self.series.values_mut() {
            bars.sort_by_key(|b| b.timestamp);
        }
    }

    /// Keep only the partitions whose symbol passes the predicate.
    pub fn retain_symbols(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.series.retain(|symbol, _| keep(symbol));
    }
}

impl FromIterator<(String, Bar)> for Panel {
    fn from_iter<T: IntoIterator<Item = (String, Bar)>>(iter: T) -> Self {
        Self::from_rows(iter)
    }
}
