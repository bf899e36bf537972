//! Panel cleaning pipeline.

use tracing::error;

use scanner_core::error::CleanError;
use scanner_core::types::{Bar, Panel, Timeframe};

// Cap on buckets materialized per partition during resampling; a span wider
// than this signals corrupt timestamps rather than real data.
const MAX_RESAMPLE_BUCKETS: i64 = 2_000_000;

/// Normalizes a raw multi-symbol panel: timestamp ordering, de-duplication,
/// gap filling, optional resampling to a target bar size.
///
/// Cleaning failure never propagates: `clean` catches any stage error, logs
/// it, and returns an empty panel so the caller's cycle can abort gracefully.
pub struct DataCleaner;

impl DataCleaner {
    /// Full cleaning pipeline.
    pub fn clean(panel: Panel, timeframe: Timeframe, allow_backfill: bool, resample: bool) -> Panel {
        match Self::run(panel, timeframe, allow_backfill, resample) {
            Ok(cleaned) => cleaned,
            Err(e) => {
                error!(error = %e, "panel cleaning failed");
                Panel::new()
            }
        }
    }

    fn run(
        panel: Panel,
        timeframe: Timeframe,
        allow_backfill: bool,
        resample: bool,
    ) -> Result<Panel, CleanError> {
        let mut panel = Self::standardize(panel);
        panel = Self::deduplicate(panel);
        panel = Self::fill_gaps(panel, allow_backfill);
        if resample {
            panel = Self::resample(panel, timeframe)?;
        }
        Ok(panel)
    }

    /// Sort every partition ascending by timestamp.
    pub fn standardize(mut panel: Panel) -> Panel {
        panel.sort_partitions();
        panel
    }

    /// Keep the first occurrence of each (symbol, timestamp) pair.
    /// Assumes partitions are already sorted (the sort is stable, so "first"
    /// is the first as fetched).
    pub fn deduplicate(panel: Panel) -> Panel {
        let mut out = Panel::new();
        for (symbol, bars) in panel.into_partitions() {
            let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
            for bar in bars {
                if deduped.last().map(|b| b.timestamp) != Some(bar.timestamp) {
                    deduped.push(bar);
                }
            }
            out.insert_series(symbol, deduped);
        }
        out
    }

    /// Forward-fill non-finite fields from the prior observation within the
    /// same symbol partition; optionally back-fill still-missing leading
    /// values from the first complete observation.
    pub fn fill_gaps(panel: Panel, allow_backfill: bool) -> Panel {
        let mut out = Panel::new();
        for (symbol, mut bars) in panel.into_partitions() {
            let mut prev: Option<Bar> = None;
            for bar in bars.iter_mut() {
                if let Some(p) = prev {
                    fill_from(bar, &p);
                }
                prev = Some(*bar);
            }

            if allow_backfill {
                let mut next: Option<Bar> = None;
                for bar in bars.iter_mut().rev() {
                    if let Some(n) = next {
                        fill_from(bar, &n);
                    }
                    next = Some(*bar);
                }
            }

            out.insert_series(symbol, bars);
        }
        out
    }

    /// Aggregate each partition into fixed-width bars: open = first,
    /// high = max, low = min, close = last, volume = sum. Empty buckets
    /// between the first and last bar carry the prior aggregated bar
    /// forward.
    pub fn resample(panel: Panel, timeframe: Timeframe) -> Result<Panel, CleanError> {
        let width = timeframe.as_millis();
        let mut out = Panel::new();

        for (symbol, bars) in panel.into_partitions() {
            if bars.is_empty() {
                out.insert_series(symbol, bars);
                continue;
            }

            let first_bucket = bars[0].timestamp.div_euclid(width);
            let last_bucket = bars[bars.len() - 1].timestamp.div_euclid(width);
            if last_bucket - first_bucket >= MAX_RESAMPLE_BUCKETS {
                return Err(CleanError::MalformedPanel(format!(
                    "{symbol}: timestamp span of {} buckets exceeds resample limit",
                    last_bucket - first_bucket
                )));
            }

            let mut resampled: Vec<Bar> = Vec::new();
            let mut iter = bars.into_iter().peekable();

            for bucket in first_bucket..=last_bucket {
                let bucket_start = bucket * width;
                let bucket_end = bucket_start + width;

                let mut agg: Option<Bar> = None;
                while let Some(bar) = iter.next_if(|b| b.timestamp < bucket_end) {
                    agg = Some(match agg {
                        None => Bar::new(
                            bucket_start,
                            bar.open,
                            bar.high,
                            bar.low,
                            bar.close,
                            bar.volume,
                        ),
                        Some(a) => Bar::new(
                            bucket_start,
                            a.open,
                            a.high.max(bar.high),
                            a.low.min(bar.low),
                            bar.close,
                            a.volume + bar.volume,
                        ),
                    });
                }

                match (agg, resampled.last().copied()) {
                    (Some(bar), _) => resampled.push(bar),
                    (None, Some(prev)) => {
                        let mut carried = prev;
                        carried.timestamp = bucket_start;
                        resampled.push(carried);
                    }
                    (None, None) => {}
                }
            }

            out.insert_series(symbol, resampled);
        }

        Ok(out)
    }
}

fn fill_from(bar: &mut Bar, source: &Bar) {
    if !bar.open.is_finite() {
        bar.open = source.open;
    }
    if !bar.high.is_finite() {
        bar.high = source.high;
    }
    if !bar.low.is_finite() {
        bar.low = source.low;
    }
    if !bar.close.is_finite() {
        bar.close = source.close;
    }
    if !bar.volume.is_finite() {
        bar.volume = source.volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanner_core::types::{DAY_MS, MINUTE_MS};

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_standardize_sorts_each_partition() {
        let mut panel = Panel::new();
        panel.insert_series("A".to_string(), vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]);

        let out = DataCleaner::standardize(panel);
        let ts: Vec<i64> = out.series("A").unwrap().iter().map(|b| b.timestamp).collect();
        assert_eq!(ts, vec![1, 2, 3]);
    }

    #[test]
    fn test_deduplicate_keeps_first() {
        let mut panel = Panel::new();
        panel.insert_series(
            "A".to_string(),
            vec![bar(1, 1.0), bar(1, 99.0), bar(2, 2.0), bar(2, 88.0)],
        );

        let out = DataCleaner::deduplicate(panel);
        let bars = out.series("A").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 1.0);
        assert_eq!(bars[1].close, 2.0);
    }

    #[test]
    fn test_cleaned_partition_has_strictly_increasing_timestamps() {
        let mut panel = Panel::new();
        panel.insert_series(
            "A".to_string(),
            vec![bar(5, 5.0), bar(1, 1.0), bar(5, 6.0), bar(3, 3.0), bar(1, 2.0)],
        );

        let out = DataCleaner::clean(panel, Timeframe::Day, false, false);
        let bars = out.series("A").unwrap();
        for pair in bars.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_forward_fill_repairs_missing_fields() {
        let mut broken = bar(2, 2.0);
        broken.close = f64::NAN;
        broken.volume = f64::NAN;

        let mut panel = Panel::new();
        panel.insert_series("A".to_string(), vec![bar(1, 1.0), broken]);

        let out = DataCleaner::fill_gaps(panel, false);
        let bars = out.series("A").unwrap();
        assert_eq!(bars[1].close, 1.0);
        assert_eq!(bars[1].volume, 1000.0);
        // Intact fields are untouched.
        assert_eq!(bars[1].open, 2.0);
    }

    #[test]
    fn test_backfill_fills_leading_gap_only_when_allowed() {
        let mut leading = bar(1, 1.0);
        leading.close = f64::NAN;

        let mut panel = Panel::new();
        panel.insert_series("A".to_string(), vec![leading, bar(2, 2.0)]);

        let ffilled = DataCleaner::fill_gaps(panel.clone(), false);
        assert!(ffilled.series("A").unwrap()[0].close.is_nan());

        let bfilled = DataCleaner::fill_gaps(panel, true);
        assert_eq!(bfilled.series("A").unwrap()[0].close, 2.0);
    }

    #[test]
    fn test_resample_minute_to_day() {
        let mut panel = Panel::new();
        panel.insert_series(
            "A".to_string(),
            vec![
                Bar::new(9 * 60 * MINUTE_MS, 10.0, 12.0, 9.0, 11.0, 100.0),
                Bar::new(10 * 60 * MINUTE_MS, 11.0, 15.0, 10.0, 14.0, 200.0),
                Bar::new(DAY_MS + 9 * 60 * MINUTE_MS, 14.0, 16.0, 13.0, 15.0, 300.0),
            ],
        );

        let out = DataCleaner::resample(panel, Timeframe::Day).unwrap();
        let bars = out.series("A").unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 10.0);
        assert_eq!(bars[0].high, 15.0);
        assert_eq!(bars[0].low, 9.0);
        assert_eq!(bars[0].close, 14.0);
        assert_eq!(bars[0].volume, 300.0);
        assert_eq!(bars[1].timestamp, DAY_MS);
    }

    #[test]
    fn test_resample_carries_bar_into_empty_buckets() {
        let mut panel = Panel::new();
        panel.insert_series(
            "A".to_string(),
            vec![bar(0, 1.0), bar(3 * DAY_MS, 4.0)],
        );

        let out = DataCleaner::resample(panel, Timeframe::Day).unwrap();
        let bars = out.series("A").unwrap();

        assert_eq!(bars.len(), 4);
        // Days 1 and 2 carry day 0's aggregated bar forward.
        assert_eq!(bars[1].close, 1.0);
        assert_eq!(bars[2].close, 1.0);
        assert_eq!(bars[1].timestamp, DAY_MS);
        assert_eq!(bars[3].close, 4.0);
    }

    #[test]
    fn test_clean_failure_returns_empty_panel() {
        // A timestamp span of ~30,000 years of minutes trips the resample
        // guard; the cleaner swallows the error and returns empty.
        let mut panel = Panel::new();
        panel.insert_series(
            "A".to_string(),
            vec![bar(0, 1.0), bar(1_000_000_000_000_000, 2.0)],
        );

        let out = DataCleaner::clean(panel, Timeframe::Minute, false, true);
        assert!(out.is_empty());
    }
}
