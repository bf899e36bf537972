//! Rate-limited batched bar fetching.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use scanner_core::traits::MarketData;
use scanner_core::types::{Panel, Timeframe};

use crate::rate_limit::RateLimiter;

const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Splits a symbol list into API-sized batches, paces requests against a
/// shared per-minute budget, tolerates per-batch failure, and concatenates
/// the successful results into one time-ordered panel.
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    max_api_batch: usize,
    pacing: Duration,
}

impl BatchFetcher {
    /// Create a fetcher with the API's maximum symbols-per-request limit.
    pub fn new(max_api_batch: usize) -> Self {
        assert!(max_api_batch > 0, "Batch limit must be greater than 0");
        Self {
            max_api_batch,
            pacing: DEFAULT_PACING,
        }
    }

    /// Override the pacing interval slept after each successful request.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Effective batch size for the given limiter: the API limit capped by
    /// half the per-minute budget.
    pub fn batch_size(&self, limiter: &RateLimiter) -> usize {
        self.max_api_batch.min(limiter.batch_budget()).max(1)
    }

    /// Fetch bars for `symbols` in sequential batches.
    ///
    /// Issues exactly `ceil(len / batch_size)` requests. A failed batch is
    /// logged with its first symbol and skipped; the remaining batches still
    /// run. Returns an empty panel when every batch fails.
    pub async fn fetch<M: MarketData + ?Sized>(
        &self,
        market: &M,
        limiter: &mut RateLimiter,
        symbols: &[String],
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Panel {
        let mut panel = Panel::new();
        if symbols.is_empty() {
            return panel;
        }

        let batch_size = self.batch_size(limiter);
        debug!(
            symbols = symbols.len(),
            batch_size,
            %timeframe,
            "fetching bars in batches"
        );

        for batch in symbols.chunks(batch_size) {
            match market.get_bars(batch, timeframe, start, end).await {
                Ok(rows) => {
                    panel.merge(Panel::from_rows(rows));
                    limiter.record_call();
                    if !self.pacing.is_zero() {
                        tokio::time::sleep(self.pacing).await;
                    }
                }
                Err(e) => {
                    let first_symbol = batch[0].as_str();
                    warn!(first_symbol, error = %e, "bar batch failed, skipping");
                }
            }
        }

        panel.sort_partitions();
        panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scanner_core::error::FetchError;
    use scanner_core::types::{Asset, AssetClass, AssetStatus, Bar};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock source that counts calls and fails configured batch indices.
    struct CountingSource {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
    }

    impl CountingSource {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl MarketData for CountingSource {
        async fn list_assets(
            &self,
            _status: AssetStatus,
            _class: AssetClass,
        ) -> Result<Vec<Asset>, FetchError> {
            Ok(vec![])
        }

        async fn get_bars(
            &self,
            symbols: &[String],
            _timeframe: Timeframe,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<(String, Bar)>, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&call) {
                return Err(FetchError::Connection("simulated outage".to_string()));
            }
            Ok(symbols
                .iter()
                .map(|s| (s.clone(), Bar::new(call as i64, 1.0, 1.0, 1.0, 1.0, 1.0)))
                .collect())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn symbols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("SYM{i}")).collect()
    }

    fn fetcher() -> BatchFetcher {
        BatchFetcher::new(2).with_pacing(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_exact_batch_count() {
        let source = CountingSource::new(vec![]);
        let mut limiter = RateLimiter::new(200);

        let panel = fetcher()
            .fetch(
                &source,
                &mut limiter,
                &symbols(5),
                Timeframe::Day,
                Utc::now(),
                Utc::now(),
            )
            .await;

        // 5 symbols, batch size 2 => ceil(5/2) = 3 calls.
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(limiter.calls_this_minute(), 3);
        assert_eq!(panel.symbol_count(), 5);
    }

    #[tokio::test]
    async fn test_failed_batch_is_skipped() {
        // Second batch (SYM2, SYM3) fails; the rest still arrives.
        let source = CountingSource::new(vec![1]);
        let mut limiter = RateLimiter::new(200);

        let panel = fetcher()
            .fetch(
                &source,
                &mut limiter,
                &symbols(5),
                Timeframe::Day,
                Utc::now(),
                Utc::now(),
            )
            .await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(panel.symbols(), vec!["SYM0", "SYM1", "SYM4"]);
        // Only successful requests count against the budget.
        assert_eq!(limiter.calls_this_minute(), 2);
    }

    #[tokio::test]
    async fn test_all_batches_failing_returns_empty() {
        let source = CountingSource::new(vec![0, 1, 2]);
        let mut limiter = RateLimiter::new(200);

        let panel = fetcher()
            .fetch(
                &source,
                &mut limiter,
                &symbols(5),
                Timeframe::Day,
                Utc::now(),
                Utc::now(),
            )
            .await;

        assert!(panel.is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_respects_budget() {
        // Budget of 2 calls/minute halves to a batch budget of 1.
        let limiter = RateLimiter::new(2);
        assert_eq!(fetcher().batch_size(&limiter), 1);

        let limiter = RateLimiter::new(1000);
        assert_eq!(fetcher().batch_size(&limiter), 2);
    }
}
