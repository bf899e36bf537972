//! One-cycle scan orchestration.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use scanner_core::traits::MarketData;
use scanner_core::types::{ConfirmedSet, RankedList, Timeframe};
use scanner_data::{BatchFetcher, DataCleaner, PanelCache, RateLimiter};

use crate::confirm::IntradayConfirmer;
use crate::rank::Ranker;
use crate::score::{ScoreWeights, ScoringModel};
use crate::universe::UniverseFilter;

/// Cache keys the orchestrator publishes cleaned panels under.
pub const DAILY_PANEL_KEY: &str = "daily";
pub const INTRADAY_PANEL_KEY: &str = "intraday";

/// Stages of one scan cycle. Each stage's output gates the next; empty
/// results transition to `Aborted` with whatever partial output exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStage {
    Idle,
    FetchUniverse,
    FetchDaily,
    CleanDaily,
    ScoreRank,
    FetchIntraday,
    CleanIntraday,
    Confirm,
    Done,
    Aborted,
}

impl fmt::Display for ScanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanStage::Idle => "idle",
            ScanStage::FetchUniverse => "fetch_universe",
            ScanStage::FetchDaily => "fetch_daily",
            ScanStage::CleanDaily => "clean_daily",
            ScanStage::ScoreRank => "score_rank",
            ScanStage::FetchIntraday => "fetch_intraday",
            ScanStage::CleanIntraday => "clean_intraday",
            ScanStage::Confirm => "confirm",
            ScanStage::Done => "done",
            ScanStage::Aborted => "aborted",
        };
        write!(f, "{}", s)
    }
}

/// Tunable parameters for one scan cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// Benchmark symbol for relative strength
    pub benchmark: String,
    /// Exchanges admitted to the universe
    pub exchanges: Vec<String>,
    /// Require shortable assets in the universe
    pub require_shortable: bool,
    /// Calendar days of daily history to fetch
    pub daily_lookback_days: i64,
    /// Calendar days of minute history to fetch for confirmation
    pub intraday_lookback_days: i64,
    /// Sessions averaged by the intraday RVOL baseline
    pub intraday_rvol_lookback_days: usize,
    /// Composite score cutoff for the ranked list
    pub score_threshold: f64,
    /// Ranked symbols forwarded to intraday confirmation
    pub top_n: usize,
    /// Maximum symbols per bars request
    pub max_api_batch: usize,
    /// Pause after each successful bars request, in milliseconds
    pub pacing_ms: u64,
    /// Shared REST call budget per minute
    pub rest_calls_per_minute: u32,
    /// Composite score weights
    pub weights: ScoreWeights,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            benchmark: "SPY".to_string(),
            exchanges: vec!["NASDAQ".to_string(), "NYSE".to_string()],
            require_shortable: true,
            daily_lookback_days: 220,
            intraday_lookback_days: 15,
            intraday_rvol_lookback_days: 10,
            score_threshold: 0.4,
            top_n: 10,
            max_api_batch: 200,
            pacing_ms: 500,
            rest_calls_per_minute: 200,
            weights: ScoreWeights::default(),
        }
    }
}

/// Result of one scan cycle. `ranked`/`confirmed` hold whatever was produced
/// before the terminal stage; an aborted cycle carries empty collections
/// rather than an error.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub stage: ScanStage,
    pub universe_size: usize,
    pub ranked: RankedList,
    pub confirmed: ConfirmedSet,
}

/// Sequences one scan cycle: universe fetch, daily fetch, clean, score,
/// rank, intraday fetch, clean, confirm.
///
/// The pipeline is single-task and sequential; the market client and rate
/// limiter are the only long-lived resources and are owned here across
/// cycles. Each cycle owns its own panels and scores.
pub struct ScanOrchestrator<M: MarketData> {
    market: M,
    params: ScanParams,
    limiter: RateLimiter,
    fetcher: BatchFetcher,
    cache: PanelCache,
    stage: ScanStage,
}

impl<M: MarketData> ScanOrchestrator<M> {
    /// Create an orchestrator around a market-data client.
    pub fn new(market: M, params: ScanParams) -> Self {
        let limiter = RateLimiter::new(params.rest_calls_per_minute);
        let fetcher = BatchFetcher::new(params.max_api_batch)
            .with_pacing(Duration::from_millis(params.pacing_ms));
        Self {
            market,
            params,
            limiter,
            fetcher,
            cache: PanelCache::new(),
            stage: ScanStage::Idle,
        }
    }

    /// Current stage of the cycle.
    pub fn stage(&self) -> ScanStage {
        self.stage
    }

    /// Cleaned panels published by the latest cycle.
    pub fn cache(&self) -> &PanelCache {
        &self.cache
    }

    /// Run one full scan cycle.
    pub async fn run_cycle(&mut self) -> ScanOutcome {
        info!("starting scan cycle");

        // Universe
        self.advance(ScanStage::FetchUniverse);
        let filter = UniverseFilter {
            exchanges: self.params.exchanges.clone(),
            require_shortable: self.params.require_shortable,
        };
        let universe = match filter.fetch_universe(&self.market).await {
            Ok(universe) => universe,
            Err(e) => {
                error!(error = %e, "universe fetch failed");
                return self.abort(0, RankedList::default(), ConfirmedSet::default());
            }
        };
        if universe.is_empty() {
            warn!("universe is empty");
            return self.abort(0, RankedList::default(), ConfirmedSet::default());
        }

        // Daily history for the universe plus the benchmark
        self.advance(ScanStage::FetchDaily);
        let mut request = universe.clone();
        if !request.iter().any(|s| s == &self.params.benchmark) {
            request.push(self.params.benchmark.clone());
        }
        let end = Utc::now();
        let start = end - chrono::Duration::days(self.params.daily_lookback_days);
        let raw_daily = self
            .fetcher
            .fetch(
                &self.market,
                &mut self.limiter,
                &request,
                Timeframe::Day,
                start,
                end,
            )
            .await;

        self.advance(ScanStage::CleanDaily);
        let daily = DataCleaner::clean(raw_daily, Timeframe::Day, true, false);
        if daily.is_empty() {
            warn!("no daily data after cleaning");
            return self.abort(universe.len(), RankedList::default(), ConfirmedSet::default());
        }
        self.cache.insert(DAILY_PANEL_KEY, daily.clone());

        // Score + rank
        self.advance(ScanStage::ScoreRank);
        let model =
            ScoringModel::new(self.params.benchmark.clone()).with_weights(self.params.weights);
        let records = model.score(&daily);
        let ranked = Ranker::new(self.params.score_threshold).rank(records);
        if ranked.is_empty() {
            info!("no candidates passed the daily filter");
            return self.abort(universe.len(), ranked, ConfirmedSet::default());
        }
        info!(candidates = ranked.len(), "daily ranking complete");

        // Intraday confirmation for the top candidates only
        self.advance(ScanStage::FetchIntraday);
        let top = ranked.top_symbols(self.params.top_n);
        let intraday_start = end - chrono::Duration::days(self.params.intraday_lookback_days);
        let raw_minute = self
            .fetcher
            .fetch(
                &self.market,
                &mut self.limiter,
                &top,
                Timeframe::Minute,
                intraday_start,
                end,
            )
            .await;

        self.advance(ScanStage::CleanIntraday);
        let minute = DataCleaner::clean(raw_minute, Timeframe::Minute, true, false);
        if minute.is_empty() {
            warn!("no intraday data after cleaning");
            return self.abort(universe.len(), ranked, ConfirmedSet::default());
        }
        self.cache.insert(INTRADAY_PANEL_KEY, minute.clone());

        self.advance(ScanStage::Confirm);
        let confirmed =
            IntradayConfirmer::new(self.params.intraday_rvol_lookback_days).confirm(&minute);

        self.advance(ScanStage::Done);
        info!(
            ranked = ranked.len(),
            confirmed = confirmed.len(),
            "scan cycle complete"
        );

        ScanOutcome {
            stage: ScanStage::Done,
            universe_size: universe.len(),
            ranked,
            confirmed,
        }
    }

    fn advance(&mut self, stage: ScanStage) {
        self.stage = stage;
        debug!(stage = %stage, "scan stage");
    }

    fn abort(
        &mut self,
        universe_size: usize,
        ranked: RankedList,
        confirmed: ConfirmedSet,
    ) -> ScanOutcome {
        self.stage = ScanStage::Aborted;
        ScanOutcome {
            stage: ScanStage::Aborted,
            universe_size,
            ranked,
            confirmed,
        }
    }
}
