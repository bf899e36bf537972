//! Market data source trait definitions.

use crate::error::FetchError;
use crate::types::{Asset, AssetClass, AssetStatus, Bar, Timeframe};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for the market-data/brokerage collaborator.
///
/// The pipeline treats implementations as untrusted: any call may fail and
/// callers handle failures per the fetch policy (skip batch / abort cycle).
#[async_trait]
pub trait MarketData: Send + Sync {
    /// List assets matching the given status and class.
    async fn list_assets(
        &self,
        status: AssetStatus,
        class: AssetClass,
    ) -> Result<Vec<Asset>, FetchError>;

    /// Fetch historical bars for multiple symbols as raw (symbol, bar) rows.
    ///
    /// Rows carry no ordering guarantee; the caller assembles and sorts them.
    async fn get_bars(
        &self,
        symbols: &[String],
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(String, Bar)>, FetchError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
