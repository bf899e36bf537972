//! Stock universe selection.

use tracing::info;

use scanner_core::error::FetchError;
use scanner_core::traits::MarketData;
use scanner_core::types::{Asset, AssetClass, AssetStatus};

/// Filters the active US-equity asset listing down to the scannable universe.
#[derive(Debug, Clone)]
pub struct UniverseFilter {
    pub exchanges: Vec<String>,
    pub require_shortable: bool,
}

impl Default for UniverseFilter {
    fn default() -> Self {
        Self {
            exchanges: vec!["NASDAQ".to_string(), "NYSE".to_string()],
            require_shortable: true,
        }
    }
}

impl UniverseFilter {
    /// Check whether an asset belongs in the universe.
    pub fn matches(&self, asset: &Asset) -> bool {
        asset.tradable
            && (!self.require_shortable || asset.shortable)
            && self.exchanges.iter().any(|e| e == &asset.exchange)
    }

    /// Fetch and filter the universe. Listing failure is a
    /// [`FetchError::Universe`]; the caller aborts the cycle on it.
    pub async fn fetch_universe<M: MarketData + ?Sized>(
        &self,
        market: &M,
    ) -> Result<Vec<String>, FetchError> {
        let assets = market
            .list_assets(AssetStatus::Active, AssetClass::UsEquity)
            .await
            .map_err(|e| FetchError::Universe(e.to_string()))?;

        let symbols: Vec<String> = assets
            .into_iter()
            .filter(|a| self.matches(a))
            .map(|a| a.symbol)
            .collect();

        info!(count = symbols.len(), "universe selected");
        Ok(symbols)
    }
}
