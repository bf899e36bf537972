//! Tradable asset metadata from the universe listing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing status filter for the assets endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Active,
    Inactive,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStatus::Active => write!(f, "active"),
            AssetStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Asset class filter for the assets endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    UsEquity,
    Crypto,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::UsEquity => write!(f, "us_equity"),
            AssetClass::Crypto => write!(f, "crypto"),
        }
    }
}

/// One entry in the asset universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub exchange: String,
    pub tradable: bool,
    pub shortable: bool,
    pub fractionable: bool,
}
