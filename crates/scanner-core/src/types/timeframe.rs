//! Timeframe definitions for market data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar granularity accepted by the market-data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// 1 minute bars
    #[serde(rename = "1m")]
    Minute,
    /// 1 hour bars
    #[serde(rename = "1h")]
    Hour,
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Day,
}

impl Timeframe {
    /// Get the duration of the timeframe in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Timeframe::Minute => 60,
            Timeframe::Hour => 3600,
            Timeframe::Day => 86400,
        }
    }

    /// Get the duration of the timeframe in milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.as_secs() as i64 * 1000
    }

    /// Check if this is an intraday timeframe.
    pub fn is_intraday(&self) -> bool {
        matches!(self, Timeframe::Minute | Timeframe::Hour)
    }

    /// Wire format expected by the bars endpoint.
    pub fn api_str(&self) -> &'static str {
        match self {
            Timeframe::Minute => "1Min",
            Timeframe::Hour => "1Hour",
            Timeframe::Day => "1Day",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute => "1m",
            Timeframe::Hour => "1h",
            Timeframe::Day => "1d",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute),
            "1h" | "1hour" | "hour" => Ok(Timeframe::Hour),
            "1d" | "day" | "daily" => Ok(Timeframe::Day),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}
