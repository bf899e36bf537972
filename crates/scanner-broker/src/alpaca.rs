//! Alpaca market-data client.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use scanner_core::error::FetchError;
use scanner_core::traits::MarketData;
use scanner_core::types::{Asset, AssetClass, AssetStatus, Bar, Timeframe};

/// Alpaca API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub paper: bool,
}

impl AlpacaConfig {
    /// Create config directly with key and secret.
    pub fn new(api_key: String, api_secret: String, paper: bool) -> Self {
        Self {
            api_key,
            api_secret,
            paper,
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self, FetchError> {
        let api_key = std::env::var("ALPACA_API_KEY")
            .map_err(|_| FetchError::Universe("ALPACA_API_KEY not set".into()))?;
        let api_secret = std::env::var("ALPACA_API_SECRET")
            .map_err(|_| FetchError::Universe("ALPACA_API_SECRET not set".into()))?;
        let paper = std::env::var("ALPACA_PAPER")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Self {
            api_key,
            api_secret,
            paper,
        })
    }

    pub fn base_url(&self) -> &str {
        if self.paper {
            "https://paper-api.alpaca.markets"
        } else {
            "https://api.alpaca.markets"
        }
    }

    pub fn data_url(&self) -> &str {
        "https://data.alpaca.markets"
    }
}

/// Alpaca API response types
#[derive(Debug, Deserialize)]
struct AlpacaAsset {
    symbol: String,
    exchange: String,
    tradable: bool,
    #[serde(default)]
    shortable: bool,
    #[serde(default)]
    fractionable: bool,
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    #[serde(default)]
    bars: HashMap<String, Vec<AlpacaBar>>,
    next_page_token: Option<String>,
}

/// Alpaca market-data client.
pub struct AlpacaClient {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaClient {
    /// Create a new Alpaca client.
    pub fn new(config: AlpacaConfig) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| FetchError::Universe(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| FetchError::Universe(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, FetchError> {
        let config = AlpacaConfig::from_env()?;
        Self::new(config)
    }

    fn parse_bar(raw: &AlpacaBar) -> Bar {
        let ts = DateTime::parse_from_rfc3339(&raw.t)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0);
        Bar::new(ts, raw.o, raw.h, raw.l, raw.c, raw.v)
    }
}

#[async_trait]
impl MarketData for AlpacaClient {
    async fn list_assets(
        &self,
        status: AssetStatus,
        class: AssetClass,
    ) -> Result<Vec<Asset>, FetchError> {
        let url = format!("{}/v2/assets", self.config.base_url());

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("status", status.to_string()),
                ("asset_class", class.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api(format!("{}: {}", status, text)));
        }

        let assets: Vec<AlpacaAsset> = resp
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        debug!(count = assets.len(), "fetched asset universe");

        Ok(assets
            .into_iter()
            .map(|a| Asset {
                symbol: a.symbol,
                exchange: a.exchange,
                tradable: a.tradable,
                shortable: a.shortable,
                fractionable: a.fractionable,
            })
            .collect())
    }

    async fn get_bars(
        &self,
        symbols: &[String],
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(String, Bar)>, FetchError> {
        let url = format!("{}/v2/stocks/bars", self.config.data_url());
        let symbols_param = symbols.join(",");

        let mut rows: Vec<(String, Bar)> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("symbols", symbols_param.clone()),
                ("timeframe", timeframe.api_str().to_string()),
                ("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("feed", "iex".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("page_token", token.clone()));
            }

            let resp = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|e| FetchError::Connection(e.to_string()))?;

            if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(FetchError::RateLimited {
                    retry_after_secs: 60,
                });
            }

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(FetchError::Api(format!("{}: {}", status, text)));
            }

            let data: AlpacaBarsResponse = resp
                .json()
                .await
                .map_err(|e| FetchError::Parse(e.to_string()))?;

            for (symbol, bars) in data.bars {
                rows.extend(bars.iter().map(|b| (symbol.clone(), Self::parse_bar(b))));
            }

            match data.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(rows)
    }

    fn name(&self) -> &str {
        if self.config.paper {
            "Alpaca Paper"
        } else {
            "Alpaca Live"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_urls() {
        let paper = AlpacaConfig::new("k".into(), "s".into(), true);
        assert_eq!(paper.base_url(), "https://paper-api.alpaca.markets");

        let live = AlpacaConfig::new("k".into(), "s".into(), false);
        assert_eq!(live.base_url(), "https://api.alpaca.markets");
        assert_eq!(live.data_url(), "https://data.alpaca.markets");
    }

    #[test]
    fn test_parse_bar_timestamp() {
        let raw = AlpacaBar {
            t: "2024-01-15T14:30:00Z".to_string(),
            o: 1.0,
            h: 2.0,
            l: 0.5,
            c: 1.5,
            v: 1000.0,
        };

        let bar = AlpacaClient::parse_bar(&raw);
        assert_eq!(bar.timestamp, 1_705_329_000_000);
        assert_eq!(bar.close, 1.5);
    }

    #[test]
    fn test_bars_response_deserializes() {
        let json = r#"{
            "bars": {
                "AAPL": [
                    {"t": "2024-01-15T05:00:00Z", "o": 182.2, "h": 184.3, "l": 181.9, "c": 183.6, "v": 6500000}
                ]
            },
            "next_page_token": null
        }"#;

        let resp: AlpacaBarsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.bars["AAPL"].len(), 1);
        assert!(resp.next_page_token.is_none());
    }

    #[test]
    fn test_bars_response_tolerates_missing_bars() {
        let json = r#"{"next_page_token": null}"#;
        let resp: AlpacaBarsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.bars.is_empty());
    }
}
