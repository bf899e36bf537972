//! CLI command implementations.

pub mod scan;
pub mod universe;
pub mod validate;

use anyhow::{Context, Result};
use scanner_broker::{AlpacaClient, AlpacaConfig};
use scanner_config::{load_config, load_default_config, AppConfig};
use std::path::Path;

/// Load the app config from a file when given, else from the environment.
pub(crate) fn load_app_config(config_path: Option<&Path>) -> Result<AppConfig> {
    match config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => load_default_config().context("Failed to load configuration from environment"),
    }
}

/// Build the Alpaca client from configured credential env vars.
pub(crate) fn build_client(config: &AppConfig) -> Result<AlpacaClient> {
    let api_key = std::env::var(&config.alpaca.api_key_env)
        .with_context(|| format!("{} not set", config.alpaca.api_key_env))?;
    let api_secret = std::env::var(&config.alpaca.api_secret_env)
        .with_context(|| format!("{} not set", config.alpaca.api_secret_env))?;

    let client = AlpacaClient::new(AlpacaConfig::new(api_key, api_secret, config.alpaca.paper))?;
    Ok(client)
}
