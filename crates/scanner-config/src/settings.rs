//! Configuration structures.

use serde::{Deserialize, Serialize};

use scanner_engine::ScanParams;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub scan: ScanParams,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "scanner".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Alpaca API configuration. Credentials are read from the named environment
/// variables, never stored in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlpacaSettings {
    pub api_key_env: String,
    pub api_secret_env: String,
    pub paper: bool,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            paper: true,
        }
    }
}
