//! Validate configuration command.

use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {:?}", path),
        None => println!("Validating environment configuration"),
    }

    match super::load_app_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Alpaca paper mode: {}", config.alpaca.paper);
            println!("Benchmark: {}", config.scan.benchmark);
            println!("Exchanges: {}", config.scan.exchanges.join(", "));
            println!("Score threshold: {}", config.scan.score_threshold);
            println!("Top candidates: {}", config.scan.top_n);
            println!("REST budget: {}/min", config.scan.rest_calls_per_minute);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
