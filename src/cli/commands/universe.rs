//! Universe listing command.

use anyhow::Result;
use std::path::Path;

use scanner_engine::UniverseFilter;

use crate::cli::UniverseArgs;

pub async fn run(args: UniverseArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_app_config(config_path)?;
    let client = super::build_client(&config)?;

    let filter = UniverseFilter {
        exchanges: config.scan.exchanges.clone(),
        require_shortable: config.scan.require_shortable,
    };
    let symbols = filter.fetch_universe(&client).await?;

    println!("Universe: {} symbols", symbols.len());
    println!("───────────────────────────────────────────────────────────");
    for symbol in symbols.iter().take(args.limit) {
        println!("  {}", symbol);
    }
    if symbols.len() > args.limit {
        println!("  ... and {} more", symbols.len() - args.limit);
    }

    Ok(())
}
