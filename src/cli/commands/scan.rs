//! Scan command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use scanner_engine::ScanOrchestrator;
use scanner_monitor::ScanReport;

use crate::cli::ScanArgs;

pub async fn run(args: ScanArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_app_config(config_path)?;

    let mut params = config.scan.clone();
    if let Some(benchmark) = args.benchmark {
        params.benchmark = benchmark;
    }
    if let Some(threshold) = args.threshold {
        params.score_threshold = threshold;
    }
    if let Some(top) = args.top {
        params.top_n = top;
    }

    let client = super::build_client(&config)?;

    info!(benchmark = %params.benchmark, "starting scan");
    let mut orchestrator = ScanOrchestrator::new(client, params);
    let outcome = orchestrator.run_cycle().await;

    let report = ScanReport {
        universe_size: outcome.universe_size,
        ranked: outcome.ranked,
        confirmed: outcome.confirmed,
    };

    match args.output.as_str() {
        "json" => println!("{}", report.to_json()?),
        _ => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}
