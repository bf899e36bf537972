//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scanner")]
#[command(author, version, about = "Equity long-setup scanner with intraday confirmation")]
pub struct Cli {
    /// Configuration file path (environment-only config when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one scan cycle
    Scan(ScanArgs),
    /// List the filtered stock universe
    Universe(UniverseArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Benchmark symbol override
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Composite score threshold override
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Number of top candidates to confirm intraday
    #[arg(long)]
    pub top: Option<usize>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save the report to a file (JSON)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct UniverseArgs {
    /// Maximum symbols to print
    #[arg(long, default_value = "50")]
    pub limit: usize,
}
