//! Core types and traits for the scan pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Panel, Timeframe, Asset)
//! - Scan output types (ScoreRecord, RankedList, ConfirmedSet)
//! - Core traits for market data sources and indicators

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ScanError, ScanResult};
pub use types::*;
pub use traits::*;
