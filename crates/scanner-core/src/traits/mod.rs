//! Core traits for the scan pipeline.

mod indicator;
mod market_data;

pub use indicator::{Indicator, MultiOutputIndicator};
pub use market_data::MarketData;
