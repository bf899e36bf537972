//! Core data types for the scan pipeline.

mod asset;
mod bar;
mod panel;
mod scan;
mod timeframe;

pub use asset::{Asset, AssetClass, AssetStatus};
pub use bar::{Bar, DAY_MS, MINUTE_MS};
pub use panel::Panel;
pub use scan::{ComponentScores, ConfirmedSet, Confirmation, RankedList, ScoreRecord};
pub use timeframe::Timeframe;
