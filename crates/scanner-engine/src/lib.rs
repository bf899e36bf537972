//! Scan engine: universe filtering, scoring, ranking, intraday confirmation,
//! and the orchestrator that sequences one scan cycle.

pub mod confirm;
pub mod orchestrator;
pub mod rank;
pub mod relative_strength;
pub mod score;
pub mod setup;
pub mod universe;

pub use confirm::IntradayConfirmer;
pub use orchestrator::{ScanOrchestrator, ScanOutcome, ScanParams, ScanStage};
pub use rank::Ranker;
pub use score::{ScoreWeights, ScoringModel};
pub use universe::UniverseFilter;
