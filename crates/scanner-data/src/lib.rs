//! Data acquisition and cleaning for the scan pipeline.

mod cache;
mod clean;
mod fetch;
mod rate_limit;

pub use cache::PanelCache;
pub use clean::DataCleaner;
pub use fetch::BatchFetcher;
pub use rate_limit::RateLimiter;
