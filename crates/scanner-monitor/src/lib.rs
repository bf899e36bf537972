//! Logging setup and scan reporting.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::ScanReport;
