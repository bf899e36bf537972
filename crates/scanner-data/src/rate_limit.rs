//! Per-minute REST call budget tracking.

use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60);

/// Owns the per-minute call budget, the call counter, and the window reset
/// timer. Long-lived and shared by all fetches within a scan; mutation is
/// sequential (single orchestrator run), so no locking is needed.
#[derive(Debug)]
pub struct RateLimiter {
    calls_per_minute: u32,
    calls_this_minute: u32,
    window_start: Instant,
}

impl RateLimiter {
    /// Create a limiter for the configured per-minute budget.
    pub fn new(calls_per_minute: u32) -> Self {
        assert!(calls_per_minute > 0, "Call budget must be greater than 0");
        Self {
            calls_per_minute,
            calls_this_minute: 0,
            window_start: Instant::now(),
        }
    }

    /// Record one issued REST call, rolling the minute window if it elapsed.
    pub fn record_call(&mut self) {
        self.roll_window();
        self.calls_this_minute += 1;
    }

    /// Calls left in the current minute window.
    pub fn remaining(&mut self) -> u32 {
        self.roll_window();
        self.calls_per_minute.saturating_sub(self.calls_this_minute)
    }

    /// Calls recorded in the current window.
    pub fn calls_this_minute(&self) -> u32 {
        self.calls_this_minute
    }

    /// Batch-size budget for one caller: half the per-minute allowance,
    /// reserving headroom for other consumers of the same budget.
    pub fn batch_budget(&self) -> usize {
        ((self.calls_per_minute / 2).max(1)) as usize
    }

    fn roll_window(&mut self) {
        if self.window_start.elapsed() >= WINDOW {
            self.window_start = Instant::now();
            self.calls_this_minute = 0;
        }
    }
}
