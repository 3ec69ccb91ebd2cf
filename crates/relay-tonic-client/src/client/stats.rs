//! Latency observation seam.
//!
//! The receiver reports runner-measured scheduler and execution
//! latency through this trait instead of writing to any particular
//! metrics backend; wire it to whatever the hosting process uses.

use std::time::Duration;

/// Sink for per-exchange latency figures reported by runners.
pub trait StatsObserver: Send + Sync {
    /// Time the call spent queued on the runner before execution
    /// began.
    fn record_scheduler_latency(&self, elapsed: Duration);

    /// Time the function spent executing on the runner.
    fn record_execution_latency(&self, elapsed: Duration);
}

/// Default observer that drops all measurements.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopStats;

impl StatsObserver for NoopStats {
    fn record_scheduler_latency(&self, _elapsed: Duration) {}

    fn record_execution_latency(&self, _elapsed: Duration) {}
}
