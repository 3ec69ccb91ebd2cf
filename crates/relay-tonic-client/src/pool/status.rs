//! Pool-side view of a runner's health snapshot.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Point-in-time counters and timestamps reported by a runner.
///
/// Immutable once constructed; produced per `Status` query. Latency
/// fields are monotonic durations reported by the runner itself;
/// timestamps are best-effort parsed and absent when malformed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunnerStatus {
    pub active_request_count: i32,
    pub requests_received: u64,
    pub requests_handled: u64,
    pub failed: bool,
    pub kdumps_on_disk: u64,
    pub cached: bool,
    pub id: String,
    pub details: String,
    pub error_code: i32,
    pub error_str: String,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub scheduler_duration: Duration,
    pub execution_duration: Duration,
    pub is_network_disabled: bool,
}
