//! Translation of wire-level status snapshots into the pool's view.

use crate::pool::RunnerStatus;
use chrono::{DateTime, Utc};
use relay_tonic_core::proto;
use std::time::Duration;

/// Translate a wire snapshot into the pool's status value.
///
/// `None` (runner unreachable) translates to `None`. Duration fields
/// are monotonic nanosecond deltas and cannot be zero if they were
/// transmitted; timestamps are parsed best-effort and absent when
/// malformed.
pub fn translate_runner_status(status: Option<proto::RunnerStatus>) -> Option<RunnerStatus> {
    status.as_ref().map(translate_snapshot)
}

pub(crate) fn translate_snapshot(status: &proto::RunnerStatus) -> RunnerStatus {
    RunnerStatus {
        active_request_count: status.active,
        requests_received: status.requests_received,
        requests_handled: status.requests_handled,
        failed: status.failed,
        kdumps_on_disk: status.kdumps_on_disk,
        cached: status.cached,
        id: status.id.clone(),
        details: status.details.clone(),
        error_code: status.error_code,
        error_str: status.error_str.clone(),
        created_at: parse_date(&status.created_at),
        started_at: parse_date(&status.started_at),
        completed_at: parse_date(&status.completed_at),
        scheduler_duration: Duration::from_nanos(status.scheduler_duration.max(0) as u64),
        execution_duration: Duration::from_nanos(status.execution_duration.max(0) as u64),
        is_network_disabled: status.is_network_disabled,
    }
}

/// Best-effort RFC 3339 parse; malformed input is not an error for
/// the caller, it simply yields no timestamp.
pub(crate) fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
