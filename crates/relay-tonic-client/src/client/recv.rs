//! Inbound response receiver.
//!
//! Consumes the runner's half of the engagement stream: applies HTTP
//! result metadata and body data to the call's response sink as they
//! arrive, records completion latency, and reports the exchange's one
//! terminal error (or none) through a capacity-one channel.

use crate::client::classify::parse_finish_error;
use crate::client::stats::StatsObserver;
use crate::client::status::parse_date;
use crate::pool::RunnerCall;
use futures::{Stream, StreamExt};
use relay_tonic_core::{Error, SERVER_BUSY_CODE, proto};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tonic::Status;

/// Post to the terminal channel without blocking. The channel has
/// capacity one and the first error wins; later reports are dropped.
fn try_queue(done: &mpsc::Sender<Error>, err: Error) {
    let _ = done.try_send(err);
}

/// Receive runner messages until the exchange terminates.
///
/// The terminal-signal sender is dropped on every return path, so the
/// orchestrator observes completion through channel closure even when
/// no error was posted.
pub(crate) async fn receive_from_runner<S>(
    mut inbound: S,
    call: Arc<dyn RunnerCall>,
    runner_addr: String,
    stats: Arc<dyn StatsObserver>,
    done: mpsc::Sender<Error>,
) where
    S: Stream<Item = Result<proto::RunnerMsg, Status>> + Unpin + Send,
{
    let sink = call.response_sink();
    let mut http_status: i32 = 0;
    let mut status_committed = false;
    let mut partial_write = false;

    loop {
        let msg = match inbound.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(status)) => {
                tracing::info!(
                    runner_addr = %runner_addr,
                    error = %status,
                    "receive error from runner"
                );
                try_queue(&done, status.into());
                return;
            }
            None => {
                tracing::info!(
                    runner_addr = %runner_addr,
                    "runner closed the stream before completion"
                );
                try_queue(&done, Error::StreamClosed);
                return;
            }
        };

        match msg.body {
            // HTTP metadata. May not arrive at all, e.g. when the
            // runner timed out before the function produced output.
            Some(proto::runner_msg::Body::ResultStart(start)) => match start.meta {
                Some(proto::call_result_start::Meta::Http(http)) => {
                    tracing::debug!(
                        runner_addr = %runner_addr,
                        status = http.status_code,
                        "received http result metadata from runner"
                    );
                    for header in &http.headers {
                        sink.set_header(&header.key, &header.value);
                    }
                    // The status code is committed at most once per
                    // exchange, even if the runner repeats the
                    // metadata message.
                    if http.status_code > 0 && !status_committed {
                        http_status = http.status_code;
                        sink.set_status(http.status_code as u16);
                        status_committed = true;
                    }
                }
                None => {
                    tracing::error!(
                        runner_addr = %runner_addr,
                        "unhandled meta in result start message"
                    );
                }
            },

            // Response body. Ignored after a short write, but frames
            // keep draining so the stream stays consistent.
            Some(proto::runner_msg::Body::Data(frame)) => {
                tracing::debug!(
                    runner_addr = %runner_addr,
                    len = frame.data.len(),
                    eof = frame.eof,
                    "received data from runner"
                );
                if !partial_write {
                    match sink.write_body(&frame.data).await {
                        Ok(written) if written != frame.data.len() => {
                            partial_write = true;
                            tracing::info!(
                                runner_addr = %runner_addr,
                                written,
                                expected = frame.data.len(),
                                "failed to write full response to client"
                            );
                            try_queue(
                                &done,
                                Error::ShortWrite {
                                    written,
                                    expected: frame.data.len(),
                                },
                            );
                        }
                        Err(err) => {
                            partial_write = true;
                            tracing::info!(
                                runner_addr = %runner_addr,
                                error = %err,
                                "failed to write response to client"
                            );
                            try_queue(
                                &done,
                                Error::ShortWrite {
                                    written: 0,
                                    expected: frame.data.len(),
                                },
                            );
                        }
                        Ok(_) => {}
                    }
                }
            }

            // The sole normal-path terminator.
            Some(proto::runner_msg::Body::Finished(finished)) => {
                log_call_finish(&runner_addr, &finished, http_status);
                record_finish_stats(&finished, call.as_ref(), stats.as_ref());
                if let Some(err) = parse_finish_error(&finished) {
                    try_queue(&done, err);
                }
                break;
            }

            None => {
                tracing::error!(
                    runner_addr = %runner_addr,
                    "ignoring unknown message from runner, possible client/server mismatch"
                );
            }
        }
    }

    // The runner is expected to end the stream right after the
    // completion message.
    loop {
        match inbound.next().await {
            None => break,
            Some(Err(status)) => {
                tracing::info!(
                    runner_addr = %runner_addr,
                    error = %status,
                    "error while waiting for end of stream"
                );
                try_queue(&done, status.into());
                break;
            }
            Some(Ok(_)) => {
                tracing::warn!(
                    runner_addr = %runner_addr,
                    "ignoring message while waiting for end of stream"
                );
                // Repeat anomalies are dropped by the capacity-one
                // channel; only the first is significant.
                try_queue(&done, Error::MissingEof);
            }
        }
    }
}

/// Structured completion record. Downgraded to warn only when the
/// runner reports a failure that is neither user-caused nor a busy
/// rejection.
fn log_call_finish(runner_addr: &str, finished: &proto::CallFinished, http_status: i32) {
    let platform_fault =
        !finished.success && !finished.error_user && finished.error_code != SERVER_BUSY_CODE;
    if platform_fault {
        tracing::warn!(
            runner_addr,
            call_id = %finished.details,
            image = %finished.image,
            function_error = %finished.error_str,
            runner_success = finished.success,
            runner_error_code = finished.error_code,
            runner_error_user = finished.error_user,
            runner_http_status = http_status,
            "call finished"
        );
    } else {
        tracing::info!(
            runner_addr,
            call_id = %finished.details,
            image = %finished.image,
            function_error = %finished.error_str,
            runner_success = finished.success,
            runner_error_code = finished.error_code,
            runner_error_user = finished.error_user,
            runner_http_status = http_status,
            "call finished"
        );
    }
}

/// Record runner-reported latency and accumulate execution time onto
/// the call.
fn record_finish_stats(
    finished: &proto::CallFinished,
    call: &dyn RunnerCall,
    stats: &dyn StatsObserver,
) {
    // Monotonic nanosecond deltas cannot be zero if they were
    // transmitted.
    let scheduler = Duration::from_nanos(finished.scheduler_duration.max(0) as u64);
    let execution = Duration::from_nanos(finished.execution_duration.max(0) as u64);

    if !scheduler.is_zero() || !execution.is_zero() {
        if !scheduler.is_zero() {
            stats.record_scheduler_latency(scheduler);
        }
        if !execution.is_zero() {
            stats.record_execution_latency(execution);
            call.add_user_execution_time(execution);
        }
        return;
    }

    // Older runners report wall-clock timestamps instead. Validate
    // ordering, the data comes from the runner's local clock.
    let (Some(created), Some(started), Some(completed)) = (
        parse_date(&finished.created_at),
        parse_date(&finished.started_at),
        parse_date(&finished.completed_at),
    ) else {
        return;
    };
    if started < created || completed < started {
        return;
    }

    let scheduler = (started - created).to_std().unwrap_or_default();
    let execution = (completed - started).to_std().unwrap_or_default();
    stats.record_scheduler_latency(scheduler);
    stats.record_execution_latency(execution);
    call.add_user_execution_time(execution);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testutil::{
        TestCall, TestSink, TestStats, data_msg, finished_err, finished_ok, result_start,
    };
    use relay_tonic_core::proto::{CallFinished, RunnerMsg, runner_msg};

    async fn run_receiver(
        messages: Vec<Result<RunnerMsg, Status>>,
        call: Arc<TestCall>,
        stats: Arc<TestStats>,
    ) -> Vec<Error> {
        let (done_tx, mut done_rx) = mpsc::channel(1);
        let inbound = tokio_stream::iter(messages);
        receive_from_runner(
            inbound,
            call as Arc<dyn RunnerCall>,
            "runner:9190".into(),
            stats as Arc<dyn StatsObserver>,
            done_tx,
        )
        .await;

        let mut posted = Vec::new();
        while let Some(err) = done_rx.recv().await {
            posted.push(err);
        }
        posted
    }

    #[tokio::test]
    async fn applies_metadata_body_and_latency() {
        let call = TestCall::new(b"");
        let stats = Arc::new(TestStats::default());
        let posted = run_receiver(
            vec![
                Ok(result_start(200, &[("X", "1")])),
                Ok(data_msg(b"ab", false)),
                Ok(data_msg(b"cd", false)),
                Ok(finished_ok(1_000_000, 5_000_000)),
            ],
            Arc::clone(&call),
            Arc::clone(&stats),
        )
        .await;

        assert!(posted.is_empty(), "success posted {posted:?}");
        assert_eq!(*call.sink().statuses.lock(), vec![200]);
        assert_eq!(
            *call.sink().headers.lock(),
            vec![("X".to_string(), "1".to_string())]
        );
        assert_eq!(*call.sink().body.lock(), b"abcd");
        assert_eq!(call.user_execution_time(), Duration::from_millis(5));
        assert_eq!(*stats.scheduler.lock(), vec![Duration::from_millis(1)]);
        assert_eq!(*stats.execution.lock(), vec![Duration::from_millis(5)]);
    }

    #[tokio::test]
    async fn status_code_is_committed_at_most_once() {
        let call = TestCall::new(b"");
        let posted = run_receiver(
            vec![
                Ok(result_start(200, &[])),
                Ok(result_start(503, &[("Y", "2")])),
                Ok(finished_ok(0, 0)),
            ],
            Arc::clone(&call),
            Arc::new(TestStats::default()),
        )
        .await;

        assert!(posted.is_empty());
        assert_eq!(*call.sink().statuses.lock(), vec![200]);
        // Headers from the repeated message still apply.
        assert_eq!(
            *call.sink().headers.lock(),
            vec![("Y".to_string(), "2".to_string())]
        );
    }

    #[tokio::test]
    async fn partial_write_latches_and_posts_once() {
        let sink = Arc::new(TestSink::with_write_limit(2));
        let call = TestCall::with_sink(b"", sink);
        let posted = run_receiver(
            vec![
                Ok(data_msg(b"abcd", false)),
                Ok(data_msg(b"efgh", false)),
                Ok(data_msg(b"ijkl", false)),
                Ok(finished_ok(0, 0)),
            ],
            Arc::clone(&call),
            Arc::new(TestStats::default()),
        )
        .await;

        assert_eq!(posted.len(), 1, "expected exactly one short-write error");
        assert!(matches!(
            posted[0],
            Error::ShortWrite {
                written: 2,
                expected: 4
            }
        ));
        // The latch stops sink writes, later frames are drained only.
        assert_eq!(call.sink().write_count(), 1);
        assert_eq!(*call.sink().body.lock(), b"ab");
    }

    #[tokio::test]
    async fn failed_finish_posts_parsed_error() {
        let call = TestCall::new(b"");
        let posted = run_receiver(
            vec![Ok(finished_err(400, "bad input", true))],
            call,
            Arc::new(TestStats::default()),
        )
        .await;

        assert_eq!(posted.len(), 1);
        match &posted[0] {
            Error::User { code, message } => {
                assert_eq!(*code, 400);
                assert_eq!(message, "bad input");
            }
            other => panic!("expected user error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn receive_error_terminates_immediately() {
        let call = TestCall::new(b"");
        let posted = run_receiver(
            vec![
                Ok(data_msg(b"ab", false)),
                Err(Status::internal("stream reset")),
            ],
            Arc::clone(&call),
            Arc::new(TestStats::default()),
        )
        .await;

        assert_eq!(posted.len(), 1);
        assert!(matches!(posted[0], Error::Transport(_)));
        assert_eq!(*call.sink().body.lock(), b"ab");
    }

    #[tokio::test]
    async fn stream_end_without_finish_is_reported() {
        let posted = run_receiver(
            vec![Ok(result_start(200, &[]))],
            TestCall::new(b""),
            Arc::new(TestStats::default()),
        )
        .await;

        assert_eq!(posted.len(), 1);
        assert!(matches!(posted[0], Error::StreamClosed));
    }

    #[tokio::test]
    async fn messages_after_finish_post_missing_eof() {
        let posted = run_receiver(
            vec![
                Ok(finished_ok(0, 0)),
                Ok(data_msg(b"stray", false)),
                Ok(data_msg(b"more", true)),
            ],
            TestCall::new(b""),
            Arc::new(TestStats::default()),
        )
        .await;

        // Duplicates beyond the first anomaly are suppressed by the
        // capacity-one channel.
        assert_eq!(posted.len(), 1);
        assert!(matches!(posted[0], Error::MissingEof));
    }

    #[tokio::test]
    async fn unknown_messages_are_ignored() {
        let call = TestCall::new(b"");
        let posted = run_receiver(
            vec![
                Ok(RunnerMsg { body: None }),
                Ok(data_msg(b"ok", false)),
                Ok(finished_ok(0, 0)),
            ],
            Arc::clone(&call),
            Arc::new(TestStats::default()),
        )
        .await;

        assert!(posted.is_empty());
        assert_eq!(*call.sink().body.lock(), b"ok");
    }

    fn finished_with_timestamps(created: &str, started: &str, completed: &str) -> RunnerMsg {
        RunnerMsg {
            body: Some(runner_msg::Body::Finished(CallFinished {
                success: true,
                created_at: created.into(),
                started_at: started.into(),
                completed_at: completed.into(),
                ..Default::default()
            })),
        }
    }

    #[tokio::test]
    async fn timestamp_fallback_derives_latency() {
        let call = TestCall::new(b"");
        let stats = Arc::new(TestStats::default());
        run_receiver(
            vec![Ok(finished_with_timestamps(
                "2026-02-03T04:05:06Z",
                "2026-02-03T04:05:08Z",
                "2026-02-03T04:05:11Z",
            ))],
            Arc::clone(&call),
            Arc::clone(&stats),
        )
        .await;

        assert_eq!(*stats.scheduler.lock(), vec![Duration::from_secs(2)]);
        assert_eq!(*stats.execution.lock(), vec![Duration::from_secs(3)]);
        assert_eq!(call.user_execution_time(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn non_monotonic_timestamps_record_nothing() {
        let stats = Arc::new(TestStats::default());
        run_receiver(
            vec![Ok(finished_with_timestamps(
                "2026-02-03T04:05:08Z",
                "2026-02-03T04:05:06Z",
                "2026-02-03T04:05:11Z",
            ))],
            TestCall::new(b""),
            Arc::clone(&stats),
        )
        .await;

        assert!(stats.scheduler.lock().is_empty());
        assert!(stats.execution.lock().is_empty());
    }

    #[tokio::test]
    async fn malformed_timestamps_record_nothing() {
        let stats = Arc::new(TestStats::default());
        run_receiver(
            vec![Ok(finished_with_timestamps(
                "2026-02-03T04:05:06Z",
                "yesterday",
                "2026-02-03T04:05:11Z",
            ))],
            TestCall::new(b""),
            Arc::clone(&stats),
        )
        .await;

        assert!(stats.scheduler.lock().is_empty());
        assert!(stats.execution.lock().is_empty());
    }
}
