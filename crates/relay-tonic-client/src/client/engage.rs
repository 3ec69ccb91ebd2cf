//! Engagement orchestration: one placement attempt over an open
//! stream.

use crate::client::classify::is_too_busy;
use crate::client::recv::receive_from_runner;
use crate::client::send::send_to_runner;
use crate::client::stats::StatsObserver;
use crate::pool::{Placement, RequestContext, RunnerCall};
use futures::{Stream, StreamExt};
use relay_tonic_core::{Error, proto};
use std::sync::Arc;
use tokio::sync::mpsc;
use tonic::{Code, Status};

/// Drive one exchange after the stream has been opened: send the
/// placement request, run the streamer and receiver concurrently, and
/// race their terminal signal against caller cancellation.
///
/// Once the placement request is accepted by the transport the
/// exchange is committed; the only way back to a retryable outcome is
/// the runner's explicit busy rejection. On cancellation the two
/// background tasks are left to observe the dead stream and exit on
/// their own; joining them here would reintroduce the cancellation
/// hang this design avoids.
pub(crate) async fn run_exchange<S>(
    ctx: &RequestContext,
    call: Arc<dyn RunnerCall>,
    place: proto::ClientMsg,
    tx: mpsc::Sender<proto::ClientMsg>,
    mut inbound: S,
    runner_addr: String,
    stats: Arc<dyn StatsObserver>,
) -> Placement
where
    S: Stream<Item = Result<proto::RunnerMsg, Status>> + Unpin + Send + 'static,
{
    if tx.send(place).await.is_err() {
        // The outbound channel only closes once the transport tore the
        // stream down, so the message never left this process. The
        // receive side holds the authoritative status; anything but
        // "unavailable" cannot rule out partial delivery.
        let status = match inbound.next().await {
            Some(Err(status)) => status,
            _ => Status::unknown("stream closed before placement request was sent"),
        };
        tracing::info!(
            runner_addr = %runner_addr,
            error = %status,
            "failed to send placement request to runner"
        );
        return if status.code() == Code::Unavailable {
            Placement::NotPlaced(status.into())
        } else {
            Placement::Committed(Err(status.into()))
        };
    }

    // Placement request is on the wire: the exchange is committed
    // unless the runner proves otherwise.
    let (done_tx, mut done_rx) = mpsc::channel(1);
    tokio::spawn(receive_from_runner(
        inbound,
        Arc::clone(&call),
        runner_addr.clone(),
        stats,
        done_tx,
    ));
    tokio::spawn(send_to_runner(tx, call, runner_addr.clone()));

    tokio::select! {
        _ = ctx.cancelled() => {
            tracing::info!(
                runner_addr = %runner_addr,
                "engagement context ended before completion"
            );
            Placement::Committed(Err(Error::Cancelled))
        }
        terminal = done_rx.recv() => match terminal {
            Some(err) if is_too_busy(&err) => Placement::NotPlaced(Error::ServerBusy),
            Some(err) => Placement::Committed(Err(err)),
            None => Placement::Committed(Ok(())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testutil::{
        TestCall, TestStats, data_msg, finished_err, finished_ok, result_start,
    };
    use relay_tonic_core::proto::{ClientMsg, PlaceCall, RunnerMsg, client_msg};
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::wrappers::ReceiverStream;
    use tokio_util::sync::CancellationToken;

    fn place_msg() -> ClientMsg {
        ClientMsg {
            body: Some(client_msg::Body::Place(PlaceCall {
                model_json: "{}".into(),
                slot_hash_id: "736c6f74".into(),
                extensions: Default::default(),
            })),
        }
    }

    async fn run_with_inbound(
        messages: Vec<Result<RunnerMsg, Status>>,
        ctx: RequestContext,
    ) -> (Placement, Arc<TestCall>) {
        let call = TestCall::new(b"body");
        let (tx, outbound) = mpsc::channel(64);
        // Keep the request stream alive for the whole exchange.
        let _outbound = outbound;
        let placement = run_exchange(
            &ctx,
            Arc::clone(&call) as Arc<dyn RunnerCall>,
            place_msg(),
            tx,
            tokio_stream::iter(messages),
            "runner:9190".into(),
            Arc::new(TestStats::default()),
        )
        .await;
        (placement, call)
    }

    #[tokio::test]
    async fn successful_exchange_commits_cleanly() {
        let (placement, call) = run_with_inbound(
            vec![
                Ok(result_start(200, &[("X", "1")])),
                Ok(data_msg(b"ab", false)),
                Ok(data_msg(b"cd", false)),
                Ok(finished_ok(1_000_000, 5_000_000)),
            ],
            RequestContext::new(),
        )
        .await;

        assert!(placement.committed());
        assert!(placement.error().is_none());
        assert_eq!(*call.sink().statuses.lock(), vec![200]);
        assert_eq!(*call.sink().body.lock(), b"abcd");
        assert_eq!(call.user_execution_time(), Duration::from_millis(5));
    }

    #[tokio::test]
    async fn busy_rejection_is_not_placed() {
        let (placement, _call) = run_with_inbound(
            vec![Ok(finished_err(503, "no capacity", false))],
            RequestContext::new(),
        )
        .await;

        assert!(!placement.committed());
        assert!(matches!(placement.error(), Some(Error::ServerBusy)));
    }

    #[tokio::test]
    async fn user_failure_stays_committed() {
        let (placement, _call) = run_with_inbound(
            vec![Ok(finished_err(400, "bad input", true))],
            RequestContext::new(),
        )
        .await;

        assert!(placement.committed());
        match placement.error() {
            Some(Error::User { code, .. }) => assert_eq!(*code, 400),
            other => panic!("expected user error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_short_circuits_the_race() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());
        let call = TestCall::new(b"body");

        // An inbound stream that stays open and silent.
        let (inbound_tx, inbound_rx) =
            mpsc::channel::<Result<RunnerMsg, Status>>(1);
        let _inbound_tx = inbound_tx;
        let (tx, outbound) = mpsc::channel(64);
        let _outbound = outbound;

        token.cancel();
        let placement = timeout(
            Duration::from_secs(1),
            run_exchange(
                &ctx,
                call as Arc<dyn RunnerCall>,
                place_msg(),
                tx,
                ReceiverStream::new(inbound_rx),
                "runner:9190".into(),
                Arc::new(TestStats::default()),
            ),
        )
        .await
        .expect("cancellation did not short-circuit");

        assert!(placement.committed());
        assert!(matches!(placement.error(), Some(Error::Cancelled)));
    }

    #[tokio::test]
    async fn placement_send_failure_classifies_by_transport_code() {
        for (code, expect_committed) in [
            (Code::Unavailable, false),
            (Code::Internal, true),
            (Code::Unknown, true),
        ] {
            let call = TestCall::new(b"body");
            let (tx, outbound) = mpsc::channel(1);
            // Dead stream: the transport already dropped the request
            // stream and the receive side reports why.
            drop(outbound);
            let inbound =
                tokio_stream::iter(vec![Err::<RunnerMsg, _>(Status::new(code, "send failed"))]);

            let placement = run_exchange(
                &RequestContext::new(),
                call as Arc<dyn RunnerCall>,
                place_msg(),
                tx,
                inbound,
                "runner:9190".into(),
                Arc::new(TestStats::default()),
            )
            .await;

            assert_eq!(placement.committed(), expect_committed, "code {code:?}");
            assert!(matches!(placement.error(), Some(Error::Transport(_))));
        }
    }
}
