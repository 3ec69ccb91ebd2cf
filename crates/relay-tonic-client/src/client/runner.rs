//! gRPC-backed runner connection.

use crate::client::engage::run_exchange;
use crate::client::session::SessionGuard;
use crate::client::stats::{NoopStats, StatsObserver};
use crate::client::status::translate_snapshot;
use crate::pool::{Placement, RequestContext, Runner, RunnerCall, RunnerStatus};
use relay_tonic_core::proto::runner_protocol_client::RunnerProtocolClient;
use relay_tonic_core::{Error, REQUEST_ID_METADATA_KEY, Result, proto};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Request;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, Endpoint};

/// Fail-fast budget for establishing the underlying connection.
const CONNECT_TIMEOUT: Duration = Duration::from_millis(100);

/// Outbound frames buffered between the streamer and the transport.
const OUTBOUND_BUFFER: usize = 8;

/// One long-lived connection to a runner, reused across many
/// exchanges.
///
/// The channel is shared by concurrent exchanges; the transport
/// multiplexes them. [`close`](GrpcRunner::close) fences new
/// exchanges and waits for in-flight ones to drain; the channel
/// itself is torn down when the last clone of it drops.
pub struct GrpcRunner {
    address: String,
    client: RunnerProtocolClient<Channel>,
    sessions: SessionGuard,
    stats: Arc<dyn StatsObserver>,
}

impl GrpcRunner {
    /// Connect to a runner at `host:port`.
    ///
    /// The connection is established lazily: construction succeeds
    /// while the peer is still resolving, and the first exchange
    /// observes any dial failure.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let endpoint = Endpoint::from_shared(format!("http://{address}"))
            .map_err(|err| Error::InvalidAddress {
                reason: err.to_string(),
            })?
            .connect_timeout(CONNECT_TIMEOUT);
        Ok(Self::from_endpoint(address, endpoint))
    }

    /// Build from a caller-configured endpoint, for TLS or custom
    /// backoff settings.
    pub fn from_endpoint(address: impl Into<String>, endpoint: Endpoint) -> Self {
        let channel = endpoint.connect_lazy();
        Self {
            address: address.into(),
            client: RunnerProtocolClient::new(channel),
            sessions: SessionGuard::new(),
            stats: Arc::new(NoopStats),
        }
    }

    /// Route runner-reported latency figures to `stats`.
    pub fn with_stats(mut self, stats: Arc<dyn StatsObserver>) -> Self {
        self.stats = stats;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Attempt to place and run `call` on this runner.
    ///
    /// See [`Placement`] for the retry contract. The call is borrowed
    /// for the duration of the exchange; its body is consumed in a
    /// single pass.
    pub async fn try_exec(&self, ctx: &RequestContext, call: Arc<dyn RunnerCall>) -> Placement {
        tracing::debug!(runner_addr = %self.address, "attempting to place call");
        let Some(_session) = self.sessions.try_acquire() else {
            // Deliberate "do not retry here" signal: nothing was sent,
            // but the scheduler must pick a different connection, not
            // re-run the busy-retry path against this one.
            return Placement::Committed(Err(Error::RunnerClosed));
        };

        let model_json = match serde_json::to_string(call.model()) {
            Ok(json) => json,
            Err(err) => {
                // No runner will ever be able to run an unencodable
                // call. Give up.
                tracing::error!(
                    runner_addr = %self.address,
                    error = %err,
                    "failed to encode call model"
                );
                return Placement::Committed(Err(Error::InvalidModel {
                    reason: err.to_string(),
                }));
            }
        };

        let (tx, outbound) = mpsc::channel(OUTBOUND_BUFFER);
        let mut request = Request::new(ReceiverStream::new(outbound));
        attach_request_id(&mut request, ctx);

        let inbound = match self.client.clone().engage(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => {
                // Nothing was sent; the scheduler may try another
                // runner.
                tracing::info!(
                    runner_addr = %self.address,
                    error = %status,
                    "unable to engage runner"
                );
                return Placement::NotPlaced(status.into());
            }
        };

        let place = proto::ClientMsg {
            body: Some(proto::client_msg::Body::Place(proto::PlaceCall {
                model_json,
                slot_hash_id: hex::encode(call.slot_hash_id()),
                extensions: call.extensions().clone(),
            })),
        };

        run_exchange(
            ctx,
            call,
            place,
            tx,
            inbound,
            self.address.clone(),
            Arc::clone(&self.stats),
        )
        .await
    }

    /// Query the runner's point-in-time status snapshot.
    pub async fn status(&self, ctx: &RequestContext) -> Result<RunnerStatus> {
        let Some(_session) = self.sessions.try_acquire() else {
            return Err(Error::RunnerClosed);
        };

        let mut request = Request::new(proto::StatusRequest {});
        attach_request_id(&mut request, ctx);

        match self.client.clone().status(request).await {
            Ok(response) => {
                let snapshot = translate_snapshot(&response.into_inner());
                tracing::debug!(runner_addr = %self.address, snapshot = ?snapshot, "status call");
                Ok(snapshot)
            }
            Err(status) => {
                tracing::debug!(runner_addr = %self.address, error = %status, "status call failed");
                Err(status.into())
            }
        }
    }

    /// Refuse new exchanges, then wait for in-flight ones to drain.
    pub async fn close(&self) -> Result<()> {
        self.sessions.close().await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Runner for GrpcRunner {
    async fn try_exec(&self, ctx: &RequestContext, call: Arc<dyn RunnerCall>) -> Placement {
        GrpcRunner::try_exec(self, ctx, call).await
    }

    async fn status(&self, ctx: &RequestContext) -> Result<RunnerStatus> {
        GrpcRunner::status(self, ctx).await
    }

    fn address(&self) -> &str {
        GrpcRunner::address(self)
    }

    async fn close(&self) -> Result<()> {
        GrpcRunner::close(self).await
    }
}

/// Propagate the caller's request id as transport metadata when
/// present.
fn attach_request_id<T>(request: &mut Request<T>, ctx: &RequestContext) {
    if let Some(request_id) = ctx.request_id() {
        if let Ok(value) = MetadataValue::try_from(request_id) {
            request.metadata_mut().insert(REQUEST_ID_METADATA_KEY, value);
        }
    }
}
