//! Capability surface of the call being dispatched.
//!
//! The caller owns the call for its whole lifetime; the client only
//! borrows it for the duration of one exchange. The two concurrent
//! exchange tasks touch disjoint parts of it: the outbound streamer
//! reads the request body, the inbound receiver writes the response
//! sink and the execution-time accumulator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;

/// Serializable invocation descriptor sent to the runner as the
/// placement request payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallModel {
    pub id: String,
    pub app_id: String,
    pub fn_id: String,
    pub image: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    pub timeout_secs: u32,
    pub idle_timeout_secs: u32,
    pub memory_mb: u64,
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub config: HashMap<String, String>,
}

/// A fresh, single-pass view of a request body.
pub type BoxBody = Box<dyn AsyncRead + Send + Unpin>;

/// Sink the runner's HTTP-style response is written into as it
/// arrives.
///
/// Headers may be set until the status code is committed; the client
/// commits the status code at most once per exchange.
#[async_trait::async_trait]
pub trait ResponseSink: Send + Sync {
    fn set_header(&self, name: &str, value: &str);

    fn set_status(&self, code: u16);

    /// Write one chunk of response body. Returning fewer bytes than
    /// supplied latches the exchange into partial-write failure.
    async fn write_body(&self, data: &[u8]) -> io::Result<usize>;
}

/// One unit of work to dispatch to a runner.
pub trait RunnerCall: Send + Sync {
    /// Invocation descriptor, encoded into the placement request.
    fn model(&self) -> &CallModel;

    /// Stable hash identifying the execution slot class.
    fn slot_hash_id(&self) -> &[u8];

    /// Protocol extension flags forwarded verbatim to the runner.
    fn extensions(&self) -> &HashMap<String, String>;

    /// A fresh readable view of the request body.
    ///
    /// Called once per placement attempt; the streamer consumes it in
    /// a single pass. Callers that want true retries must hand out a
    /// new view each time.
    fn request_body(&self) -> BoxBody;

    fn response_sink(&self) -> Arc<dyn ResponseSink>;

    /// Accumulate runner-reported execution time onto the call.
    /// Written at most once per exchange.
    fn add_user_execution_time(&self, elapsed: Duration);
}
