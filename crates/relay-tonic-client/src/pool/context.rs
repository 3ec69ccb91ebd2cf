//! Request-scoped context handed into every placement attempt.

use tokio_util::sync::CancellationToken;

/// Caller-side context for one call: cancellation plus an optional
/// request id propagated to the runner as gRPC metadata.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
    request_id: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a request id. Empty ids are treated as absent.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        self.request_id = (!request_id.is_empty()).then_some(request_id);
        self
    }

    /// Tie this context to a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Resolves once the caller gave up on the call.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}
