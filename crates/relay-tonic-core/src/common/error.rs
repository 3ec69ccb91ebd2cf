//! Error taxonomy for one engagement with a runner.
//!
//! Every failure a dispatch client can observe is collapsed into the
//! central [`Error`] enum. The variants deliberately separate the
//! phases of an exchange, because the upstream scheduler's retry
//! decision depends on exactly how far the protocol got:
//!
//! - `RunnerClosed`, `InvalidModel`, `InvalidAddress`: local
//!   rejections, nothing reached the wire.
//! - `Transport`: a raw gRPC status; retry-safe only in the narrow
//!   cases the orchestrator establishes itself.
//! - `ServerBusy`: the runner refused the call before doing any work.
//! - `Api` / `User`: structured failures reported by the runner, with
//!   user-caused function errors kept distinct from platform faults.
//! - `ShortWrite`, `StreamClosed`, `MissingEof`, `Cancelled`:
//!   exchange-level anomalies on the receive path.

use crate::common::types::SERVER_BUSY_CODE;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for runner exchanges.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// The connection is shutting down and refuses new exchanges.
    #[error("runner is closed")]
    RunnerClosed,

    /// The call's model could not be encoded for transport. No runner
    /// could ever process this call.
    #[error("failed to encode call model: {reason}")]
    InvalidModel { reason: String },

    /// The runner address could not be turned into an endpoint.
    #[error("invalid runner address: {reason}")]
    InvalidAddress { reason: String },

    /// The runner rejected the call before doing any work. Safe to
    /// retry the identical call elsewhere.
    #[error("call timed out, server too busy")]
    ServerBusy,

    /// Structured platform failure reported by the runner.
    #[error("runner error {code}: {message}")]
    Api { code: i32, message: String },

    /// Failure attributed to the invoked function itself rather than
    /// the platform.
    #[error("function error {code}: {message}")]
    User { code: i32, message: String },

    /// The response sink accepted fewer bytes than one inbound frame
    /// carried. The client already saw partial output.
    #[error("short write to client: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// The runner ended the stream before sending a completion
    /// message.
    #[error("runner closed the stream before completion")]
    StreamClosed,

    /// The runner kept talking after completion instead of ending the
    /// stream.
    #[error("runner missing end-of-stream after completion")]
    MissingEof,

    /// The caller's context ended before the exchange completed.
    #[error("exchange cancelled by caller")]
    Cancelled,

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::Status),
}

impl Error {
    /// The structured application error code, when one exists.
    ///
    /// [`ServerBusy`](Error::ServerBusy) resolves to
    /// [`SERVER_BUSY_CODE`] so runner-reported and locally-built busy
    /// errors compare equal.
    pub fn api_code(&self) -> Option<i32> {
        match self {
            Self::ServerBusy => Some(SERVER_BUSY_CODE),
            Self::Api { code, .. } | Self::User { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the failure is attributed to the invoked function.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_code_unifies_busy_variants() {
        assert_eq!(Error::ServerBusy.api_code(), Some(SERVER_BUSY_CODE));
        assert_eq!(
            Error::Api {
                code: SERVER_BUSY_CODE,
                message: "busy".into()
            }
            .api_code(),
            Some(SERVER_BUSY_CODE)
        );
        assert_eq!(Error::RunnerClosed.api_code(), None);
        assert_eq!(
            Error::Transport(tonic::Status::unavailable("gone")).api_code(),
            None
        );
    }

    #[test]
    fn user_errors_are_tagged() {
        let err = Error::User {
            code: 400,
            message: "bad input".into(),
        };
        assert!(err.is_user_error());
        assert!(!Error::ServerBusy.is_user_error());
    }
}
