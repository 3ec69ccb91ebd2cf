//! Protocol constants shared by every component that speaks the
//! runner protocol.

/// Maximum payload carried by a single [`DataFrame`] in either
/// direction, in bytes.
///
/// [`DataFrame`]: crate::proto::DataFrame
pub const MAX_DATA_CHUNK: usize = 10 * 1024;

/// Application error code a runner uses to reject a call before doing
/// any work.
///
/// This is the only post-placement failure that is safe to retry on a
/// different runner. Both runner-reported and transport-reported busy
/// signals are compared against this constant.
pub const SERVER_BUSY_CODE: i32 = 503;

/// gRPC metadata key under which the caller's request id travels with
/// `Engage` and `Status` calls.
pub const REQUEST_ID_METADATA_KEY: &str = "relay-request-id";
