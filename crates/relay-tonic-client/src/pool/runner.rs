//! Pool-facing runner surface.

use crate::pool::{RequestContext, RunnerCall, RunnerStatus};
use relay_tonic_core::Error;
use std::sync::Arc;

/// Outcome of one placement attempt.
///
/// This is the authoritative retry signal for the scheduler: only
/// [`NotPlaced`](Placement::NotPlaced) guarantees that no partial side
/// effect can have occurred on the runner, so only it permits retrying
/// the identical call elsewhere. The carried error is for diagnostics
/// and logging; callers must not pattern-match it to decide retry
/// eligibility.
#[derive(Debug)]
pub enum Placement {
    /// The call reached the runner, or cannot be proven not to have.
    /// `Ok(())` is full success.
    Committed(Result<(), Error>),
    /// Nothing reached the runner; safe to retry the identical call on
    /// a different one.
    NotPlaced(Error),
}

impl Placement {
    /// True unless the identical call may be retried elsewhere.
    pub fn committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Committed(Ok(())) => None,
            Self::Committed(Err(err)) | Self::NotPlaced(err) => Some(err),
        }
    }

    /// The original `(committed, error)` pair.
    pub fn into_parts(self) -> (bool, Option<Error>) {
        match self {
            Self::Committed(Ok(())) => (true, None),
            Self::Committed(Err(err)) => (true, Some(err)),
            Self::NotPlaced(err) => (false, Some(err)),
        }
    }
}

/// One remote execution worker as seen by the pool.
#[async_trait::async_trait]
pub trait Runner: Send + Sync {
    /// Attempt to place and run `call` on this runner.
    async fn try_exec(&self, ctx: &RequestContext, call: Arc<dyn RunnerCall>) -> Placement;

    /// Point-in-time health snapshot.
    async fn status(&self, ctx: &RequestContext) -> Result<RunnerStatus, Error>;

    fn address(&self) -> &str;

    /// Refuse new exchanges and wait for in-flight ones to drain.
    async fn close(&self) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_exposes_the_committed_pair() {
        let success = Placement::Committed(Ok(()));
        assert!(success.committed());
        assert!(success.error().is_none());

        let busy = Placement::NotPlaced(Error::ServerBusy);
        assert!(!busy.committed());
        assert!(matches!(busy.error(), Some(Error::ServerBusy)));

        let (committed, err) = Placement::Committed(Err(Error::Cancelled)).into_parts();
        assert!(committed);
        assert!(matches!(err, Some(Error::Cancelled)));
    }
}
