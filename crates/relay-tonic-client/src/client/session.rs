//! Session accounting for connection shutdown.
//!
//! Each exchange holds a [`Session`] for its lifetime. Closing the
//! guard first flips it closed, so new acquisitions fail fast, then
//! waits until every outstanding session has been dropped.

use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Default)]
struct GuardState {
    closed: bool,
    active: usize,
}

pub(crate) struct SessionGuard {
    state: Mutex<GuardState>,
    drained: Notify,
}

impl SessionGuard {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(GuardState::default()),
            drained: Notify::new(),
        }
    }

    /// Start a new session, unless the guard has been closed.
    pub(crate) fn try_acquire(&self) -> Option<Session<'_>> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.active += 1;
        Some(Session { guard: self })
    }

    /// Refuse new sessions, then wait for active ones to drain.
    pub(crate) async fn close(&self) {
        loop {
            // Register for the drain notification before inspecting the
            // counter, so a concurrent drop cannot slip between the two.
            let drained = self.drained.notified();
            {
                let mut state = self.state.lock();
                state.closed = true;
                if state.active == 0 {
                    return;
                }
            }
            drained.await;
        }
    }
}

pub(crate) struct Session<'a> {
    guard: &'a SessionGuard,
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        let mut state = self.guard.state.lock();
        state.active -= 1;
        if state.closed && state.active == 0 {
            self.guard.drained.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn rejects_new_sessions_after_close() {
        let guard = SessionGuard::new();
        assert!(guard.try_acquire().is_some());

        guard.close().await;
        assert!(guard.try_acquire().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn close_waits_for_active_sessions() {
        let guard = Arc::new(SessionGuard::new());
        let session = guard.try_acquire().expect("fresh guard refused a session");

        let closer = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move { guard.close().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(
            !closer.is_finished(),
            "close returned while a session was active"
        );

        drop(session);
        timeout(Duration::from_secs(1), closer)
            .await
            .expect("close did not finish after drain")
            .expect("close task panicked");
    }

    #[tokio::test]
    async fn concurrent_acquires_are_counted() {
        let guard = SessionGuard::new();
        let first = guard.try_acquire().expect("first session");
        let second = guard.try_acquire().expect("second session");
        drop(first);
        drop(second);
        guard.close().await;
        assert!(guard.try_acquire().is_none());
    }
}
