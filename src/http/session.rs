//! Single-flight session refresh.
//!
//! When a request comes back 401, exactly one caller becomes the refresh
//! *leader* and issues `POST /auth/refresh`. Every other caller that hits a
//! 401 while that refresh is in flight becomes a *waiter*: it is parked in a
//! FIFO queue and woken with the leader's outcome.
//!
//! The coordinator holds two pieces of state:
//!
//! - `refreshing`: set while a refresh call is outstanding.
//! - `waiters`: completion handles of parked requests, in arrival order.
//!
//! Either `refreshing` is clear and `waiters` is empty, or `refreshing` is set
//! and `waiters` holds zero or more handles. Both are only touched inside
//! short non-async critical sections, so the check-and-set is atomic on any
//! executor.

use crate::error::HttpError;
use async_trait::async_trait;
use futures::channel::oneshot;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Opaque "the session credential is valid again" signal.
///
/// The real credential is the cookie the backend set on the refresh response;
/// this marker carries no token and cannot be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialMarker {
    _private: (),
}

impl CredentialMarker {
    pub(crate) fn issued() -> Self {
        Self { _private: () }
    }
}

/// Callbacks supplied by the owner of the session state.
///
/// Injected once at construction; the session client never mutates user
/// identity itself, it only reports these two events upward.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SessionHooks: Send + Sync {
    /// A refresh succeeded; queued requests are about to be replayed.
    async fn on_credential_refreshed(&self, _marker: CredentialMarker) {}

    /// A refresh failed; the session must be torn down.
    async fn on_session_expired(&self) {}
}

/// Hooks that ignore both events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl SessionHooks for NoopHooks {}

/// Outcome delivered to every waiter.
pub(crate) type RefreshOutcome = Result<(), Arc<HttpError>>;

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Owns the refresh-in-progress flag and the pending request queue.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// What a caller holding a first-time 401 must do next.
pub(crate) enum Ticket<'a> {
    /// Issue the refresh call, then settle the lease.
    Lead(RefreshLease<'a>),
    /// Wait for the leader's outcome.
    Wait(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh call is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of requests parked behind the in-flight refresh.
    pub fn pending(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Become the leader if no refresh is running, otherwise join the queue.
    pub(crate) fn acquire(&self) -> Ticket<'_> {
        let mut state = self.state.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            tracing::debug!(position = state.waiters.len(), "queued behind session refresh");
            Ticket::Wait(rx)
        } else {
            state.refreshing = true;
            Ticket::Lead(RefreshLease {
                coordinator: self,
                settled: false,
            })
        }
    }

    /// Clear the flag and hand back the queue, atomically.
    fn release(&self) -> VecDeque<oneshot::Sender<RefreshOutcome>> {
        let mut state = self.state.lock();
        state.refreshing = false;
        std::mem::take(&mut state.waiters)
    }
}

/// Proof of refresh leadership.
///
/// Settling wakes every waiter in FIFO order and clears the flag. If the
/// leader is dropped without settling (panic, cancelled future) the drop
/// still clears the flag and fails the waiters with
/// [`HttpError::RefreshAbandoned`].
pub(crate) struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    pub(crate) fn settle(mut self, outcome: RefreshOutcome) {
        self.settled = true;
        wake_all(self.coordinator.release(), outcome);
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("session refresh abandoned before settling");
            wake_all(
                self.coordinator.release(),
                Err(Arc::new(HttpError::RefreshAbandoned)),
            );
        }
    }
}

fn wake_all(waiters: VecDeque<oneshot::Sender<RefreshOutcome>>, outcome: RefreshOutcome) {
    for waiter in waiters {
        // A waiter whose future was dropped has nothing left to wake.
        let _ = waiter.send(outcome.clone());
    }
}
