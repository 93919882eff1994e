//! Request lifecycle manager.
//!
//! A [`RequestLifecycle`] owns at most one in-flight fetch. Each call to
//! [`start`](RequestLifecycle::start) supersedes the previous one: the old
//! task is aborted and, should it still complete, its outcome is discarded.
//! Observers see the state through a `tokio::sync::watch` channel.
//!
//! # Guarantees
//!
//! - After [`cancel`](RequestLifecycle::cancel) (or drop) no transition is
//!   ever published for the cancelled fetch.
//! - For a single `start`, the observed state goes `Loading` and then
//!   exactly one of `Loaded` or `Failed`.
//! - Across overlapping `start`s only the latest outcome is observable.
//!
//! The generation check and the state write happen under the same
//! `std::sync::Mutex`, which is never held across an await.

use catalog_core::reducer::Reducer;
use catalog_core::{ErrorInfo, RequestAction, RequestReducer, RequestState};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Governs a single asynchronous fetch from start to completion or
/// cancellation.
///
/// # Type Parameters
///
/// - `K`: Key identifying what is being fetched (a product id, or `()`)
/// - `T`: Data produced by a successful fetch
///
/// # Example
///
/// ```
/// use catalog_core::CatalogError;
/// use catalog_runtime::RequestLifecycle;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let lifecycle: RequestLifecycle<u32, String> = RequestLifecycle::new();
/// let mut updates = lifecycle.subscribe();
///
/// lifecycle.start(7, || async { Ok::<_, CatalogError>("seven".to_string()) });
/// assert!(lifecycle.state().is_loading());
///
/// while updates.borrow_and_update().is_loading() {
///     updates.changed().await.ok();
/// }
/// assert_eq!(lifecycle.state().data().map(String::as_str), Some("seven"));
/// # }
/// ```
pub struct RequestLifecycle<K, T> {
    inner: Arc<Inner<K, T>>,
}

struct Inner<K, T> {
    slot: Mutex<Slot<K>>,
    updates: watch::Sender<RequestState<T>>,
    reducer: RequestReducer<T>,
}

/// Bookkeeping for the live request
struct Slot<K> {
    generation: u64,
    key: Option<K>,
    task: Option<JoinHandle<()>>,
}

impl<K> Slot<K> {
    /// Invalidate whatever is in flight.
    fn supersede(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.key = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<K, T> Inner<K, T> {
    fn lock(&self) -> MutexGuard<'_, Slot<K>> {
        // A panic while holding the lock cannot leave the slot half-written.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, action: RequestAction<T>) {
        self.updates
            .send_modify(|state| self.reducer.reduce(state, action, &()));
    }
}

impl<K, T> RequestLifecycle<K, T>
where
    K: Clone + Send + 'static,
    T: Send + Sync + 'static,
{
    /// Create an idle lifecycle
    #[must_use]
    pub fn new() -> Self {
        let (updates, _) = watch::channel(RequestState::Idle);

        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot {
                    generation: 0,
                    key: None,
                    task: None,
                }),
                updates,
                reducer: RequestReducer::new(),
            }),
        }
    }

    /// Begin fetching `key`, superseding any request in flight.
    ///
    /// `fetch` is invoked immediately, before the previous request is
    /// superseded, and may read this lifecycle. The state then moves to
    /// `Loading` before this returns, and the future runs on a Tokio task.
    /// Its outcome is published only if no later `start` or `cancel`
    /// happened. Starting the same key again restarts the fetch. If `fetch`
    /// panics, nothing changes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start<F, Fut, E>(&self, key: K, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<ErrorInfo> + Send + 'static,
    {
        // Caller code runs before the slot is locked.
        let future = fetch();

        let mut slot = self.inner.lock();
        slot.supersede();
        slot.key = Some(key);
        let generation = slot.generation;

        self.inner.apply(RequestAction::Started);

        let inner = Arc::downgrade(&self.inner);
        slot.task = Some(tokio::spawn(async move {
            let outcome = future.await;
            Self::settle(&inner, generation, outcome);
        }));
    }

    fn settle<E: Into<ErrorInfo>>(
        inner: &Weak<Inner<K, T>>,
        generation: u64,
        outcome: Result<T, E>,
    ) {
        let Some(inner) = inner.upgrade() else {
            return;
        };

        let mut slot = inner.lock();
        if slot.generation != generation {
            return;
        }
        // Dropping our own handle detaches it; the task is finishing anyway.
        slot.task = None;

        let action = match outcome {
            Ok(data) => RequestAction::Succeeded(data),
            Err(error) => RequestAction::Failed(error.into()),
        };
        inner.apply(action);
    }

    /// Fail synchronously without running a fetch.
    ///
    /// Used when input is rejected before any request could be made. Any
    /// request in flight is superseded.
    pub fn reject(&self, error: impl Into<ErrorInfo>) {
        let mut slot = self.inner.lock();
        slot.supersede();

        self.inner.apply(RequestAction::Started);
        self.inner.apply(RequestAction::Failed(error.into()));
    }

    /// Mark the in-flight request as superseded.
    ///
    /// The state is left as it is; no further transition is published for
    /// the cancelled fetch.
    pub fn cancel(&self) {
        self.inner.lock().supersede();
    }

    /// Release the lifecycle. Equivalent to [`cancel`](Self::cancel).
    pub fn dispose(&self) {
        self.cancel();
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> RequestState<T>
    where
        T: Clone,
    {
        self.inner.updates.borrow().clone()
    }

    /// Receiver notified on every published transition
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.inner.updates.subscribe()
    }

    /// Key of the request in flight, if any
    #[must_use]
    pub fn key(&self) -> Option<K> {
        let slot = self.inner.lock();
        if slot.task.is_some() {
            slot.key.clone()
        } else {
            None
        }
    }

    /// Whether a fetch is currently running and will publish its outcome
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.inner.lock().task.is_some()
    }
}

impl<K, T> Default for RequestLifecycle<K, T>
where
    K: Clone + Send + 'static,
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Drop for RequestLifecycle<K, T> {
    fn drop(&mut self) {
        self.inner.lock().supersede();
    }
}

impl<K, T> std::fmt::Debug for RequestLifecycle<K, T>
where
    K: std::fmt::Debug,
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.inner.lock();
        f.debug_struct("RequestLifecycle")
            .field("generation", &slot.generation)
            .field("key", &slot.key)
            .field("in_flight", &slot.task.is_some())
            .field("state", &*self.inner.updates.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use catalog_core::{CatalogError, ErrorKind};
    use tokio::sync::oneshot;

    async fn settled<T: Clone>(updates: &mut watch::Receiver<RequestState<T>>) -> RequestState<T> {
        loop {
            let state = updates.borrow_and_update().clone();
            if state.is_settled() {
                return state;
            }
            updates.changed().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let lifecycle: RequestLifecycle<(), u32> = RequestLifecycle::new();
        assert_eq!(lifecycle.state(), RequestState::Idle);
        assert!(!lifecycle.is_in_flight());
        assert_eq!(lifecycle.key(), None);
    }

    #[tokio::test]
    async fn test_success_publishes_loaded() {
        let lifecycle: RequestLifecycle<u32, u32> = RequestLifecycle::new();
        let mut updates = lifecycle.subscribe();

        lifecycle.start(1, || async { Ok::<_, CatalogError>(42) });
        assert!(lifecycle.state().is_loading());

        assert_eq!(settled(&mut updates).await, RequestState::Loaded(42));
        assert!(!lifecycle.is_in_flight());
    }

    #[tokio::test]
    async fn test_failure_publishes_normalized_error() {
        let lifecycle: RequestLifecycle<u32, u32> = RequestLifecycle::new();
        let mut updates = lifecycle.subscribe();

        lifecycle.start(1, || async {
            Err::<u32, _>(CatalogError::Network("connection reset".to_string()))
        });

        let state = settled(&mut updates).await;
        assert_eq!(state.error().map(|e| e.kind), Some(ErrorKind::Network));
        assert_eq!(state.data(), None);
    }

    #[tokio::test]
    async fn test_key_tracks_live_request() {
        let lifecycle: RequestLifecycle<u32, u32> = RequestLifecycle::new();
        let (_tx, rx) = oneshot::channel::<u32>();

        lifecycle.start(9, move || async move {
            rx.await
                .map_err(|_| CatalogError::Network("closed".to_string()))
        });
        assert_eq!(lifecycle.key(), Some(9));

        lifecycle.cancel();
        assert_eq!(lifecycle.key(), None);
    }

    #[tokio::test]
    async fn test_reject_fails_synchronously() {
        let lifecycle: RequestLifecycle<u32, u32> = RequestLifecycle::new();

        lifecycle.reject(CatalogError::Validation("bad id".to_string()));

        let state = lifecycle.state();
        assert_eq!(state.error().map(|e| e.kind), Some(ErrorKind::Validation));
        assert!(!lifecycle.is_in_flight());
    }
}
