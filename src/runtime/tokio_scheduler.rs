// SPDX-License-Identifier: MPL-2.0
//! Production clock and scheduler adapters.

use super::{Clock, Scheduler, TimerCallback, TimerHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// [`Scheduler`] that runs each callback as a task on a tokio runtime.
///
/// Cancellation aborts the task; an aborted or finished task leaves no
/// trace, so cancelling a consumed handle is a no-op.
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
    next_token: AtomicU64,
    tasks: Arc<Mutex<HashMap<u64, tokio::task::AbortHandle>>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self {
            runtime,
            next_token: AtomicU64::new(0),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Scheduler on the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }

    fn tasks_lock(tasks: &Mutex<HashMap<u64, tokio::task::AbortHandle>>) -> MutexGuard<'_, HashMap<u64, tokio::task::AbortHandle>> {
        tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: std::time::Duration, callback: TimerCallback) -> TimerHandle {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let tasks = Arc::clone(&self.tasks);
        let join = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            Self::tasks_lock(&tasks).remove(&token);
            callback();
        });

        let mut tasks = Self::tasks_lock(&self.tasks);
        tasks.insert(token, join.abort_handle());
        if join.is_finished() {
            // The task ran to completion before we registered it.
            tasks.remove(&token);
        }
        TimerHandle::from_token(token)
    }

    fn cancel(&self, handle: &TimerHandle) {
        if let Some(abort) = Self::tasks_lock(&self.tasks).remove(&handle.token()) {
            abort.abort();
        }
    }
}
