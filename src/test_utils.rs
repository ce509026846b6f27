// SPDX-License-Identifier: MPL-2.0
//! Deterministic timing fakes for tests.
//!
//! [`ManualTime`] implements both [`Clock`] and [`Scheduler`] over a
//! single timeline that tests advance by hand, so timer behavior can be
//! asserted without sleeping.

use crate::runtime::{Clock, Scheduler, TimerCallback, TimerHandle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A manually driven clock and scheduler sharing one timeline.
///
/// Clones share state, so the same instance can be handed to a
/// `Notifier` as both its clock and its scheduler.
#[derive(Clone)]
pub struct ManualTime {
    inner: Arc<Mutex<ManualTimeInner>>,
}

struct ManualTimeInner {
    now: Instant,
    next_token: u64,
    pending: Vec<PendingTimer>,
}

struct PendingTimer {
    token: u64,
    due: Instant,
    callback: TimerCallback,
}

impl ManualTime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualTimeInner {
                now: Instant::now(),
                next_token: 0,
                pending: Vec::new(),
            })),
        }
    }

    /// Advances the timeline by `delta`, firing every timer that falls
    /// due, in due order (FIFO among equal deadlines).
    ///
    /// Callbacks run outside the internal lock and may schedule or
    /// cancel further timers; a timer scheduled by a callback fires in
    /// the same `advance` call if it falls within the window.
    pub fn advance(&self, delta: Duration) {
        let target = self.lock().now + delta;
        loop {
            let next = {
                let mut inner = self.lock();
                let idx = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.token))
                    .map(|(i, _)| i);
                match idx {
                    Some(i) => {
                        let timer = inner.pending.remove(i);
                        // The clock reads the fire time while the
                        // callback runs.
                        inner.now = inner.now.max(timer.due);
                        Some(timer.callback)
                    }
                    None => {
                        inner.now = target;
                        None
                    }
                }
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
    }

    /// Number of timers currently waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, ManualTimeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualTime {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualTime {
    fn now(&self) -> Instant {
        self.lock().now
    }
}

impl Scheduler for ManualTime {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut inner = self.lock();
        let token = inner.next_token;
        inner.next_token += 1;
        let due = inner.now + delay;
        inner.pending.push(PendingTimer {
            token,
            due,
            callback,
        });
        TimerHandle::from_token(token)
    }

    fn cancel(&self, handle: &TimerHandle) {
        self.lock().pending.retain(|t| t.token != handle.token());
    }
}
