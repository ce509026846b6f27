// SPDX-License-Identifier: MPL-2.0
//! Clock and scheduler capabilities consumed by the notification core.
//!
//! The lifecycle logic never reads the system clock or spawns tasks
//! directly; it goes through these traits so hosts can supply their own
//! event loop and tests can drive time deterministically.

use std::time::{Duration, Instant};

mod tokio_scheduler;

pub use tokio_scheduler::{SystemClock, TokioScheduler};

/// Deferred callback run by a [`Scheduler`] once its delay elapses.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle to a scheduled callback.
///
/// Minted by a [`Scheduler`]; the token carries no meaning outside the
/// scheduler that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a scheduler-chosen token. Intended for [`Scheduler`]
    /// implementations.
    #[must_use]
    pub fn from_token(token: u64) -> Self {
        Self(token)
    }

    /// Returns the scheduler-chosen token.
    #[must_use]
    pub fn token(&self) -> u64 {
        self.0
    }
}

/// Source of "now" for timer arithmetic.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Deferred-callback facility used to fire dismissal timers.
///
/// `cancel` must be idempotent: cancelling a handle whose callback has
/// already run, or cancelling the same handle twice, is a no-op. A zero
/// delay still defers the callback to the scheduler; it never runs
/// inline inside `schedule`.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
    fn cancel(&self, handle: &TimerHandle);
}
