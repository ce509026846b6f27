// SPDX-License-Identifier: MPL-2.0
//! Dismissal-timer scheduling and pause arithmetic.

use super::message::Message;
use crate::runtime::{Clock, Scheduler, TimerCallback};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Starts, pauses, and cancels per-message dismissal timers.
///
/// All timing goes through the injected [`Clock`] and [`Scheduler`], so
/// timer behavior is fully deterministic under a test clock.
pub struct TimerCoordinator {
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
}

impl TimerCoordinator {
    pub fn new(clock: Arc<dyn Clock>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { clock, scheduler }
    }

    /// Starts (or restarts) the dismissal timer for `message`.
    ///
    /// No-op for sticky messages. `on_expire` runs once the remaining
    /// timeout elapses, unless the timer is cancelled or the message is
    /// removed first. A timeout that is already due fires on the
    /// scheduler as soon as possible, never inline.
    pub fn start<F>(&self, message: &Arc<Message>, on_expire: F)
    where
        F: FnOnce(&Arc<Message>) + Send + 'static,
    {
        if message.is_sticky() {
            return;
        }

        let (epoch, delay_ms) = {
            let mut state = message.timer_state();
            // A restart invalidates whatever was scheduled before.
            if let Some(handle) = state.handle.take() {
                self.scheduler.cancel(&handle);
            }
            state.epoch += 1;
            state.started_at = Some(self.clock.now());
            (state.epoch, state.timeout_ms.max(0) as u64)
        };

        let weak = Arc::downgrade(message);
        let callback: TimerCallback = Box::new(move || Self::fire(&weak, epoch, on_expire));
        let handle = self
            .scheduler
            .schedule(Duration::from_millis(delay_ms), callback);

        let mut state = message.timer_state();
        if state.epoch == epoch && !state.remove_me {
            state.handle = Some(handle);
        } else {
            // The timer was cancelled, restarted, or the message removed
            // while we were scheduling.
            self.scheduler.cancel(&handle);
        }
    }

    /// Pauses the countdown, storing the remaining time.
    ///
    /// No-op for sticky messages. The stored remainder may be zero or
    /// negative when pause lands after the deadline already passed; a
    /// subsequent [`start`](Self::start) treats that as immediately due.
    /// Does not remove the message or restart anything.
    pub fn pause(&self, message: &Arc<Message>) {
        if message.is_sticky() {
            return;
        }

        let mut state = message.timer_state();
        state.epoch += 1;
        if let Some(handle) = state.handle.take() {
            self.scheduler.cancel(&handle);
        }
        // Taking started_at makes a second pause a no-op instead of
        // subtracting the elapsed time twice.
        if let Some(started_at) = state.started_at.take() {
            let elapsed = self.clock.now().saturating_duration_since(started_at);
            state.timeout_ms -= elapsed.as_millis() as i64;
        }
    }

    /// Cancels any scheduled timer without touching the remaining time.
    /// Safe on messages whose timer already fired or was never started.
    pub fn cancel(&self, message: &Arc<Message>) {
        let mut state = message.timer_state();
        state.epoch += 1;
        if let Some(handle) = state.handle.take() {
            self.scheduler.cancel(&handle);
        }
    }

    fn fire<F>(weak: &Weak<Message>, epoch: u64, on_expire: F)
    where
        F: FnOnce(&Arc<Message>),
    {
        let Some(message) = weak.upgrade() else {
            return;
        };
        {
            let mut state = message.timer_state();
            if state.epoch != epoch || state.remove_me {
                // Dispatched before a cancel or restart landed.
                return;
            }
            state.handle = None;
        }
        on_expire(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::message::{Kind, MessageOptions};
    use crate::test_utils::ManualTime;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn coordinator(time: &ManualTime) -> TimerCoordinator {
        TimerCoordinator::new(Arc::new(time.clone()), Arc::new(time.clone()))
    }

    fn message(timeout_ms: i64, sticky: bool) -> Arc<Message> {
        Arc::new(Message::new(
            MessageOptions::text("test"),
            Kind::Info,
            timeout_ms,
            sticky,
        ))
    }

    fn counting_expire(counter: &Arc<AtomicUsize>) -> impl FnOnce(&Arc<Message>) + Send + 'static {
        let counter = Arc::clone(counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn start_schedules_for_remaining_timeout() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(500, false);
        let fired = Arc::new(AtomicUsize::new(0));

        timers.start(&message, counting_expire(&fired));
        assert!(message.has_active_timer());

        time.advance(Duration::from_millis(499));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        time.advance(Duration::from_millis(1));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!message.has_active_timer());
    }

    #[test]
    fn start_on_sticky_message_is_noop() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(-1, true);
        let fired = Arc::new(AtomicUsize::new(0));

        timers.start(&message, counting_expire(&fired));
        assert!(!message.has_active_timer());
        assert_eq!(time.pending_timers(), 0);
    }

    #[test]
    fn pause_stores_remaining_time() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(1000, false);
        let fired = Arc::new(AtomicUsize::new(0));

        timers.start(&message, counting_expire(&fired));
        time.advance(Duration::from_millis(300));
        timers.pause(&message);

        assert_eq!(message.remaining_timeout_ms(), 700);
        assert!(!message.has_active_timer());
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Resume runs the rest of the countdown.
        timers.start(&message, counting_expire(&fired));
        time.advance(Duration::from_millis(699));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        time.advance(Duration::from_millis(1));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_pause_does_not_subtract_twice() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(1000, false);

        timers.start(&message, |_| {});
        time.advance(Duration::from_millis(250));
        timers.pause(&message);
        time.advance(Duration::from_millis(250));
        timers.pause(&message);

        assert_eq!(message.remaining_timeout_ms(), 750);
    }

    #[test]
    fn remaining_time_can_go_negative_after_late_pause() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(100, false);

        // The expire action leaves the message alone, so the segment's
        // start timestamp is still in place when pause lands late.
        timers.start(&message, |_| {});
        time.advance(Duration::from_millis(150));
        timers.pause(&message);

        assert_eq!(message.remaining_timeout_ms(), -50);
    }

    #[test]
    fn cancel_prevents_expiry_and_is_idempotent() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(100, false);
        let fired = Arc::new(AtomicUsize::new(0));

        timers.start(&message, counting_expire(&fired));
        timers.cancel(&message);
        timers.cancel(&message);
        time.advance(Duration::from_millis(200));

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(time.pending_timers(), 0);
    }

    #[test]
    fn restart_supersedes_previous_timer() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(100, false);
        let fired = Arc::new(AtomicUsize::new(0));

        timers.start(&message, counting_expire(&fired));
        timers.start(&message, counting_expire(&fired));
        time.advance(Duration::from_millis(200));

        // Only the superseding timer fires.
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_timeout_fires_on_scheduler_not_inline() {
        let time = ManualTime::new();
        let timers = coordinator(&time);
        let message = message(0, false);
        let fired = Arc::new(AtomicUsize::new(0));

        timers.start(&message, counting_expire(&fired));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        time.advance(Duration::ZERO);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
