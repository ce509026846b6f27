// SPDX-License-Identifier: MPL-2.0
//! The public notification service.
//!
//! `Notifier` ties the pieces together: it resolves per-call options
//! against the configured defaults, admits messages to the store, and
//! drives their dismissal timers. The whole surface is no-throw by
//! design: lookup misses, double removals, and stale cancellations all
//! degrade to silent no-ops.

use super::message::{Kind, Message, MessageOptions};
use super::store::MessageStore;
use super::timer::TimerCoordinator;
use crate::config::DefaultSettings;
use crate::runtime::{Clock, Scheduler};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Entry point for creating, removing, and pausing notifications.
///
/// Cheap to clone; clones share the same store and timers.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    store: Mutex<MessageStore>,
    defaults: Box<dyn DefaultSettings>,
    timers: TimerCoordinator,
}

impl Notifier {
    /// Builds a notifier over the given defaults and timing capabilities.
    pub fn new(
        defaults: impl DefaultSettings + 'static,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                store: Mutex::new(MessageStore::new()),
                defaults: Box::new(defaults),
                timers: TimerCoordinator::new(clock, scheduler),
            }),
        }
    }

    /// Creates a message from `options`, admits it to the store, and
    /// starts its dismissal timer unless it resolved sticky.
    ///
    /// `timeout_ms` and `sticky` fall back to the kind-scoped defaults;
    /// a negative resolved timeout forces the message sticky. Missing
    /// display text is tolerated (an empty message is created) but
    /// logged as a validation warning.
    ///
    /// Returns the created entity so the caller can remove or pause it
    /// later by identity.
    pub fn add_message(&self, options: MessageOptions) -> Arc<Message> {
        let kind = options.kind.clone().unwrap_or_default();
        let timeout_ms = options
            .timeout_ms
            .unwrap_or_else(|| self.inner.defaults.timeout_ms(&kind));
        let mut sticky = options
            .sticky
            .unwrap_or_else(|| self.inner.defaults.sticky(&kind));
        // Negative timeout is shorthand for "never auto-dismiss".
        if timeout_ms < 0 {
            sticky = true;
        }

        if options.text.as_deref().map_or(true, str::is_empty) {
            log::warn!("notification of kind '{kind}' created without message text");
        }

        let message = Arc::new(Message::new(options, kind, timeout_ms, sticky));
        log::debug!(
            "notification added: kind='{}' id={:?} timeout_ms={} sticky={}",
            message.kind(),
            message.id(),
            timeout_ms,
            message.is_sticky(),
        );

        self.inner.store_lock().push(Arc::clone(&message));
        if !message.is_sticky() {
            self.start_timer(&message);
        }
        message
    }

    /// Shorthand for an error-kind message.
    pub fn error(&self, text: impl Into<String>, options: MessageOptions) {
        self.add_kinded(Kind::Error, text, options);
    }

    /// Shorthand for an info-kind message.
    pub fn info(&self, text: impl Into<String>, options: MessageOptions) {
        self.add_kinded(Kind::Info, text, options);
    }

    /// Shorthand for a success-kind message.
    pub fn success(&self, text: impl Into<String>, options: MessageOptions) {
        self.add_kinded(Kind::Success, text, options);
    }

    /// Marks `message` removed, cancels its timer, and evicts it from
    /// the store. Safe to call repeatedly, and on a message that is no
    /// longer (or was never) in the store.
    pub fn remove_message(&self, message: &Arc<Message>) {
        self.inner.remove_message(message);
    }

    /// Evicts `message` from the store by identity, without touching its
    /// timer. First pointer-equal entry only.
    pub fn remove_message_from_list(&self, message: &Arc<Message>) {
        self.inner.store_lock().remove_entity(message);
    }

    /// Removes the first message whose id matches, in insertion order.
    /// Silent no-op when no message carries that id.
    pub fn remove_message_by_id(&self, id: &str) {
        let found = self.inner.store_lock().find_by_id(id);
        if let Some(message) = found {
            self.remove_message(&message);
        }
    }

    /// Removes every active message whose id is not in `except_ids`.
    /// An empty list removes everything; messages without an id are
    /// never exempt.
    pub fn remove_all(&self, except_ids: &[&str]) {
        let snapshot = self.inner.store_lock().snapshot();
        for message in snapshot {
            let exempt = message.id().is_some_and(|id| except_ids.contains(&id));
            if !exempt {
                self.remove_message(&message);
            }
        }
    }

    /// Stops the dismissal countdown and stores the remaining time on
    /// the message. No-op for sticky messages.
    pub fn pause_message_timeout(&self, message: &Arc<Message>) {
        self.inner.timers.pause(message);
    }

    /// Restarts the countdown from the remaining time recorded by the
    /// last pause. A remainder of zero or less fires as soon as the
    /// scheduler runs.
    pub fn resume_message_timeout(&self, message: &Arc<Message>) {
        self.start_timer(message);
    }

    /// Snapshot of the active messages in display order.
    #[must_use]
    pub fn messages(&self) -> Vec<Arc<Message>> {
        self.inner.store_lock().snapshot()
    }

    #[must_use]
    pub fn contains(&self, message: &Arc<Message>) -> bool {
        self.inner.store_lock().contains(message)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.store_lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.store_lock().is_empty()
    }

    fn add_kinded(&self, kind: Kind, text: impl Into<String>, mut options: MessageOptions) {
        options.kind = Some(kind);
        options.text = Some(text.into());
        self.add_message(options);
    }

    fn start_timer(&self, message: &Arc<Message>) {
        let weak = Arc::downgrade(&self.inner);
        self.inner.timers.start(message, move |message| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.remove_message(message);
            log::debug!(
                "notification timed out: kind='{}' id={:?}",
                message.kind(),
                message.id(),
            );
            (message.on_close_timeout())(message);
        });
    }
}

impl NotifierInner {
    fn store_lock(&self) -> MutexGuard<'_, MessageStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_message(&self, message: &Arc<Message>) {
        // Mark first so a dismissal callback dispatched concurrently
        // sees the removal and bails out.
        message.mark_removed();
        self.timers.cancel(message);
        self.store_lock().remove_entity(message);
    }
}
