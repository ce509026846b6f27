// SPDX-License-Identifier: MPL-2.0
//! Core notification message entity.
//!
//! A [`Message`] is shared as `Arc<Message>`; pointer identity is entity
//! identity, which is what identity-based removal operates on. The
//! caller-supplied `id` is display metadata and is allowed to repeat.

use crate::runtime::TimerHandle;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Notification kind; selects which defaults apply.
///
/// Open-ended: kinds outside the well-known set are carried verbatim as
/// [`Kind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Info,
    Success,
    Error,
    Other(String),
}

impl Kind {
    /// Configuration key for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Info => "info",
            Kind::Success => "success",
            Kind::Error => "error",
            Kind::Other(name) => name,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Kind {
    fn from(value: &str) -> Self {
        match value {
            "info" => Kind::Info,
            "success" => Kind::Success,
            "error" => Kind::Error,
            other => Kind::Other(other.to_string()),
        }
    }
}

/// Caller-supplied reaction to a message event.
pub type Callback = Arc<dyn Fn(&Message) + Send + Sync>;

/// Shared no-op used when a caller supplies no callback.
#[must_use]
pub fn noop_callback() -> Callback {
    Arc::new(|_| {})
}

/// Per-call options for [`Notifier::add_message`].
///
/// Unset `timeout_ms` and `sticky` fall back to the kind-scoped defaults
/// of the configuration collaborator; everything else defaults
/// structurally (empty payloads, `false`, no-op callbacks).
///
/// [`Notifier::add_message`]: super::Notifier::add_message
#[derive(Clone, Default)]
pub struct MessageOptions {
    pub id: Option<String>,
    pub kind: Option<Kind>,
    pub text: Option<String>,
    pub html_content: Option<String>,
    pub icon: Option<String>,
    pub timeout_ms: Option<i64>,
    pub sticky: Option<bool>,
    pub close_on_click: Option<bool>,
    pub on_click: Option<Callback>,
    pub on_close: Option<Callback>,
    pub on_close_timeout: Option<Callback>,
}

impl MessageOptions {
    /// Options with only the display text set.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    #[must_use]
    pub fn with_sticky(mut self, sticky: bool) -> Self {
        self.sticky = Some(sticky);
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_html_content(mut self, html: impl Into<String>) -> Self {
        self.html_content = Some(html.into());
        self
    }

    #[must_use]
    pub fn with_close_on_click(mut self, close_on_click: bool) -> Self {
        self.close_on_click = Some(close_on_click);
        self
    }

    #[must_use]
    pub fn with_on_click(mut self, callback: Callback) -> Self {
        self.on_click = Some(callback);
        self
    }

    #[must_use]
    pub fn with_on_close(mut self, callback: Callback) -> Self {
        self.on_close = Some(callback);
        self
    }

    #[must_use]
    pub fn with_on_close_timeout(mut self, callback: Callback) -> Self {
        self.on_close_timeout = Some(callback);
        self
    }
}

impl fmt::Debug for MessageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageOptions")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("text", &self.text)
            .field("timeout_ms", &self.timeout_ms)
            .field("sticky", &self.sticky)
            .field("close_on_click", &self.close_on_click)
            .finish_non_exhaustive()
    }
}

/// Mutable timer bookkeeping, guarded per message.
///
/// Invariants: a sticky message never holds a handle; at most one handle
/// is live at a time; `timeout_ms` is the time remaining since the
/// current segment started, not since creation.
#[derive(Debug, Default)]
pub(crate) struct TimerState {
    /// Remaining milliseconds until auto-dismissal. May go to zero or
    /// below after a late pause.
    pub(crate) timeout_ms: i64,
    /// Start of the current timer segment.
    pub(crate) started_at: Option<Instant>,
    /// Handle of the scheduled dismissal callback, if any.
    pub(crate) handle: Option<TimerHandle>,
    /// Bumped on every (re)start and cancel; a dispatched callback
    /// carrying a stale epoch is ignored.
    pub(crate) epoch: u64,
    /// Set once removal has been requested.
    pub(crate) remove_me: bool,
}

/// A single active notification.
pub struct Message {
    id: Option<String>,
    kind: Kind,
    text: String,
    html_content: Option<String>,
    icon: Option<String>,
    sticky: bool,
    close_on_click: bool,
    on_click: Callback,
    on_close: Callback,
    on_close_timeout: Callback,
    timer: Mutex<TimerState>,
}

impl Message {
    pub(crate) fn new(options: MessageOptions, kind: Kind, timeout_ms: i64, sticky: bool) -> Self {
        Self {
            id: options.id,
            kind,
            text: options.text.unwrap_or_default(),
            html_content: options.html_content,
            icon: options.icon,
            sticky,
            close_on_click: options.close_on_click.unwrap_or(false),
            on_click: options.on_click.unwrap_or_else(noop_callback),
            on_close: options.on_close.unwrap_or_else(noop_callback),
            on_close_timeout: options.on_close_timeout.unwrap_or_else(noop_callback),
            timer: Mutex::new(TimerState {
                timeout_ms,
                ..TimerState::default()
            }),
        }
    }

    /// Caller-supplied identifier, if any. Not guaranteed unique.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn html_content(&self) -> Option<&str> {
        self.html_content.as_deref()
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Whether this message never auto-dismisses. Fixed at creation;
    /// forced `true` when the resolved timeout was negative.
    #[must_use]
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// Pass-through hint for the view layer; the core does not act on it.
    #[must_use]
    pub fn close_on_click(&self) -> bool {
        self.close_on_click
    }

    #[must_use]
    pub fn on_click(&self) -> &(dyn Fn(&Message) + Send + Sync) {
        self.on_click.as_ref()
    }

    #[must_use]
    pub fn on_close(&self) -> &(dyn Fn(&Message) + Send + Sync) {
        self.on_close.as_ref()
    }

    #[must_use]
    pub fn on_close_timeout(&self) -> &(dyn Fn(&Message) + Send + Sync) {
        self.on_close_timeout.as_ref()
    }

    /// Remaining milliseconds as of the last timer (re)start or pause.
    /// Zero or negative means "immediately due" on resume.
    #[must_use]
    pub fn remaining_timeout_ms(&self) -> i64 {
        self.timer_state().timeout_ms
    }

    /// Whether a dismissal callback is currently scheduled.
    #[must_use]
    pub fn has_active_timer(&self) -> bool {
        self.timer_state().handle.is_some()
    }

    /// Whether removal has been requested for this message.
    #[must_use]
    pub fn is_marked_removed(&self) -> bool {
        self.timer_state().remove_me
    }

    pub(crate) fn timer_state(&self) -> MutexGuard<'_, TimerState> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn mark_removed(&self) {
        self.timer_state().remove_me = true;
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("text", &self.text)
            .field("sticky", &self.sticky)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_info() {
        assert_eq!(Kind::default(), Kind::Info);
    }

    #[test]
    fn kind_round_trips_through_str() {
        for name in ["info", "success", "error", "progress"] {
            let kind = Kind::from(name);
            assert_eq!(kind.as_str(), name);
        }
        assert_eq!(Kind::from("progress"), Kind::Other("progress".to_string()));
    }

    #[test]
    fn options_builder_sets_fields() {
        let options = MessageOptions::text("saved")
            .with_id("save-1")
            .with_kind(Kind::Success)
            .with_timeout_ms(250)
            .with_sticky(false)
            .with_close_on_click(true);

        assert_eq!(options.text.as_deref(), Some("saved"));
        assert_eq!(options.id.as_deref(), Some("save-1"));
        assert_eq!(options.kind, Some(Kind::Success));
        assert_eq!(options.timeout_ms, Some(250));
        assert_eq!(options.sticky, Some(false));
        assert_eq!(options.close_on_click, Some(true));
    }

    #[test]
    fn message_defaults_callbacks_to_noop() {
        let message = Message::new(MessageOptions::default(), Kind::Info, 100, false);
        // Must not panic.
        (message.on_click())(&message);
        (message.on_close())(&message);
        (message.on_close_timeout())(&message);
    }

    #[test]
    fn missing_text_produces_empty_payload() {
        let message = Message::new(MessageOptions::default(), Kind::Info, 100, false);
        assert_eq!(message.text(), "");
        assert_eq!(message.id(), None);
    }

    #[test]
    fn new_message_has_no_timer_and_is_not_removed() {
        let message = Message::new(MessageOptions::text("hi"), Kind::Info, 100, false);
        assert!(!message.has_active_timer());
        assert!(!message.is_marked_removed());
        assert_eq!(message.remaining_timeout_ms(), 100);
    }
}
