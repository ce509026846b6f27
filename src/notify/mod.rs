// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle core.
//!
//! This module implements the toast lifecycle without any rendering:
//! messages are created from per-call options merged with configured
//! defaults, live in an insertion-ordered store, and are auto-dismissed
//! by cancellable timers that support pause/resume.
//!
//! # Components
//!
//! - [`Message`] / [`MessageOptions`] - the message entity and per-call options
//! - [`MessageStore`] - insertion-ordered collection of active messages
//! - [`TimerCoordinator`] - start/pause/cancel of dismissal timers
//! - [`Notifier`] - the public API surface
//!
//! # Usage
//!
//! ```ignore
//! use crouton::config::Config;
//! use crouton::notify::{MessageOptions, Notifier};
//! use crouton::runtime::{SystemClock, TokioScheduler};
//! use std::sync::Arc;
//!
//! let notifier = Notifier::new(
//!     Config::default(),
//!     Arc::new(SystemClock),
//!     Arc::new(TokioScheduler::current()),
//! );
//!
//! // Auto-dismisses after the configured info timeout.
//! notifier.info("Image saved", MessageOptions::default());
//!
//! // Stays until removed explicitly.
//! let pinned = notifier.add_message(
//!     MessageOptions::text("Update available").with_timeout_ms(-1),
//! );
//! notifier.remove_message(&pinned);
//! ```

mod message;
mod service;
mod store;
mod timer;

pub use message::{noop_callback, Callback, Kind, Message, MessageOptions};
pub use service::Notifier;
pub use store::MessageStore;
pub use timer::TimerCoordinator;
