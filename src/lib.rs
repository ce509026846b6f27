// SPDX-License-Identifier: MPL-2.0
//! `crouton` manages transient user-facing notification messages
//! ("toasts"): creating them with per-message or kind-scoped default
//! options, auto-dismissing them after a timeout, keeping sticky
//! messages until explicitly removed, and pausing/resuming the
//! dismissal countdown (e.g., while the pointer hovers a toast).
//!
//! Rendering is out of scope. The library hands a view collaborator an
//! ordered snapshot of active messages and consumes two capabilities,
//! a [`runtime::Clock`] and a [`runtime::Scheduler`], so hosts control
//! where and when timers actually run.

pub mod config;
pub mod error;
pub mod notify;
pub mod runtime;
pub mod test_utils;
