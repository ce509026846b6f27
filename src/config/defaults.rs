// SPDX-License-Identifier: MPL-2.0
//! Built-in default values for notification settings.
//!
//! This module is the single source of truth for the defaults used when
//! neither the caller nor the configuration file supplies a value.

use crate::notify::Kind;

/// Default auto-dismiss timeout for info messages.
pub const DEFAULT_INFO_TIMEOUT_MS: i64 = 3_000;

/// Default auto-dismiss timeout for success messages.
pub const DEFAULT_SUCCESS_TIMEOUT_MS: i64 = 3_000;

/// Default auto-dismiss timeout for error messages. Longer than the
/// others so errors stay readable.
pub const DEFAULT_ERROR_TIMEOUT_MS: i64 = 5_000;

/// Fallback timeout for kinds without a built-in entry.
pub const DEFAULT_TIMEOUT_MS: i64 = 3_000;

/// Messages auto-dismiss unless configured otherwise.
pub const DEFAULT_STICKY: bool = false;

/// Built-in timeout for `kind`, used when the configuration is silent.
#[must_use]
pub fn builtin_timeout_ms(kind: &Kind) -> i64 {
    match kind {
        Kind::Info => DEFAULT_INFO_TIMEOUT_MS,
        Kind::Success => DEFAULT_SUCCESS_TIMEOUT_MS,
        Kind::Error => DEFAULT_ERROR_TIMEOUT_MS,
        Kind::Other(_) => DEFAULT_TIMEOUT_MS,
    }
}

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Built-in defaults must never force stickiness through the
    // negative-timeout rule.
    assert!(DEFAULT_INFO_TIMEOUT_MS >= 0);
    assert!(DEFAULT_SUCCESS_TIMEOUT_MS >= 0);
    assert!(DEFAULT_ERROR_TIMEOUT_MS >= 0);
    assert!(DEFAULT_TIMEOUT_MS >= 0);
};
