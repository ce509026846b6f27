//! Default notification settings, loaded from a `settings.toml` file.
//!
//! The service consults a [`DefaultSettings`] collaborator whenever a
//! per-call option is absent. [`Config`] is the production
//! implementation: optional global fallbacks plus per-kind overrides,
//! bottoming out at the built-in constants in [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use crouton::config::{self, KindSettings};
//!
//! // Load existing configuration (missing file means defaults).
//! let mut config = config::load().unwrap_or_default();
//!
//! // Make error toasts permanent until dismissed.
//! config.kinds.insert(
//!     "error".to_string(),
//!     KindSettings { sticky: Some(true), ..Default::default() },
//! );
//!
//! config::save(&config).expect("Failed to save config");
//! ```

use crate::error::Result;
use crate::notify::Kind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "crouton";

/// Kind-scoped default settings consumed by the notification service.
///
/// Only the two lifecycle-relevant options are default-resolved; the
/// remaining options default structurally at the call site.
pub trait DefaultSettings: Send + Sync {
    /// Default remaining timeout in milliseconds for `kind`. A negative
    /// value means the kind is sticky by default.
    fn timeout_ms(&self, kind: &Kind) -> i64;

    /// Whether `kind` messages are sticky when the caller does not say.
    fn sticky(&self, kind: &Kind) -> bool;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global fallback timeout, used when a kind has no entry of its own.
    #[serde(default)]
    pub timeout_ms: Option<i64>,
    /// Global fallback stickiness.
    #[serde(default)]
    pub sticky: Option<bool>,
    /// Per-kind overrides, keyed by the kind's configuration name.
    #[serde(default)]
    pub kinds: BTreeMap<String, KindSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KindSettings {
    #[serde(default)]
    pub timeout_ms: Option<i64>,
    #[serde(default)]
    pub sticky: Option<bool>,
}

impl DefaultSettings for Config {
    fn timeout_ms(&self, kind: &Kind) -> i64 {
        self.kinds
            .get(kind.as_str())
            .and_then(|k| k.timeout_ms)
            .or(self.timeout_ms)
            .unwrap_or_else(|| defaults::builtin_timeout_ms(kind))
    }

    fn sticky(&self, kind: &Kind) -> bool {
        self.kinds
            .get(kind.as_str())
            .and_then(|k| k.sticky)
            .or(self.sticky)
            .unwrap_or(defaults::DEFAULT_STICKY)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let mut kinds = BTreeMap::new();
        kinds.insert(
            "error".to_string(),
            KindSettings {
                timeout_ms: Some(-1),
                sticky: Some(true),
            },
        );
        let config = Config {
            timeout_ms: Some(4_000),
            sticky: Some(false),
            kinds,
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.timeout_ms, Some(4_000));
        assert_eq!(loaded.sticky, Some(false));
        assert_eq!(loaded.kinds["error"].timeout_ms, Some(-1));
        assert_eq!(loaded.kinds["error"].sticky, Some(true));
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert!(loaded.timeout_ms.is_none());
        assert!(loaded.kinds.is_empty());
    }

    #[test]
    fn kind_entry_beats_global_beats_builtin() {
        let mut kinds = BTreeMap::new();
        kinds.insert(
            "error".to_string(),
            KindSettings {
                timeout_ms: Some(9_000),
                sticky: None,
            },
        );
        let config = Config {
            timeout_ms: Some(1_000),
            sticky: Some(true),
            kinds,
        };

        // Kind-level entry wins.
        assert_eq!(config.timeout_ms(&Kind::Error), 9_000);
        // No kind entry: global fallback.
        assert_eq!(config.timeout_ms(&Kind::Info), 1_000);
        // Kind entry without the field: global fallback.
        assert!(config.sticky(&Kind::Error));
    }

    #[test]
    fn empty_config_uses_builtin_defaults() {
        let config = Config::default();

        assert_eq!(
            config.timeout_ms(&Kind::Info),
            defaults::DEFAULT_INFO_TIMEOUT_MS
        );
        assert_eq!(
            config.timeout_ms(&Kind::Error),
            defaults::DEFAULT_ERROR_TIMEOUT_MS
        );
        assert_eq!(
            config.timeout_ms(&Kind::Other("progress".into())),
            defaults::DEFAULT_TIMEOUT_MS
        );
        assert!(!config.sticky(&Kind::Info));
    }

    #[test]
    fn unknown_kinds_resolve_by_name() {
        let mut kinds = BTreeMap::new();
        kinds.insert(
            "progress".to_string(),
            KindSettings {
                timeout_ms: Some(250),
                sticky: None,
            },
        );
        let config = Config {
            kinds,
            ..Config::default()
        };

        assert_eq!(config.timeout_ms(&Kind::Other("progress".into())), 250);
    }
}
