//! Configuration management
//!
//! Values are flat `key = value` pairs, resolved in this order (later wins):
//!
//! 1. Built-in defaults
//! 2. The config file (`$INTRAY_CONFIG_PATH`, or `config.toml` / `config.json`
//!    in the config directory)
//! 3. `INTRAY_*` environment variables (`INTRAY_MAX_HOOKS=4` sets `max_hooks`)
//!
//! After merging, hook-related values are validated. Invalid values revert to
//! their defaults instead of failing the command.

use crate::Result;
use intray_core::ConfigProvider;
use intray_core::traits::parse_bool;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "INTRAY_";

/// Keys that must hold a positive integer
const POSITIVE_INT_KEYS: &[&str] = &["hooks_async_timeout", "max_hooks"];

/// Keys that must hold a boolean, in addition to every `hooks_enabled*` key
const BOOL_KEYS: &[&str] = &["hooks_async", "debug", "quiet"];

const FAILURE_MODES: &[&str] = &["abort", "warn", "ignore"];

/// Hook points that receive an explicit `hooks_enabled_<point>` default
const DEFAULT_HOOK_POINTS: &[&str] = &[
    "pre_add",
    "post_add",
    "pre_dismiss",
    "post_dismiss",
    "cleanup",
    "post_cleanup",
    "pre_toggle",
    "post_toggle",
];

/// Resolved intray configuration
#[derive(Debug, Clone)]
pub struct Config {
    values: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        let mut set = |k: &str, v: &str| {
            defaults.insert(k.to_string(), v.to_string());
        };

        set("hooks_enabled", "true");
        set("hooks_failure_mode", "warn");
        set("hooks_async", "false");
        set("hooks_async_timeout", "30");
        set("max_hooks", "10");
        set("debug", "false");
        set("quiet", "false");
        for point in DEFAULT_HOOK_POINTS {
            set(&format!("hooks_enabled_{point}"), "true");
        }

        if let Some(config_dir) = crate::dirs::config_dir() {
            defaults.insert(
                "config_dir".to_string(),
                config_dir.display().to_string(),
            );
        }

        let mut config = Self {
            values: defaults.clone(),
            defaults,
        };
        config.compute_dirs();
        config
    }
}

impl Config {
    /// Load configuration from the process environment and config file
    ///
    /// # Errors
    ///
    /// Currently infallible for unreadable or malformed files (they are
    /// skipped with a warning); the `Result` leaves room for callers that
    /// want to surface hard failures.
    pub fn load() -> Result<Self> {
        Self::load_with_env(std::env::vars())
    }

    /// Load configuration using an explicit set of environment variables
    ///
    /// Only variables starting with [`ENV_PREFIX`] are considered.
    pub fn load_with_env<I>(env: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: Vec<(String, String)> = env
            .into_iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(ENV_PREFIX)
                    .filter(|key| !key.is_empty())
                    .map(|key| (key.to_ascii_lowercase(), v))
            })
            .collect();

        let mut config = Self::default();
        // hooks_dir is derived from config_dir until something sets it explicitly
        config.values.remove("hooks_dir");

        // Environment first so a relocated config_dir is honoured when
        // looking for the config file, then again so the environment wins.
        config.merge(overrides.iter().cloned());
        if let Some(path) = config.config_file_path() {
            config.merge_file(&path);
        }
        config.merge(overrides);

        config.validate();
        config.compute_dirs();
        Ok(config)
    }

    /// Build a configuration from defaults plus explicit pairs
    ///
    /// Useful for tests and for embedding the hook engine. Pairs go through
    /// the same validation as loaded values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::default();
        config.merge(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into())),
        );
        config.validate();
        config
    }

    /// Set a single value, validating it like a loaded value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into().to_ascii_lowercase();
        self.values.insert(key, value.into());
        self.validate();
    }

    /// Configuration directory, if one could be determined
    #[must_use]
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.values.get("config_dir").map(PathBuf::from)
    }

    /// Configured hooks directory, if one could be determined
    #[must_use]
    pub fn hooks_dir(&self) -> Option<PathBuf> {
        self.values.get("hooks_dir").map(PathBuf::from)
    }

    fn merge<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.values.extend(pairs);
    }

    fn config_file_path(&self) -> Option<PathBuf> {
        if let Some(explicit) = self.values.get("config_path") {
            return Some(PathBuf::from(explicit));
        }

        let config_dir = self.config_dir()?;
        let toml_path = config_dir.join("config.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }
        let json_path = config_dir.join("config.json");
        json_path.exists().then_some(json_path)
    }

    /// Merge scalar values from a TOML or JSON file
    fn merge_file(&mut self, path: &Path) {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Unable to read config file {}: {}", path.display(), e);
                return;
            }
        };

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            parse_json(&content)
        } else {
            parse_toml(&content)
        };

        match parsed {
            Ok(pairs) => {
                tracing::debug!(
                    count = pairs.len(),
                    "Loaded config file {}",
                    path.display()
                );
                self.merge(pairs);
            }
            Err(e) => {
                tracing::warn!("Unable to parse config file {}: {}", path.display(), e);
            }
        }
    }

    /// Revert invalid hook-related values to their defaults
    fn validate(&mut self) {
        for key in POSITIVE_INT_KEYS {
            if let Some(value) = self.values.get(*key) {
                let valid = value.trim().parse::<i64>().is_ok_and(|n| n > 0);
                if !valid {
                    tracing::debug!(
                        "Invalid {} value '{}': must be a positive integer, using default",
                        key,
                        value
                    );
                    self.revert(key);
                }
            }
        }

        if let Some(value) = self.values.get("hooks_failure_mode").cloned() {
            let lower = value.trim().to_ascii_lowercase();
            if FAILURE_MODES.contains(&lower.as_str()) {
                self.values.insert("hooks_failure_mode".to_string(), lower);
            } else {
                tracing::debug!(
                    "Invalid hooks_failure_mode value '{}': must be one of abort, warn, ignore; using default",
                    value
                );
                self.revert("hooks_failure_mode");
            }
        }

        let bool_keys: Vec<String> = self
            .values
            .keys()
            .filter(|k| k.starts_with("hooks_enabled") || BOOL_KEYS.contains(&k.as_str()))
            .cloned()
            .collect();
        for key in bool_keys {
            let Some(value) = self.values.get(&key) else {
                continue;
            };
            match parse_bool(value) {
                Some(b) => {
                    self.values.insert(key, b.to_string());
                }
                None => {
                    tracing::debug!("Invalid boolean value for {}: '{}', using default", key, value);
                    self.revert(&key);
                }
            }
        }
    }

    fn revert(&mut self, key: &str) {
        match self.defaults.get(key) {
            Some(default) => {
                self.values.insert(key.to_string(), default.clone());
            }
            None => {
                self.values.remove(key);
            }
        }
    }

    /// Derive `hooks_dir` from `config_dir` unless it was set explicitly
    fn compute_dirs(&mut self) {
        if self.values.contains_key("hooks_dir") {
            return;
        }
        if let Some(config_dir) = self.config_dir() {
            self.values.insert(
                "hooks_dir".to_string(),
                config_dir.join("hooks").display().to_string(),
            );
        }
    }
}

impl ConfigProvider for Config {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn parse_toml(content: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(table
        .into_iter()
        .filter_map(|(k, v)| {
            let key = k.to_ascii_lowercase();
            let value = match v {
                toml::Value::String(s) => Some(s),
                toml::Value::Integer(i) => Some(i.to_string()),
                toml::Value::Float(f) => Some(f.to_string()),
                toml::Value::Boolean(b) => Some(b.to_string()),
                other => {
                    tracing::debug!("Unsupported config value type for {}: {}", key, other.type_str());
                    None
                }
            };
            value.map(|v| (key, v))
        })
        .collect())
}

fn parse_json(content: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(content).map_err(|e| e.to_string())?;
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| {
            let key = k.to_ascii_lowercase();
            let value = match v {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Bool(b) => Some(b.to_string()),
                _ => {
                    tracing::debug!("Unsupported config value type for {}", key);
                    None
                }
            };
            value.map(|v| (key, v))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.get_bool("hooks_enabled", false));
        assert_eq!(config.get_string("hooks_failure_mode", ""), "warn");
        assert!(!config.get_bool("hooks_async", true));
        assert_eq!(config.get_int("hooks_async_timeout", 0), 30);
        assert_eq!(config.get_int("max_hooks", 0), 10);
        assert!(config.get_bool("hooks_enabled_pre_toggle", false));
    }

    #[test]
    fn test_env_overrides() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_with_env(env(&[
            ("INTRAY_CONFIG_DIR", temp.path().to_str().unwrap()),
            ("INTRAY_HOOKS_ASYNC", "yes"),
            ("INTRAY_MAX_HOOKS", "3"),
            ("UNRELATED", "1"),
        ]))
        .unwrap();

        assert_eq!(config.get("hooks_async").as_deref(), Some("true"));
        assert_eq!(config.get_int("max_hooks", 0), 3);
        assert!(config.get("unrelated").is_none());
        assert_eq!(config.hooks_dir(), Some(temp.path().join("hooks")));
    }

    #[test]
    fn test_file_then_env_precedence() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.toml"),
            "hooks_failure_mode = \"Abort\"\nmax_hooks = 5\nhooks_async = true\nlevels = [1, 2]\n",
        )
        .unwrap();

        let config = Config::load_with_env(env(&[
            ("INTRAY_CONFIG_DIR", temp.path().to_str().unwrap()),
            ("INTRAY_MAX_HOOKS", "2"),
        ]))
        .unwrap();

        // File value normalised to lowercase
        assert_eq!(config.get_string("hooks_failure_mode", ""), "abort");
        // Environment wins over file
        assert_eq!(config.get_int("max_hooks", 0), 2);
        assert!(config.get_bool("hooks_async", false));
        // Arrays are ignored
        assert!(config.get("levels").is_none());
    }

    #[test]
    fn test_json_config_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.json"),
            r#"{"hooks_async_timeout": 12, "hooks_dir": "/srv/hooks"}"#,
        )
        .unwrap();

        let config = Config::load_with_env(env(&[(
            "INTRAY_CONFIG_DIR",
            temp.path().to_str().unwrap(),
        )]))
        .unwrap();

        assert_eq!(config.get_int("hooks_async_timeout", 0), 12);
        assert_eq!(config.hooks_dir(), Some(PathBuf::from("/srv/hooks")));
    }

    #[test]
    fn test_explicit_config_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "max_hooks = 7\n").unwrap();

        let config = Config::load_with_env(env(&[
            ("INTRAY_CONFIG_DIR", temp.path().to_str().unwrap()),
            ("INTRAY_CONFIG_PATH", path.to_str().unwrap()),
        ]))
        .unwrap();

        assert_eq!(config.get_int("max_hooks", 0), 7);
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "max_hooks = = 3").unwrap();

        let config = Config::load_with_env(env(&[(
            "INTRAY_CONFIG_DIR",
            temp.path().to_str().unwrap(),
        )]))
        .unwrap();

        assert_eq!(config.get_int("max_hooks", 0), 10);
    }

    #[test]
    fn test_invalid_values_revert_to_defaults() {
        let config = Config::from_pairs([
            ("hooks_async_timeout", "-5"),
            ("max_hooks", "many"),
            ("hooks_failure_mode", "explode"),
            ("hooks_async", "perhaps"),
        ]);

        assert_eq!(config.get_int("hooks_async_timeout", 0), 30);
        assert_eq!(config.get_int("max_hooks", 0), 10);
        assert_eq!(config.get_string("hooks_failure_mode", ""), "warn");
        assert_eq!(config.get("hooks_async").as_deref(), Some("false"));
    }

    #[test]
    fn test_invalid_custom_point_flag_is_dropped() {
        let config = Config::from_pairs([("hooks_enabled_post_snooze", "sometimes")]);
        assert!(config.get("hooks_enabled_post_snooze").is_none());

        let config = Config::from_pairs([("hooks_enabled_post_snooze", "0")]);
        assert_eq!(
            config.get("hooks_enabled_post_snooze").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_set_validates() {
        let mut config = Config::default();
        config.set("HOOKS_FAILURE_MODE", "IGNORE");
        assert_eq!(config.get_string("hooks_failure_mode", ""), "ignore");

        config.set("max_hooks", "0");
        assert_eq!(config.get_int("max_hooks", 0), 10);
    }
}
