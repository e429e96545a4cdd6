//! Core behavioral traits for intray components
//!
//! The hook engine never parses configuration files itself. It reads
//! already-resolved values through [`ConfigProvider`], which keeps the engine
//! independent of the file formats and environment conventions used by
//! `intray-config` and makes it trivial to feed it an in-memory map in tests.

/// Configuration provider interface
///
/// Implementors only need to supply [`ConfigProvider::get`]; the typed
/// accessors are derived from it and fall back to the caller's default on
/// missing or unparsable values.
///
/// # Examples
///
/// ```ignore
/// fn async_enabled(config: &dyn ConfigProvider) -> bool {
///     config.get_bool("hooks_async", false)
/// }
/// ```
pub trait ConfigProvider: Send + Sync {
    /// Get the raw string value for a key
    fn get(&self, key: &str) -> Option<String>;

    /// Get a string value, or `default` when the key is absent
    fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get an integer value, or `default` when the key is absent or not an integer
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a boolean value, or `default` when the key is absent or not a boolean
    ///
    /// Accepts `1/true/yes/on` and `0/false/no/off`, case-insensitively.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }
}

/// Parse the boolean spellings accepted in configuration values
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<S: std::hash::BuildHasher + Send + Sync> ConfigProvider
    for std::collections::HashMap<String, String, S>
{
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::collections::HashMap;

    fn provider(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_get_string_default() {
        let config = provider(&[("hooks_dir", "/tmp/hooks")]);
        assert_eq!(config.get_string("hooks_dir", "x"), "/tmp/hooks");
        assert_eq!(config.get_string("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_get_int_parses_and_falls_back() {
        let config = provider(&[("max_hooks", "4"), ("bad", "four"), ("neg", "-2")]);
        assert_eq!(config.get_int("max_hooks", 10), 4);
        assert_eq!(config.get_int("bad", 10), 10);
        assert_eq!(config.get_int("neg", 10), -2);
        assert_eq!(config.get_int("missing", 7), 7);
    }

    #[test]
    fn test_get_bool_spellings() {
        let config = provider(&[
            ("a", "1"),
            ("b", "YES"),
            ("c", "on"),
            ("d", "0"),
            ("e", "False"),
            ("f", "off"),
            ("g", "maybe"),
        ]);
        assert!(config.get_bool("a", false));
        assert!(config.get_bool("b", false));
        assert!(config.get_bool("c", false));
        assert!(!config.get_bool("d", true));
        assert!(!config.get_bool("e", true));
        assert!(!config.get_bool("f", true));
        // Unrecognised spelling keeps the default
        assert!(config.get_bool("g", true));
        assert!(!config.get_bool("g", false));
    }

    #[test]
    fn test_arc_dyn_provider() {
        let config: std::sync::Arc<dyn ConfigProvider> =
            std::sync::Arc::new(provider(&[("hooks_async", "true")]));
        assert!(config.get_bool("hooks_async", false));
    }
}
