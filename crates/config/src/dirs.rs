//! XDG directory utilities
//!
//! This module provides XDG-compliant directory paths for intray.
//! It follows the XDG Base Directory specification using the `xdg` crate:
//! - `XDG_CONFIG_HOME` defaults to ~/.config

use std::path::PathBuf;
use xdg::BaseDirectories;

/// Get the intray configuration directory
///
/// Returns `$XDG_CONFIG_HOME/intray` or `~/.config/intray`
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix("intray").get_config_home()
}

/// Get the default hooks directory
///
/// Returns `$XDG_CONFIG_HOME/intray/hooks` or `~/.config/intray/hooks`
#[must_use]
pub fn default_hooks_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join("hooks"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir_contains_intray() {
        let dir = config_dir();
        assert!(
            dir.is_some(),
            "config_dir should return Some in normal environment"
        );

        let path = dir.unwrap();
        assert!(
            path.to_string_lossy().contains("intray"),
            "config_dir path should contain 'intray': {path:?}"
        );
        assert!(path.is_absolute(), "config_dir should be absolute: {path:?}");
    }

    #[test]
    #[serial]
    fn test_hooks_dir_is_child_of_config_dir() {
        if let (Some(config), Some(hooks)) = (config_dir(), default_hooks_dir()) {
            assert!(hooks.starts_with(&config));
            assert_eq!(hooks.file_name().and_then(|n| n.to_str()), Some("hooks"));
        }
    }

    #[test]
    #[serial]
    fn test_xdg_config_home_is_respected() {
        let temp = tempfile::TempDir::new().unwrap();
        temp_env::with_var("XDG_CONFIG_HOME", Some(temp.path()), || {
            assert_eq!(config_dir(), Some(temp.path().join("intray")));
            assert_eq!(
                default_hooks_dir(),
                Some(temp.path().join("intray").join("hooks"))
            );
        });
    }
}
