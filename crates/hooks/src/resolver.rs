//! Hooks directory resolution and enablement

use crate::point::{HookPoint, KNOWN_HOOK_POINTS};
use intray_core::{ConfigProvider, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the hooks directory
pub const HOOKS_DIR_ENV: &str = "INTRAY_HOOKS_DIR";

/// Resolve the hooks directory
///
/// Order: `$INTRAY_HOOKS_DIR`, then the configured `hooks_dir`, then
/// `hooks/` under the user's configuration directory. Empty values are
/// treated as unset.
pub fn hooks_dir(config: &dyn ConfigProvider) -> Option<PathBuf> {
    std::env::var_os(HOOKS_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            config
                .get("hooks_dir")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        })
        .or_else(intray_config::default_hooks_dir)
}

/// Whether scripts for `point` should run
///
/// Requires both the global `hooks_enabled` flag and the per-point
/// `hooks_enabled_<point>` flag; both default to true.
pub fn is_enabled(config: &dyn ConfigProvider, point: &HookPoint) -> bool {
    config.get_bool("hooks_enabled", true) && config.get_bool(&point.config_key(), true)
}

/// Create the directory of every known hook point under `hooks_dir`
///
/// Existing directories are left untouched. Returns the directories that
/// were newly created.
pub fn scaffold(hooks_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for name in KNOWN_HOOK_POINTS {
        let dir = hooks_dir.join(name);
        if dir.is_dir() {
            continue;
        }
        fs::create_dir_all(&dir).map_err(|e| Error::HooksDir {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!("Created hook directory {}", dir.display());
        created.push(dir);
    }
    Ok(created)
}
