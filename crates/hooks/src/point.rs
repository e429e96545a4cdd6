//! Hook points
//!
//! A hook point is the name of a lifecycle event. It doubles as the name of
//! the directory holding its scripts and, normalised, as part of the
//! configuration key that enables or disables it.

use std::fmt;
use std::path::{Path, PathBuf};

/// Hook points fired by the built-in tray commands
pub const KNOWN_HOOK_POINTS: [&str; 8] = [
    "pre-add",
    "post-add",
    "pre-dismiss",
    "post-dismiss",
    "cleanup",
    "post-cleanup",
    "pre-toggle",
    "post-toggle",
];

/// Name of an extension point, e.g. `pre-add`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookPoint(String);

impl HookPoint {
    /// Create a hook point from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The hook point name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Per-point enable flag, e.g. `hooks_enabled_pre_add`
    #[must_use]
    pub fn config_key(&self) -> String {
        format!(
            "hooks_enabled_{}",
            self.0.replace('-', "_").to_ascii_lowercase()
        )
    }

    /// Directory holding this point's scripts under `hooks_dir`
    #[must_use]
    pub fn dir_in(&self, hooks_dir: &Path) -> PathBuf {
        hooks_dir.join(&self.0)
    }

    /// Whether the name is usable as a single directory component
    ///
    /// Rejects empty names, hidden names and anything containing a path
    /// separator, so a point can never resolve outside `hooks_dir`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('.')
            && !self.0.contains(['/', '\\'])
            && !self.0.contains('\0')
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HookPoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HookPoint {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for HookPoint {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Storage mutations that are wrapped by a pair of hook points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// An item is added to the tray
    Add,
    /// An item is dismissed
    Dismiss,
    /// The periodic cleanup of old items
    Cleanup,
    /// Tray visibility is toggled
    Toggle,
}

impl LifecycleEvent {
    /// Hook point fired before the mutation
    #[must_use]
    pub const fn pre(self) -> &'static str {
        match self {
            Self::Add => "pre-add",
            Self::Dismiss => "pre-dismiss",
            Self::Cleanup => "cleanup",
            Self::Toggle => "pre-toggle",
        }
    }

    /// Hook point fired after the mutation
    #[must_use]
    pub const fn post(self) -> &'static str {
        match self {
            Self::Add => "post-add",
            Self::Dismiss => "post-dismiss",
            Self::Cleanup => "post-cleanup",
            Self::Toggle => "post-toggle",
        }
    }
}
