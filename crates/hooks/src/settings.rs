//! Hook settings
//!
//! Every dispatch reads the configuration exactly once into a
//! [`HookSettings`] snapshot, so a configuration change while scripts are
//! running never affects the call already in progress.

use intray_core::{ConfigProvider, Error};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Deadline for asynchronous hooks when none (or an invalid one) is configured
pub const DEFAULT_ASYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// Concurrency ceiling when none (or an invalid one) is configured
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// How a failing hook affects the command that fired it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop the remaining scripts and return the error (synchronous hooks only)
    Abort,
    /// Log a warning and carry on
    #[default]
    Warn,
    /// Carry on silently
    Ignore,
}

impl FailureMode {
    /// Configuration spelling of the mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Warn => "warn",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailureMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            other => Err(Error::Config(format!(
                "invalid hooks_failure_mode '{other}': must be one of abort, warn, ignore"
            ))),
        }
    }
}

/// Snapshot of the hook configuration for one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSettings {
    /// Failure policy for every script in the call
    pub failure_mode: FailureMode,
    /// Start scripts in the background instead of waiting for them
    pub async_enabled: bool,
    /// Deadline for each asynchronous script
    pub async_timeout: Duration,
    /// Ceiling on simultaneously running asynchronous scripts
    pub max_concurrent: usize,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            failure_mode: FailureMode::default(),
            async_enabled: false,
            async_timeout: DEFAULT_ASYNC_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl HookSettings {
    /// Read the settings from configuration
    ///
    /// Unparsable or non-positive values fall back to the defaults. A
    /// non-positive timeout never means "no timeout".
    pub fn from_config(config: &dyn ConfigProvider) -> Self {
        let failure_mode = config
            .get("hooks_failure_mode")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let async_timeout = u64::try_from(config.get_int("hooks_async_timeout", 0))
            .ok()
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_ASYNC_TIMEOUT, Duration::from_secs);

        let max_concurrent = usize::try_from(config.get_int("max_hooks", 0))
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONCURRENT);

        Self {
            failure_mode,
            async_enabled: config.get_bool("hooks_async", false),
            async_timeout,
            max_concurrent,
        }
    }
}
