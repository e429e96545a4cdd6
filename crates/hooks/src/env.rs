//! Environment overlay for hook processes
//!
//! Hook processes inherit the caller's environment. On top of it they get
//! the dispatch context (hook point, timestamp, failure mode, path to the
//! intray executable) and the caller-supplied `KEY=VALUE` variables.
//! Caller variables come last, so they override anything with the same key.

use crate::point::HookPoint;
use crate::settings::FailureMode;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Name of the hook point being fired
pub const HOOK_POINT_VAR: &str = "HOOK_POINT";

/// RFC 3339 UTC timestamp of the dispatch
pub const HOOK_TIMESTAMP_VAR: &str = "HOOK_TIMESTAMP";

/// Effective failure mode of the dispatch
pub const FAILURE_MODE_VAR: &str = "INTRAY_HOOKS_FAILURE_MODE";

/// Absolute path of the intray executable, for hooks that call back into it
pub const BIN_VAR: &str = "INTRAY_BIN";

/// Ordered set of variables layered over the inherited environment
pub type HookEnv = IndexMap<String, String>;

/// Builds the [`HookEnv`] shared by every script of one dispatch
#[derive(Debug, Clone)]
pub struct HookEnvBuilder {
    hook_point: String,
    failure_mode: FailureMode,
    timestamp: DateTime<Utc>,
    executable: Option<PathBuf>,
}

impl HookEnvBuilder {
    /// Start a builder stamped with the current time
    ///
    /// The executable path is resolved from the running process; override it
    /// with [`HookEnvBuilder::executable`].
    pub fn new(hook_point: &HookPoint, failure_mode: FailureMode) -> Self {
        Self {
            hook_point: hook_point.as_str().to_string(),
            failure_mode,
            timestamp: Utc::now(),
            executable: resolve_executable(),
        }
    }

    /// Use a fixed dispatch time
    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Use a specific intray executable path, or omit it with `None`
    #[must_use]
    pub fn executable(mut self, path: Option<PathBuf>) -> Self {
        self.executable = path;
        self
    }

    /// Produce the overlay, appending the caller's `KEY=VALUE` entries
    ///
    /// Each entry is split at the first `=`, so values may contain `=`.
    /// Entries without `=` or with an empty key are dropped.
    pub fn build<I, S>(self, vars: I) -> HookEnv
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut env = HookEnv::new();
        env.insert(HOOK_POINT_VAR.to_string(), self.hook_point);
        env.insert(
            HOOK_TIMESTAMP_VAR.to_string(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        env.insert(
            FAILURE_MODE_VAR.to_string(),
            self.failure_mode.as_str().to_string(),
        );
        if let Some(bin) = self.executable {
            env.insert(BIN_VAR.to_string(), bin.display().to_string());
        }

        for var in vars {
            let var = var.as_ref();
            match var.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    env.insert(key.to_string(), value.to_string());
                }
                _ => tracing::debug!("Ignoring malformed hook variable: {:?}", var),
            }
        }

        env
    }
}

/// Locate the intray executable
///
/// Tries the running executable, then `argv[0]` (absolute, or looked up on
/// `PATH`), then the usual install locations.
pub fn resolve_executable() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe()
        && exe.is_file()
    {
        return Some(exe);
    }

    if let Some(arg0) = std::env::args_os().next() {
        let arg0 = PathBuf::from(arg0);
        if arg0.is_absolute() && arg0.is_file() {
            return Some(arg0);
        }
        if let Ok(found) = which::which(&arg0) {
            return Some(found);
        }
    }

    fallback_locations().into_iter().find(|p| p.is_file())
}

fn fallback_locations() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("/usr/local/bin/intray"),
        PathBuf::from("/usr/bin/intray"),
    ];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home_bin(&home, ".local"));
        candidates.push(home_bin(&home, ".cargo"));
    }
    candidates
}

fn home_bin(home: &Path, prefix: &str) -> PathBuf {
    home.join(prefix).join("bin").join("intray")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;

    fn fixed_builder(point: &str) -> HookEnvBuilder {
        HookEnvBuilder::new(&HookPoint::new(point), FailureMode::Warn)
            .timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap())
            .executable(Some(PathBuf::from("/opt/intray/bin/intray")))
    }

    #[test]
    fn test_context_variables() {
        let env = fixed_builder("pre-add").build(Vec::<String>::new());
        assert_eq!(env[HOOK_POINT_VAR], "pre-add");
        assert_eq!(env[HOOK_TIMESTAMP_VAR], "2024-05-01T12:30:45Z");
        assert_eq!(env[FAILURE_MODE_VAR], "warn");
        assert_eq!(env[BIN_VAR], "/opt/intray/bin/intray");
    }

    #[test]
    fn test_caller_vars_split_on_first_equals() {
        let env = fixed_builder("post-add").build(["MESSAGE=a=b=c", "LEVEL=info", "EMPTY="]);
        assert_eq!(env["MESSAGE"], "a=b=c");
        assert_eq!(env["LEVEL"], "info");
        assert_eq!(env["EMPTY"], "");
    }

    #[test]
    fn test_malformed_vars_dropped() {
        let env = fixed_builder("post-add").build(["NOEQUALS", "=value", "OK=1"]);
        assert!(!env.contains_key("NOEQUALS"));
        assert!(!env.contains_key(""));
        assert_eq!(env["OK"], "1");
    }

    #[test]
    fn test_caller_vars_override_context() {
        let env = fixed_builder("pre-add").build(["HOOK_POINT=spoofed"]);
        assert_eq!(env[HOOK_POINT_VAR], "spoofed");
    }

    #[test]
    fn test_missing_executable_omitted() {
        let env = fixed_builder("pre-add")
            .executable(None)
            .build(Vec::<String>::new());
        assert!(!env.contains_key(BIN_VAR));
    }

    #[test]
    fn test_builds_differ_only_in_changed_var() {
        let a = fixed_builder("pre-dismiss").build(["ID=1", "STATE=active"]);
        let b = fixed_builder("pre-dismiss").build(["ID=1", "STATE=dismissed"]);

        assert_eq!(a.len(), b.len());
        for (key, value) in &a {
            if key == "STATE" {
                assert_ne!(value, &b[key]);
            } else {
                assert_eq!(value, &b[key], "{key}");
            }
        }
    }

    #[test]
    fn test_failure_mode_propagated() {
        let env = HookEnvBuilder::new(&HookPoint::new("cleanup"), FailureMode::Abort)
            .build(Vec::<String>::new());
        assert_eq!(env[FAILURE_MODE_VAR], "abort");
    }

    #[test]
    fn test_resolve_executable_finds_something() {
        // The test binary itself is always resolvable
        assert!(resolve_executable().is_some_and(|p| p.is_file()));
    }
}
