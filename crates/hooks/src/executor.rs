//! Hook script runners
//!
//! [`run_sync`] blocks the caller until the script exits and applies the
//! failure mode to its status. [`try_start_async`] starts the script and
//! hands it to a watcher thread that owns a [`PendingGuard`] for the whole
//! lifetime of the process, so the pending count is released exactly once
//! whatever happens to the script or the watcher.

use crate::discovery::HookScript;
use crate::env::HookEnv;
use crate::point::HookPoint;
use crate::settings::FailureMode;
use crate::tracker::{PendingGuard, PendingHooks};
use intray_core::{Error, Result};
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitStatus;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn command(script: &HookScript, env: &HookEnv) -> duct::Expression {
    // Inherits the parent environment; the overlay is layered on top
    let mut expr = duct::cmd(script.path.as_path(), Vec::<&str>::new());
    for (key, value) in env {
        expr = expr.env(key, value);
    }
    expr
}

/// Run one script to completion on the calling thread
///
/// Combined stdout and stderr are captured and written to our own stderr.
/// No timeout is enforced. A non-zero exit, or a script that cannot be
/// started at all, is handled according to `mode`; only
/// [`FailureMode::Abort`] turns it into an error.
#[tracing::instrument(skip(script, point, env), fields(hook = %script.name, hook_point = %point))]
pub fn run_sync(
    script: &HookScript,
    point: &HookPoint,
    env: &HookEnv,
    mode: FailureMode,
) -> Result<()> {
    tracing::debug!("Running hook {}", script.path.display());
    let start = Instant::now();

    let output = command(script, env)
        .stderr_to_stdout()
        .stdout_capture()
        .unchecked()
        .run();

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            let err = Error::HookSpawn {
                name: script.name.clone(),
                source: e,
            };
            return apply_failure_mode(err, mode);
        }
    };

    forward_output(&output.stdout);
    tracing::debug!(
        "Hook {} finished in {:?} ({})",
        script.name,
        start.elapsed(),
        output.status
    );

    if output.status.success() {
        return Ok(());
    }

    apply_failure_mode(failed(script, point, output.status), mode)
}

/// Start one script in the background if the concurrency ceiling allows
///
/// Returns `Ok(true)` when the script was started and `Ok(false)` when the
/// ceiling rejected it (it is skipped, not queued). Returns an error only
/// if the process could not be spawned; the reserved slot is released
/// before returning.
///
/// The watcher kills the process once `timeout` has elapsed.
#[tracing::instrument(skip(tracker, script, point, env), fields(hook = %script.name, hook_point = %point))]
pub fn try_start_async(
    tracker: &Arc<PendingHooks>,
    script: &HookScript,
    point: &HookPoint,
    env: &HookEnv,
    mode: FailureMode,
    timeout: Duration,
    max_concurrent: usize,
) -> Result<bool> {
    let Some(guard) = tracker.try_acquire(max_concurrent) else {
        tracing::debug!("Skipping hook {}: too many hooks pending", script.name);
        return Ok(false);
    };

    // Output streams straight through to our stderr
    let handle = command(script, env)
        .stdout_to_stderr()
        .unchecked()
        .start()
        .map_err(|e| Error::HookSpawn {
            name: script.name.clone(),
            source: e,
        })?;
    let handle = Arc::new(handle);

    let watched = Watched {
        handle: Arc::clone(&handle),
        name: script.name.clone(),
        point: point.clone(),
        mode,
        timeout,
        _guard: guard,
    };

    let spawned = thread::Builder::new()
        .name(format!("hook-{}", script.name))
        .spawn(move || watched.watch());

    if let Err(e) = spawned {
        // The closure (and its guard) was dropped; don't leave the child behind
        tracing::warn!("Failed to start watcher for hook {}: {}", script.name, e);
        if let Err(e) = handle.kill() {
            tracing::debug!("Failed to kill hook {}: {}", script.name, e);
        }
        return Err(Error::HookSpawn {
            name: script.name.clone(),
            source: e,
        });
    }

    tracing::debug!("Started hook {} in background", script.name);
    Ok(true)
}

/// A background hook and everything its watcher needs
struct Watched {
    handle: Arc<duct::Handle>,
    name: String,
    point: HookPoint,
    mode: FailureMode,
    timeout: Duration,
    // Released when the watcher finishes, even by unwinding
    _guard: PendingGuard,
}

impl Watched {
    fn watch(self) {
        self.guarded(Self::wait);
    }

    /// Run `body` and release the slot, even if `body` panics
    ///
    /// Returns `false` when `body` panicked.
    fn guarded<F: FnOnce(&Self)>(self, body: F) -> bool {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&self)));
        if outcome.is_err() {
            tracing::error!("Watcher for hook {} panicked", self.name);
        }
        tracing::debug!("Hook {} released after {:?}", self.name, start.elapsed());
        outcome.is_ok()
    }

    fn wait(&self) {
        match self.handle.wait_timeout(self.timeout) {
            Ok(Some(output)) => self.report(output.status),
            Ok(None) => {
                if let Err(e) = self.handle.kill() {
                    tracing::debug!("Failed to kill hook {}: {}", self.name, e);
                }
                // Reap the killed child; its status is not interesting
                let _ = self.handle.wait();
                self.log_failure(&format!(
                    "hook '{}' timed out after {}s at {}",
                    self.name,
                    self.timeout.as_secs(),
                    self.point
                ));
            }
            Err(e) => {
                self.log_failure(&format!("hook '{}' could not be awaited: {}", self.name, e));
            }
        }
    }

    fn report(&self, status: ExitStatus) {
        if status.success() {
            tracing::debug!("Hook {} finished", self.name);
            return;
        }
        let err = Error::HookFailed {
            name: self.name.clone(),
            hook_point: self.point.to_string(),
            status,
        };
        self.log_failure(&err.to_string());
    }

    /// The caller has already returned, so abort degrades to a warning
    fn log_failure(&self, message: &str) {
        match self.mode {
            FailureMode::Abort | FailureMode::Warn => tracing::warn!("{}", message),
            FailureMode::Ignore => tracing::debug!("{}", message),
        }
    }
}

fn failed(script: &HookScript, point: &HookPoint, status: ExitStatus) -> Error {
    Error::HookFailed {
        name: script.name.clone(),
        hook_point: point.to_string(),
        status,
    }
}

/// Map a hook failure to the caller's result
pub(crate) fn apply_failure_mode(err: Error, mode: FailureMode) -> Result<()> {
    match mode {
        FailureMode::Abort => {
            tracing::error!("{}", err);
            Err(err)
        }
        FailureMode::Warn => {
            tracing::warn!("{}", err);
            Ok(())
        }
        FailureMode::Ignore => {
            tracing::debug!("{}", err);
            Ok(())
        }
    }
}

fn forward_output(bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let mut stderr = io::stderr().lock();
    if let Err(e) = stderr.write_all(bytes).and_then(|()| stderr.flush()) {
        tracing::debug!("Failed to forward hook output: {}", e);
    }
}
