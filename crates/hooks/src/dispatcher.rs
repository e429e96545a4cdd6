//! Hook dispatch
//!
//! [`HookEngine::run`] is the single entry point the tray commands use to
//! fire a hook point. Each call snapshots the configuration, discovers the
//! scripts and runs them in order, either inline or in the background.

use crate::discovery::{self, HookScript};
use crate::env::HookEnvBuilder;
use crate::executor;
use crate::point::{HookPoint, LifecycleEvent};
use crate::resolver;
use crate::settings::{FailureMode, HookSettings};
use crate::tracker::PendingHooks;
use intray_core::{ConfigProvider, Error, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Runs the scripts registered for a hook point
///
/// # Examples
///
/// ```ignore
/// let engine = HookEngine::new(Arc::new(config));
/// engine.run("pre-add", ["MESSAGE=build finished", "LEVEL=info"])?;
/// ```
pub struct HookEngine {
    config: Arc<dyn ConfigProvider>,
    tracker: Arc<PendingHooks>,
}

impl HookEngine {
    /// Create an engine backed by the process-wide pending-hook tracker
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self::with_tracker(config, PendingHooks::global())
    }

    /// Create an engine with its own tracker
    pub fn with_tracker(config: Arc<dyn ConfigProvider>, tracker: Arc<PendingHooks>) -> Self {
        Self { config, tracker }
    }

    /// The tracker counting this engine's background hooks
    pub fn tracker(&self) -> &Arc<PendingHooks> {
        &self.tracker
    }

    /// Whether scripts for `hook_point` would run
    pub fn is_enabled(&self, hook_point: &str) -> bool {
        resolver::is_enabled(self.config.as_ref(), &HookPoint::new(hook_point))
    }

    /// The hooks directory, if one can be determined
    pub fn directory(&self) -> Option<PathBuf> {
        resolver::hooks_dir(self.config.as_ref())
    }

    /// Scripts that a dispatch of `hook_point` would run, in order
    pub fn scripts(&self, hook_point: &str) -> Result<Vec<HookScript>> {
        let point = checked_point(hook_point)?;
        Ok(self
            .directory()
            .map(|dir| discovery::discover(&point.dir_in(&dir)))
            .unwrap_or_default())
    }

    /// Fire `hook_point`
    ///
    /// `vars` are `KEY=VALUE` strings exported to every script. Returns an
    /// error only when a synchronous script fails under the `abort` failure
    /// mode, in which case the remaining scripts are not run.
    ///
    /// A point name that is not a plain directory name has no scripts.
    #[tracing::instrument(skip(self, vars))]
    pub fn run<I, S>(&self, hook_point: &str, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let point = HookPoint::new(hook_point);

        if !resolver::is_enabled(self.config.as_ref(), &point) {
            tracing::debug!("Hooks disabled for {}", point);
            return Ok(());
        }

        if !point.is_valid() {
            tracing::warn!("Ignoring invalid hook point name: '{}'", hook_point);
            return Ok(());
        }

        let Some(dir) = self.directory() else {
            tracing::debug!("No hooks directory configured");
            return Ok(());
        };

        let scripts = discovery::discover(&point.dir_in(&dir));
        if scripts.is_empty() {
            return Ok(());
        }

        let settings = HookSettings::from_config(self.config.as_ref());
        let env = HookEnvBuilder::new(&point, settings.failure_mode).build(vars);

        tracing::debug!(
            "Dispatching {} hook(s) for {} ({}, failure mode {})",
            scripts.len(),
            point,
            if settings.async_enabled { "async" } else { "sync" },
            settings.failure_mode
        );

        for script in &scripts {
            if settings.async_enabled {
                let started = executor::try_start_async(
                    &self.tracker,
                    script,
                    &point,
                    &env,
                    settings.failure_mode,
                    settings.async_timeout,
                    settings.max_concurrent,
                );
                if let Err(e) = started {
                    // Other scripts are already running in the background
                    log_start_failure(&e, settings.failure_mode);
                }
            } else {
                executor::run_sync(script, &point, &env, settings.failure_mode)?;
            }
        }

        Ok(())
    }

    /// Run `op` between the pre and post hooks of `event`
    ///
    /// If the pre hook aborts, `op` is not run. The post hook only fires when
    /// `op` succeeds.
    pub fn around<T, E, F>(
        &self,
        event: LifecycleEvent,
        vars: &[String],
        op: F,
    ) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        self.run(event.pre(), vars)?;
        let value = op()?;
        self.run(event.post(), vars)?;
        Ok(value)
    }

    /// Block until this engine's background hooks have finished
    pub fn wait_for_pending(&self) {
        self.tracker.wait();
    }
}

impl std::fmt::Debug for HookEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookEngine")
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

fn checked_point(hook_point: &str) -> Result<HookPoint> {
    let point = HookPoint::new(hook_point);
    if point.is_valid() {
        Ok(point)
    } else {
        Err(Error::Message(format!("invalid hook point name: '{hook_point}'")))
    }
}

fn log_start_failure(err: &Error, mode: FailureMode) {
    match mode {
        FailureMode::Abort => tracing::error!("{}", err),
        FailureMode::Warn => tracing::warn!("{}", err),
        FailureMode::Ignore => tracing::debug!("{}", err),
    }
}
