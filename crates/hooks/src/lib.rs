//! # intray hook engine
//!
//! Runs user-supplied executables at lifecycle events of the tray
//! (`pre-add`, `post-dismiss`, `cleanup`, ...).
//!
//! ## Execution Model
//!
//! - Scripts live in `<hooks_dir>/<hook-point>/` and run in byte-wise
//!   filename order; numeric prefixes (`01-`, `02-`) are the convention
//! - Synchronous mode runs each script to completion on the calling thread;
//!   with `abort` a failing script stops the remaining ones and the error
//!   reaches the caller
//! - Asynchronous mode starts each script on a watcher thread, bounded by a
//!   concurrency ceiling and a per-process deadline. The caller never waits,
//!   but [`wait_for_pending_hooks`] must run before the process exits
//!
//! ## Module Organization
//!
//! - `point`: hook point names and the lifecycle events that fire them
//! - `settings`: per-call snapshot of hook configuration
//! - `resolver`: hooks directory resolution and enablement
//! - `discovery`: executable script discovery
//! - `env`: environment overlay for hook processes
//! - `executor`: synchronous and asynchronous runners
//! - `tracker`: pending-hook accounting, concurrency gate and drain
//! - `dispatcher`: the [`HookEngine`] entry point

pub mod discovery;
pub mod dispatcher;
pub mod env;
pub mod executor;
pub mod point;
pub mod resolver;
pub mod settings;
pub mod tracker;

// Re-export error types from core
pub use intray_core::{ConfigProvider, Error, Result};

// Re-export main types for convenience
pub use discovery::{HookScript, discover};
pub use dispatcher::HookEngine;
pub use env::{HookEnv, HookEnvBuilder};
pub use point::{HookPoint, KNOWN_HOOK_POINTS, LifecycleEvent};
pub use settings::{FailureMode, HookSettings};
pub use tracker::{PendingGuard, PendingHooks};

/// Block until every asynchronous hook started by this process has finished
///
/// Must be called before the process exits, otherwise fire-and-forget hooks
/// are killed by process teardown.
pub fn wait_for_pending_hooks() {
    PendingHooks::global().wait();
}

/// Reset the process-wide pending-hook state
///
/// # Panics
///
/// Panics if any asynchronous hook is still outstanding. Call
/// [`wait_for_pending_hooks`] first.
pub fn reset_for_testing() {
    PendingHooks::global().reset_for_testing();
}
