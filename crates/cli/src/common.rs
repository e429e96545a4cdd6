//! State shared by CLI commands

use intray_config::{Config, ConfigProvider};
use intray_hooks::HookEngine;
use std::path::PathBuf;
use std::sync::Arc;

/// Hook engine for one CLI invocation
#[derive(Debug)]
pub struct RuntimeContext {
    /// Engine dispatching hook points, backed by the process-wide tracker
    pub engine: HookEngine,
}

impl RuntimeContext {
    /// Build the context from loaded configuration
    pub fn new(config: Config) -> Self {
        let provider: Arc<dyn ConfigProvider> = Arc::new(config);
        Self {
            engine: HookEngine::new(provider),
        }
    }

    /// Hooks directory the engine uses, if any
    pub fn hooks_dir(&self) -> Option<PathBuf> {
        self.engine.directory()
    }
}
