//! Base error types for intray
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hooks directory could not be determined or created
    #[error("Hooks directory error at {}: {message}", path.display())]
    HooksDir {
        /// Directory that was being resolved
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// A hook script exited unsuccessfully
    #[error("hook '{name}' failed at {hook_point} ({status})")]
    HookFailed {
        /// Script file name
        name: String,
        /// Point the script was fired for
        hook_point: String,
        /// Exit status of the script
        status: ExitStatus,
    },

    /// A hook script could not be started
    #[error("hook '{name}' could not be started: {source}")]
    HookSpawn {
        /// Script file name
        name: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
