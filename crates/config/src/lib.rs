//! Configuration management for intray
//!
//! This crate handles:
//! - Configuration loading (defaults, config file, `INTRAY_*` environment)
//! - Validation and normalisation of hook-related values
//! - XDG directory management
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;

// Re-export error types from core
pub use intray_core::{ConfigProvider, Error, Result};

// Re-export main types
pub use config::{Config, ENV_PREFIX};
pub use dirs::{config_dir, default_hooks_dir};
