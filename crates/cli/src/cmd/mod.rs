//! CLI command implementations

pub mod hooks;
