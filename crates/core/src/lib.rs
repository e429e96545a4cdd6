//! Core types and utilities for intray
//!
//! This is the foundation crate that all other intray crates depend on.
//! It provides:
//! - Base error types
//! - The configuration accessor trait consumed by the hook engine
//!
//! This crate has no dependencies on other intray crates.

pub mod error;
pub mod traits;

pub use error::{Error, Result};
pub use traits::ConfigProvider;
