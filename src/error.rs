//! Error types for pkgfact operations.
//!
//! This module defines [`FactError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A fact that cannot be determined is `Absent`, never an error
//! - Runner failures (spawn, timeout) are `FactError` values that the probe
//!   folds into `Absent`
//! - Config and CLI problems propagate to the caller

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for pkgfact operations.
#[derive(Debug, Error)]
pub enum FactError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A fact definition is structurally invalid.
    #[error("Invalid fact '{fact}': {message}")]
    InvalidFact { fact: String, message: String },

    /// Requested fact is not registered.
    #[error("Unknown fact: {name}")]
    UnknownFact { name: String },

    /// Query command could not be started.
    #[error("Failed to spawn '{program}': {message}")]
    SpawnFailed { program: String, message: String },

    /// Query command exceeded its timeout and was killed.
    #[error("Command '{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for pkgfact operations.
pub type Result<T> = std::result::Result<T, FactError>;
