//! Error types for ssreqcheck operations.
//!
//! This module defines [`ReqCheckError`], the error type used by the tool's
//! own plumbing (running PHP, reading the thresholds file), and a [`Result`]
//! type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A failing requirement is never an error. Checks return negative
//!   [`CheckResult`](crate::checks::CheckResult)s so the report always
//!   completes.
//! - `ReqCheckError` covers the cases where the tool cannot talk to the
//!   runtime at all or cannot read its own configuration.
//! - Use `anyhow::Error` (via `ReqCheckError::Other`) for unexpected errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ssreqcheck operations.
#[derive(Debug, Error)]
pub enum ReqCheckError {
    /// The PHP binary could not be started.
    #[error("PHP runtime unavailable at {path}: {message}")]
    PhpUnavailable { path: PathBuf, message: String },

    /// A helper command ran but exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A helper command did not finish within its time budget.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// The runtime produced output that could not be understood.
    #[error("Unexpected output from {source_name}: {message}")]
    InvalidOutput {
        source_name: String,
        message: String,
    },

    /// Thresholds file not found at the given location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the thresholds file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The thresholds file parsed but holds values that cannot be used.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ssreqcheck operations.
pub type Result<T> = std::result::Result<T, ReqCheckError>;
