//! Error types for scrollwatch.
//!
//! The tracking core itself is total: registering, unregistering and
//! routing signals never fail. Errors only exist at the edges, where the
//! binary loads configuration, installs logging, and reads signal traces.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber installation failures
//!   - [`TraceError`] - Trace input read/parse failures

use crate::config::ConfigError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// Domain-specific errors convert via `From`, so `?` composes cleanly in
/// `main`.
///
/// # Examples
///
/// ```
/// use scrollwatch::model::error::{AppError, TraceError};
///
/// fn run() -> Result<(), AppError> {
///     let parsed: Result<(), TraceError> = Err(TraceError::Empty);
///     // TraceError automatically converts to AppError via From
///     parsed?;
///     Ok(())
/// }
/// assert!(run().unwrap_err().to_string().contains("no steps"));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// The signal trace could not be read or parsed.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Writing the report failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered while reading a JSON-lines signal trace.
///
/// Every parse variant carries the 1-based line number so the offending
/// step can be located in the trace file.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Reading the trace source failed.
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid trace step.
    #[error("Invalid trace step at line {line}: {message}")]
    InvalidStep {
        /// 1-based line number.
        line: usize,
        /// Parser error message.
        message: String,
    },

    /// The trace contained no steps at all.
    #[error("Trace contains no steps")]
    Empty,
}
