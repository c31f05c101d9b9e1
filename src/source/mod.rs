//! Trace input sources.
//!
//! Traces are read from a file when a path is given, otherwise from stdin.
//! Parsing happens at the boundary: callers get typed steps, never lines.

use crate::model::error::TraceError;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

pub mod trace;

pub use trace::{parse_trace, TraceStep};

/// Read and parse a trace from `file`, or from stdin when `None`.
///
/// # Errors
///
/// Returns `TraceError::Io` if the file cannot be opened or read, and the
/// parse errors of [`parse_trace`].
pub fn read_trace(file: Option<PathBuf>) -> Result<Vec<TraceStep>, TraceError> {
    match file {
        Some(path) => {
            let file = File::open(&path)?;
            parse_trace(BufReader::new(file))
        }
        None => parse_trace(std::io::stdin().lock()),
    }
}
