//! Error types for the engine module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the external media engine collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine binary not found.
    #[error("Engine binary not found at path: {path}")]
    NotFound { path: PathBuf },

    /// The engine ran but returned a non-zero code.
    #[error("Engine exited with code {code}")]
    NonZeroExit { code: i32, stderr: Option<String> },

    /// The running command was cancelled.
    #[error("Execution cancelled")]
    Cancelled,

    /// The command did not finish in time.
    #[error("Execution timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Failed to parse engine output.
    #[error("Failed to parse engine output: {reason}")]
    ParseError { reason: String },

    /// A raw command line could not be split into arguments.
    #[error("Malformed command: {reason}")]
    MalformedCommand { reason: String },

    /// No output location could be produced.
    #[error("Failed to generate output location: {reason}")]
    OutputLocation { reason: String },

    /// I/O error while talking to the engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a non-zero exit error, dropping empty stderr.
    pub fn non_zero_exit(code: i32, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        Self::NonZeroExit {
            code,
            stderr: if stderr.trim().is_empty() {
                None
            } else {
                Some(stderr)
            },
        }
    }

    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::ParseError {
            reason: reason.into(),
        }
    }

    pub fn malformed_command(reason: impl Into<String>) -> Self {
        Self::MalformedCommand {
            reason: reason.into(),
        }
    }

    pub fn output_location(reason: impl Into<String>) -> Self {
        Self::OutputLocation {
            reason: reason.into(),
        }
    }

    /// Return code to report for this failure, if the engine produced one.
    pub fn return_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}
