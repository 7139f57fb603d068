//! Error types for the media module.

use thiserror::Error;

use super::types::{MediaType, Operation};
use crate::engine::EngineError;

/// Errors surfaced by a media descriptor.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The path could not be resolved to a file name, or a remote URL is malformed.
    #[error("Incorrect input path. Please provide a valid one")]
    IncorrectInputPath,

    /// The path looked fine but probing it failed.
    #[error("An error occurred while getting input file details")]
    UnreadableInput,

    /// Options record rejected by validation.
    #[error("{0}")]
    InvalidOptions(String),

    /// A caller-supplied output path cannot be used.
    #[error("Incorrect output path. Please provide a valid one")]
    IncorrectOutputPath,

    /// The output location provider could not produce a path.
    #[error("An error occurred while generating output file: {0}")]
    OutputGenerationFailed(String),

    /// Cut bounds inconsistent with each other or with the media duration.
    #[error("{0}")]
    InvalidCutRange(String),

    /// Operation not available for this media type.
    #[error("Operation {operation} is not supported for {media_type} media")]
    UnsupportedOperation {
        operation: Operation,
        media_type: MediaType,
    },

    /// Probe collaborator failure while fetching details.
    #[error("Failed to probe media: {0}")]
    Probe(#[source] EngineError),

    /// Execution collaborator failure, passed through as-is.
    #[error(transparent)]
    Execution(EngineError),
}

impl MediaError {
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions(message.into())
    }

    pub fn invalid_cut_range(message: impl Into<String>) -> Self {
        Self::InvalidCutRange(message.into())
    }

    /// Whether the failure happened before any command was dispatched.
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, Self::Probe(_) | Self::Execution(_))
    }

    /// Whether the external engine reported a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Execution(EngineError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_failures_are_distinguishable() {
        let supplied = MediaError::IncorrectOutputPath.to_string();
        let generated = MediaError::OutputGenerationFailed("no storage".into()).to_string();
        assert_ne!(supplied, generated);
        assert!(generated.contains("generating output file"));
    }

    #[test]
    fn test_execution_error_passes_through() {
        let err = MediaError::Execution(EngineError::NonZeroExit {
            code: 1,
            stderr: None,
        });
        assert_eq!(err.to_string(), "Engine exited with code 1");
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_unsupported_operation_message() {
        let err = MediaError::UnsupportedOperation {
            operation: Operation::ExtractAudio,
            media_type: MediaType::Audio,
        };
        assert_eq!(
            err.to_string(),
            "Operation extractAudio is not supported for audio media"
        );
        assert!(err.is_validation_error());
    }
}
