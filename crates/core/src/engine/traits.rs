//! Trait definitions for the engine collaborators.

use async_trait::async_trait;

use super::error::EngineError;
use super::types::{ExecutionResult, MediaCommand, MediaInformation};

/// Runs generated command lines against the media engine.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Runs the command to completion.
    ///
    /// A non-zero exit is reported as [`EngineError::NonZeroExit`]; a run
    /// interrupted by [`cancel`](Self::cancel) as [`EngineError::Cancelled`].
    async fn execute(&self, command: &MediaCommand) -> Result<ExecutionResult, EngineError>;

    /// Signals the running command to stop. Returns immediately.
    fn cancel(&self);
}

/// Inspects media files.
#[async_trait]
pub trait ProbeEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Full probe of container and streams.
    async fn get_media_information(&self, path: &str) -> Result<MediaInformation, EngineError>;

    /// Runs an arbitrary probe command, returning its return code.
    ///
    /// Standard output of the run is kept for [`last_command_output`](Self::last_command_output).
    async fn execute(&self, command: &MediaCommand) -> Result<i32, EngineError>;

    /// Standard output of the most recent [`execute`](Self::execute) call.
    fn last_command_output(&self) -> String;
}

/// Supplies fresh output file paths.
#[async_trait]
pub trait OutputLocationProvider: Send + Sync {
    /// Returns a new, unused path ending in `.<extension>`.
    async fn generate_file(&self, extension: &str) -> Result<String, EngineError>;
}
