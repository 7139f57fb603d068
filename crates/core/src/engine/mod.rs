//! External media engine collaborators.
//!
//! The media module never spawns processes itself. It builds a
//! [`MediaCommand`] and hands it to an [`ExecutionEngine`] through the
//! [`Executor`], probes through a [`ProbeEngine`], and asks an
//! [`OutputLocationProvider`] for fresh output paths.
//!
//! # Example
//!
//! ```ignore
//! use mediatools_core::engine::{EngineConfig, Executor, FfmpegEngine, MediaCommand};
//!
//! let executor = Executor::new(Arc::new(FfmpegEngine::new(EngineConfig::default())));
//! let command = MediaCommand::new().arg("-i").quoted("/in.mkv").quoted("/out.mp4");
//! let result = executor.execute(&command).await?;
//! assert_eq!(result.return_code, 0);
//! ```

mod config;
mod error;
mod executor;
mod ffmpeg;
mod ffprobe;
mod output;
mod traits;
mod types;

pub use config::EngineConfig;
pub use error::EngineError;
pub use executor::Executor;
pub use ffmpeg::FfmpegEngine;
pub use ffprobe::FfprobeEngine;
pub use output::CacheDirOutputProvider;
pub use traits::{ExecutionEngine, OutputLocationProvider, ProbeEngine};
pub use types::{ExecutionResult, MediaCommand, MediaInformation, StreamInformation};
