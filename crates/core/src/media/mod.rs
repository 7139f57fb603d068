//! Media operation engine.
//!
//! A [`MediaDescriptor`] tracks one audio or video file, validates
//! per-operation options, resolves output locations, and turns each
//! operation into an engine command.
//!
//! # Example
//!
//! ```ignore
//! use mediatools_core::media::{MediaDescriptor, MediaEngines, MediaType, OperationOptions};
//!
//! let engines = MediaEngines::from_config(&config.engine);
//! let mut video = MediaDescriptor::new("/storage/clip.mkv", MediaType::Video, engines);
//!
//! let details = video.get_details(false).await?;
//! println!("Duration: {:?} ms", details.duration_ms);
//!
//! let output = video
//!     .compress(&OperationOptions::default().with_quality("low").with_speed("fast"))
//!     .await?;
//! println!("Wrote {}", output.output_file_path);
//! ```

mod command;
mod descriptor;
mod details;
mod error;
mod options;
mod path;
mod strategy;
mod tables;
mod time;
mod types;

pub use command::CutWindow;
pub use descriptor::{MediaDescriptor, MediaEngines};
pub use details::SizeProbe;
pub use error::MediaError;
pub use options::{validate_options, OperationOptions};
pub use path::{is_remote_media, resolve, ResolvedPath};
pub use strategy::{CompressionPlan, TypeStrategy};
pub use tables::{
    derive_audio_bitrate, Preset, Quality, AUDIO_BITRATE_LADDER, AUDIO_EXTENSIONS,
    VIDEO_EXTENSIONS,
};
pub use time::{is_valid_time, millis_to_time, time_to_millis};
pub use types::{MediaDetails, MediaType, Operation, OperationOutput, ValidationResult};
