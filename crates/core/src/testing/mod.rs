//! Testing utilities and mock implementations of the engine collaborators.
//!
//! The mocks let descriptor operations run end to end without ffmpeg or
//! ffprobe installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediatools_core::testing::{MockExecutionEngine, MockOutputLocation, MockProbeEngine};
//!
//! let engine = Arc::new(MockExecutionEngine::new());
//! let probe = Arc::new(MockProbeEngine::new());
//! let output = Arc::new(MockOutputLocation::default());
//!
//! // Configure probe responses
//! probe.set_default_media_information(fixtures::audio_information(Some(192), 180_000)).await;
//!
//! // Build a MediaDescriptor over the mocks...
//! ```

mod mock_engine;
mod mock_output;
mod mock_probe;

pub use mock_engine::MockExecutionEngine;
pub use mock_output::MockOutputLocation;
pub use mock_probe::{MockProbeEngine, DEFAULT_SIZE_PROBE_OUTPUT};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::HashMap;

    use crate::engine::{MediaInformation, StreamInformation};

    /// Full probe result for a 1080p H.264 video with an AAC track.
    pub fn video_information(duration_ms: u64) -> MediaInformation {
        MediaInformation {
            filename: None,
            format: Some("matroska".to_string()),
            format_long_name: Some("Matroska / WebM".to_string()),
            duration_ms: Some(duration_ms),
            start_time_ms: Some(0),
            size: Some(1024 * 1024), // 1 MB
            bitrate_kbps: Some(2_500),
            streams: vec![
                StreamInformation {
                    index: 0,
                    codec_type: Some("video".to_string()),
                    codec_name: Some("h264".to_string()),
                    width: Some(1920),
                    height: Some(1080),
                    ..Default::default()
                },
                StreamInformation {
                    index: 1,
                    codec_type: Some("audio".to_string()),
                    codec_name: Some("aac".to_string()),
                    sample_rate: Some(48_000),
                    channels: Some(2),
                    bitrate_kbps: Some(192),
                    ..Default::default()
                },
            ],
            tags: HashMap::new(),
        }
    }

    /// Full probe result for a stereo MP3 at the given bitrate.
    ///
    /// `bitrate_kbps` of `None` leaves the bitrate unknown at both container
    /// and stream level.
    pub fn audio_information(bitrate_kbps: Option<u32>, duration_ms: u64) -> MediaInformation {
        MediaInformation {
            filename: None,
            format: Some("mp3".to_string()),
            format_long_name: Some("MP2/3 (MPEG audio layer 2/3)".to_string()),
            duration_ms: Some(duration_ms),
            start_time_ms: Some(0),
            size: Some(512 * 1024),
            bitrate_kbps,
            streams: vec![StreamInformation {
                index: 0,
                codec_type: Some("audio".to_string()),
                codec_name: Some("mp3".to_string()),
                sample_rate: Some(44_100),
                channels: Some(2),
                bitrate_kbps,
                ..Default::default()
            }],
            tags: HashMap::from([("title".to_string(), "Fixture".to_string())]),
        }
    }

    /// Narrow probe output for an audio file: no video stream.
    pub fn audio_size_probe_output(size: u64) -> String {
        format!(r#"{{"programs":[],"streams":[],"format":{{"size":"{}"}}}}"#, size)
    }
}
