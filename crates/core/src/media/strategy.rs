//! Audio and video specific behaviour.

use super::error::MediaError;
use super::options::OperationOptions;
use super::tables::{derive_audio_bitrate, Preset, DEFAULT_AUDIO_EXTENSION, DEFAULT_VIDEO_EXTENSION};
use super::types::{MediaDetails, MediaType, Operation};

/// Encoder settings chosen for a compress run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionPlan {
    Video {
        crf: u8,
        preset: Preset,
        bitrate: Option<String>,
    },
    Audio {
        bitrate: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoStrategy;

/// Per-type behaviour of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeStrategy {
    Audio(AudioStrategy),
    Video(VideoStrategy),
}

/// A bare number is read as kbps.
fn normalize_bitrate(bitrate: &str) -> String {
    if bitrate.ends_with(|c: char| c.is_ascii_digit()) {
        format!("{}k", bitrate)
    } else {
        bitrate.to_string()
    }
}

impl AudioStrategy {
    fn compression_plan(
        &self,
        options: &OperationOptions,
        details: Option<&MediaDetails>,
    ) -> Result<CompressionPlan, MediaError> {
        let quality = options.quality_or_medium();

        if let Some(explicit) = options.bitrate.as_deref() {
            return Ok(CompressionPlan::Audio {
                bitrate: normalize_bitrate(explicit),
            });
        }

        let current = details.and_then(|d| {
            d.streams
                .iter()
                .find(|s| s.is_audio())
                .and_then(|s| s.bitrate_kbps)
                .or(d.bitrate_kbps)
        });

        Ok(CompressionPlan::Audio {
            bitrate: format!("{}k", derive_audio_bitrate(current, quality)),
        })
    }
}

impl VideoStrategy {
    fn compression_plan(&self, options: &OperationOptions) -> Result<CompressionPlan, MediaError> {
        let quality = options.quality_or_default()?;
        let preset = options.speed_or_default()?;

        Ok(CompressionPlan::Video {
            crf: quality.crf(),
            preset,
            bitrate: options.bitrate.as_deref().map(normalize_bitrate),
        })
    }
}

impl TypeStrategy {
    pub fn for_type(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Audio => Self::Audio(AudioStrategy),
            MediaType::Video => Self::Video(VideoStrategy),
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Audio(_) => MediaType::Audio,
            Self::Video(_) => MediaType::Video,
        }
    }

    /// Whether `operation` can run on this media type.
    pub fn supports(&self, operation: Operation) -> bool {
        !matches!(
            (self, operation),
            (Self::Audio(_), Operation::ExtractAudio) | (Self::Video(_), Operation::AdjustVolume)
        )
    }

    pub fn ensure_supported(&self, operation: Operation) -> Result<(), MediaError> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(MediaError::UnsupportedOperation {
                operation,
                media_type: self.media_type(),
            })
        }
    }

    /// Output extension used when the caller does not pick one.
    pub fn default_output_extension(&self, operation: Operation, current: &str) -> String {
        match (self, operation) {
            (_, Operation::ExtractAudio) => DEFAULT_AUDIO_EXTENSION.to_string(),
            (Self::Audio(_), Operation::ConvertTo) => DEFAULT_AUDIO_EXTENSION.to_string(),
            (Self::Video(_), Operation::ConvertTo) => DEFAULT_VIDEO_EXTENSION.to_string(),
            _ => current.to_string(),
        }
    }

    /// Picks encoder settings for compress.
    pub fn compression_plan(
        &self,
        options: &OperationOptions,
        details: Option<&MediaDetails>,
    ) -> Result<CompressionPlan, MediaError> {
        match self {
            Self::Audio(audio) => audio.compression_plan(options, details),
            Self::Video(video) => video.compression_plan(options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StreamInformation;
    use std::collections::HashMap;

    fn audio_details(stream_kbps: Option<u32>, container_kbps: Option<u32>) -> MediaDetails {
        MediaDetails {
            filename: "song".to_string(),
            extension: "mp3".to_string(),
            is_remote_media: Some(false),
            size: None,
            width: None,
            height: None,
            duration_ms: Some(180_000),
            start_time_ms: None,
            bitrate_kbps: container_kbps,
            format: Some("mp3".to_string()),
            format_long_name: None,
            streams: vec![StreamInformation {
                index: 0,
                codec_type: Some("audio".to_string()),
                bitrate_kbps: stream_kbps,
                ..Default::default()
            }],
            tags: HashMap::new(),
        }
    }

    #[test]
    fn test_supported_operations() {
        let audio = TypeStrategy::for_type(MediaType::Audio);
        let video = TypeStrategy::for_type(MediaType::Video);

        assert!(!audio.supports(Operation::ExtractAudio));
        assert!(audio.supports(Operation::AdjustVolume));
        assert!(video.supports(Operation::ExtractAudio));
        assert!(!video.supports(Operation::AdjustVolume));
        assert!(matches!(
            video.ensure_supported(Operation::AdjustVolume),
            Err(MediaError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_default_output_extensions() {
        let audio = TypeStrategy::for_type(MediaType::Audio);
        let video = TypeStrategy::for_type(MediaType::Video);

        assert_eq!(video.default_output_extension(Operation::ConvertTo, "mkv"), "mp4");
        assert_eq!(audio.default_output_extension(Operation::ConvertTo, "flac"), "mp3");
        assert_eq!(video.default_output_extension(Operation::ExtractAudio, "mkv"), "mp3");
        assert_eq!(video.default_output_extension(Operation::Compress, "mkv"), "mkv");
        assert_eq!(audio.default_output_extension(Operation::Cut, "ogg"), "ogg");
    }

    #[test]
    fn test_video_plan_defaults() {
        let plan = TypeStrategy::for_type(MediaType::Video)
            .compression_plan(&OperationOptions::default(), None)
            .unwrap();
        assert_eq!(
            plan,
            CompressionPlan::Video {
                crf: 23,
                preset: Preset::VerySlow,
                bitrate: None
            }
        );
    }

    #[test]
    fn test_video_plan_with_bitrate() {
        let options = OperationOptions::default()
            .with_quality("high")
            .with_speed("fast")
            .with_bitrate("800");
        let plan = TypeStrategy::for_type(MediaType::Video)
            .compression_plan(&options, None)
            .unwrap();
        assert_eq!(
            plan,
            CompressionPlan::Video {
                crf: 18,
                preset: Preset::Fast,
                bitrate: Some("800k".to_string())
            }
        );
    }

    #[test]
    fn test_audio_plan_walks_ladder() {
        let strategy = TypeStrategy::for_type(MediaType::Audio);
        let details = audio_details(Some(150), Some(320));

        let plan = strategy
            .compression_plan(&OperationOptions::default(), Some(&details))
            .unwrap();
        assert_eq!(
            plan,
            CompressionPlan::Audio {
                bitrate: "96k".to_string()
            }
        );
    }

    #[test]
    fn test_audio_plan_unrecognised_quality_steps_as_medium() {
        let strategy = TypeStrategy::for_type(MediaType::Audio);
        let details = audio_details(Some(150), None);
        let options = OperationOptions::default().with_quality("ultra");

        let plan = strategy.compression_plan(&options, Some(&details)).unwrap();
        assert_eq!(
            plan,
            CompressionPlan::Audio {
                bitrate: "96k".to_string()
            }
        );
    }

    #[test]
    fn test_audio_plan_falls_back_to_container_bitrate() {
        let strategy = TypeStrategy::for_type(MediaType::Audio);
        let details = audio_details(None, Some(256));
        let options = OperationOptions::default().with_quality("high");

        let plan = strategy.compression_plan(&options, Some(&details)).unwrap();
        assert_eq!(
            plan,
            CompressionPlan::Audio {
                bitrate: "192k".to_string()
            }
        );
    }

    #[test]
    fn test_audio_plan_unknown_bitrate_and_override() {
        let strategy = TypeStrategy::for_type(MediaType::Audio);

        let plan = strategy
            .compression_plan(&OperationOptions::default(), Some(&audio_details(None, None)))
            .unwrap();
        assert_eq!(
            plan,
            CompressionPlan::Audio {
                bitrate: "96k".to_string()
            }
        );

        let options = OperationOptions::default().with_bitrate("48k");
        let plan = strategy
            .compression_plan(&options, Some(&audio_details(Some(320), None)))
            .unwrap();
        assert_eq!(
            plan,
            CompressionPlan::Audio {
                bitrate: "48k".to_string()
            }
        );
    }
}
