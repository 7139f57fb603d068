//! Narrow probe parsing and details assembly.

use serde::Deserialize;

use super::path::ResolvedPath;
use super::types::MediaDetails;
use crate::engine::{EngineError, MediaInformation};

/// Size and first video stream dimensions from the narrow probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeProbe {
    pub size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// ffprobe reports numbers as strings in `format`, as numbers in `streams`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(u64),
    Text(String),
}

impl Number {
    fn value(&self) -> Option<u64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
        }
    }
}

impl SizeProbe {
    pub fn parse(output: &str) -> Result<Self, EngineError> {
        #[derive(Deserialize)]
        struct Output {
            #[serde(default)]
            streams: Vec<Stream>,
            format: Option<Format>,
        }

        #[derive(Deserialize)]
        struct Stream {
            size: Option<Number>,
            width: Option<u32>,
            height: Option<u32>,
        }

        #[derive(Deserialize)]
        struct Format {
            size: Option<Number>,
        }

        let parsed: Output = serde_json::from_str(output).map_err(|e| {
            EngineError::parse_error(format!("invalid size probe output: {}", e))
        })?;

        let stream = parsed.streams.first();
        let size = parsed
            .format
            .as_ref()
            .and_then(|f| f.size.as_ref())
            .and_then(Number::value)
            .or_else(|| stream.and_then(|s| s.size.as_ref()).and_then(Number::value));

        Ok(Self {
            size,
            width: stream.and_then(|s| s.width),
            height: stream.and_then(|s| s.height),
        })
    }
}

/// Combines both probe results with the descriptor's identity.
pub fn merge(identity: &ResolvedPath, narrow: SizeProbe, full: MediaInformation) -> MediaDetails {
    let video = full.video_stream();
    let width = narrow.width.or_else(|| video.and_then(|s| s.width));
    let height = narrow.height.or_else(|| video.and_then(|s| s.height));

    MediaDetails {
        filename: identity.filename.clone(),
        extension: identity.extension.clone(),
        is_remote_media: identity.is_remote_media,
        size: narrow.size.or(full.size),
        width,
        height,
        duration_ms: full.duration_ms,
        start_time_ms: full.start_time_ms,
        bitrate_kbps: full.bitrate_kbps,
        format: full.format,
        format_long_name: full.format_long_name,
        streams: full.streams,
        tags: full.tags,
    }
}
