//! Static registries: known extensions, the audio bitrate ladder and the
//! compression enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::types::MediaType;

/// Audio container extensions accepted as-is.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "aac", "ac3", "aiff", "amr", "flac", "m4a", "mp3", "oga", "ogg", "opus", "wav", "wma",
];

/// Video container extensions accepted as-is.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "avi", "flv", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "ogv", "ts", "webm", "wmv",
];

pub const DEFAULT_AUDIO_EXTENSION: &str = "mp3";
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// Standard audio bitrates in kbps, highest first.
pub const AUDIO_BITRATE_LADDER: &[u32] = &[256, 192, 160, 128, 96, 64, 32];

/// Bitrate used for audio compression when the input bitrate is unknown.
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 96;

/// Returns the extension registry for a media type.
pub fn extensions_for(media_type: MediaType) -> &'static [&'static str] {
    match media_type {
        MediaType::Audio => AUDIO_EXTENSIONS,
        MediaType::Video => VIDEO_EXTENSIONS,
    }
}

/// Returns the fallback extension for a media type.
pub fn default_extension(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Audio => DEFAULT_AUDIO_EXTENSION,
        MediaType::Video => DEFAULT_VIDEO_EXTENSION,
    }
}

/// Case-insensitive registry lookup.
pub fn is_known_extension(extension: &str, media_type: MediaType) -> bool {
    let lower = extension.to_ascii_lowercase();
    extensions_for(media_type).contains(&lower.as_str())
}

/// Renders a value list as `["a", "b", "c"]` for error messages.
pub fn quoted_list(values: &[&str]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
    format!("[{}]", items.join(", "))
}

/// Output quality requested for compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Low, Quality::Medium, Quality::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Constant rate factor for libx264.
    pub fn crf(&self) -> u8 {
        match self {
            Self::Low => 28,
            Self::Medium => 23,
            Self::High => 18,
        }
    }

    /// Extra rungs to walk down the audio bitrate ladder.
    pub fn ladder_steps(&self) -> usize {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|q| q.as_str()).collect()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Incorrect option \"quality\". Please provide one of {}",
                    quoted_list(&Self::names())
                )
            })
    }
}

/// x264 encoder preset, slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    VerySlow,
    Slower,
    Slow,
    Medium,
    Fast,
    Faster,
    VeryFast,
    SuperFast,
    UltraFast,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::VerySlow,
        Preset::Slower,
        Preset::Slow,
        Preset::Medium,
        Preset::Fast,
        Preset::Faster,
        Preset::VeryFast,
        Preset::SuperFast,
        Preset::UltraFast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerySlow => "veryslow",
            Self::Slower => "slower",
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
            Self::Faster => "faster",
            Self::VeryFast => "veryfast",
            Self::SuperFast => "superfast",
            Self::UltraFast => "ultrafast",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.as_str()).collect()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Incorrect option \"speed\". Please provide one of {}",
                    quoted_list(&Self::names())
                )
            })
    }
}

/// Picks an audio target bitrate below `current_kbps`.
///
/// Takes the first ladder rung strictly below the current bitrate, then walks
/// `quality.ladder_steps()` further rungs down, stopping at the last rung.
/// Without a known bitrate the result is [`DEFAULT_AUDIO_BITRATE_KBPS`].
pub fn derive_audio_bitrate(current_kbps: Option<u32>, quality: Quality) -> u32 {
    let Some(current) = current_kbps else {
        return DEFAULT_AUDIO_BITRATE_KBPS;
    };

    let last = AUDIO_BITRATE_LADDER.len() - 1;
    let first_below = AUDIO_BITRATE_LADDER
        .iter()
        .position(|&rung| rung < current)
        .unwrap_or(last);

    let index = (first_below + quality.ladder_steps()).min(last);
    AUDIO_BITRATE_LADDER[index]
}
