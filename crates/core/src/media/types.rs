//! Types for the media module.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::MediaError;
use crate::engine::StreamInformation;

/// Kind of media a descriptor manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            other => Err(format!(
                "Unknown media type {}. Please provide one of [\"audio\", \"video\"]",
                other
            )),
        }
    }
}

/// Mutating operations a descriptor can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Compress,
    ConvertTo,
    Cut,
    ExtractAudio,
    AdjustVolume,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::ConvertTo => "convertTo",
            Self::Cut => "cut",
            Self::ExtractAudio => "extractAudio",
            Self::AdjustVolume => "adjustVolume",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technical snapshot of a media file, merged from both probe calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetails {
    pub filename: String,
    pub extension: String,
    pub is_remote_media: Option<bool>,
    /// Size in bytes, from the narrow probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// First video stream width (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// First video stream height (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_long_name: Option<String>,
    #[serde(default)]
    pub streams: Vec<StreamInformation>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

/// Outcome of an input/options check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_correct: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file_path: Option<String>,
}

impl ValidationResult {
    pub fn correct(output_file_path: Option<String>) -> Self {
        Self {
            is_correct: true,
            message: String::new(),
            output_file_path,
        }
    }

    pub fn failure(error: &MediaError) -> Self {
        Self {
            is_correct: false,
            message: error.to_string(),
            output_file_path: None,
        }
    }
}

impl<T> From<&Result<T, MediaError>> for ValidationResult
where
    T: Clone + Into<Option<String>>,
{
    fn from(result: &Result<T, MediaError>) -> Self {
        match result {
            Ok(path) => Self::correct(path.clone().into()),
            Err(e) => Self::failure(e),
        }
    }
}

/// Result of a successful mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutput {
    pub output_file_path: String,
    pub return_code: i32,
}
