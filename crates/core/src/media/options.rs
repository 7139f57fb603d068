//! Per-operation options and their validation.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::error::MediaError;
use super::tables::{extensions_for, is_known_extension, quoted_list, Preset, Quality};
use super::time::is_valid_time;
use super::types::{MediaType, Operation};

static EXTENSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.?\w+$").expect("valid extension regex"));

static BITRATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?[kKmM]?$").expect("valid bitrate regex"));

/// Options accepted by the mutating operations.
///
/// Every field is optional; which ones matter depends on the operation.
/// Enumerated values stay as strings until validation so a bad value is
/// reported with the full list of accepted ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOptions {
    /// `low`, `medium` or `high` (compress).
    #[serde(default)]
    pub quality: Option<String>,
    /// x264 preset name (video compress).
    #[serde(default)]
    pub speed: Option<String>,
    /// Explicit target bitrate such as `128k` or `1.5M` (compress).
    #[serde(default)]
    pub bitrate: Option<String>,
    /// Output extension, with or without a leading dot.
    #[serde(default)]
    pub extension: Option<String>,
    /// Caller-chosen output path, used verbatim.
    #[serde(default)]
    pub output_file_path: Option<String>,
    /// Cut start, `hh:mm:ss`.
    #[serde(default)]
    pub from: Option<String>,
    /// Cut end, `hh:mm:ss`.
    #[serde(default)]
    pub to: Option<String>,
    /// Volume multiplier (adjustVolume).
    #[serde(default)]
    pub rate: Option<f64>,
}

impl OperationOptions {
    /// Builds options from a JSON value. `null` yields the defaults.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, MediaError> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(_) => serde_json::from_value(value.clone())
                .map_err(|e| MediaError::invalid_options(format!("Incorrect options: {}", e))),
            _ => Err(MediaError::invalid_options(
                "Parameter \"options\" must be an object",
            )),
        }
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn with_speed(mut self, speed: impl Into<String>) -> Self {
        self.speed = Some(speed.into());
        self
    }

    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = Some(bitrate.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_output_file_path(mut self, path: impl Into<String>) -> Self {
        self.output_file_path = Some(path.into());
        self
    }

    pub fn with_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self.to = Some(to.into());
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Requested extension, lower-cased and without the leading dot.
    pub fn normalized_extension(&self) -> Option<String> {
        self.extension
            .as_deref()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
    }

    /// Parsed quality, `medium` when absent.
    pub fn quality_or_default(&self) -> Result<Quality, MediaError> {
        self.quality
            .as_deref()
            .map(str::parse::<Quality>)
            .transpose()
            .map(|q| q.unwrap_or(Quality::Medium))
            .map_err(MediaError::InvalidOptions)
    }

    /// Parsed quality, `medium` when absent or unrecognised.
    pub fn quality_or_medium(&self) -> Quality {
        self.quality_or_default().unwrap_or(Quality::Medium)
    }

    /// Parsed preset, `veryslow` when absent.
    pub fn speed_or_default(&self) -> Result<Preset, MediaError> {
        self.speed
            .as_deref()
            .map(str::parse::<Preset>)
            .transpose()
            .map(|p| p.unwrap_or(Preset::VerySlow))
            .map_err(MediaError::InvalidOptions)
    }
}

/// Registry an operation's output extension is checked against.
pub fn extension_registry(operation: Operation, media_type: MediaType) -> MediaType {
    match operation {
        Operation::ExtractAudio => MediaType::Audio,
        _ => media_type,
    }
}

/// Checks an output extension against the registry `operation` writes to.
pub fn validate_extension(
    extension: &str,
    operation: Operation,
    media_type: MediaType,
) -> Result<(), MediaError> {
    let registry = extension_registry(operation, media_type);
    let candidate = extension.trim_start_matches('.');

    if EXTENSION_REGEX.is_match(extension) && is_known_extension(candidate, registry) {
        return Ok(());
    }

    Err(MediaError::invalid_options(format!(
        "Incorrect option \"extension\". Please provide one of {}",
        quoted_list(extensions_for(registry))
    )))
}

fn validate_time(name: &str, value: Option<&str>) -> Result<(), MediaError> {
    match value {
        Some(v) if is_valid_time(v) => Ok(()),
        _ => Err(MediaError::invalid_options(format!(
            "Incorrect option \"{}\". Please provide a time in format \"hh:mm:ss\"",
            name
        ))),
    }
}

/// Checks the options relevant to `operation` on a `media_type` descriptor.
pub fn validate_options(
    options: &OperationOptions,
    operation: Operation,
    media_type: MediaType,
) -> Result<(), MediaError> {
    if let Some(extension) = options.extension.as_deref() {
        validate_extension(extension, operation, media_type)?;
    }

    match operation {
        Operation::Compress => {
            if media_type == MediaType::Video {
                options.quality_or_default()?;
                options.speed_or_default()?;
            }
            if let Some(bitrate) = options.bitrate.as_deref() {
                if !BITRATE_REGEX.is_match(bitrate) {
                    return Err(MediaError::invalid_options(
                        "Incorrect option \"bitrate\". Please provide a value like \"128k\" or \"1.5M\"",
                    ));
                }
            }
        }
        Operation::Cut => {
            validate_time("from", options.from.as_deref())?;
            validate_time("to", options.to.as_deref())?;
        }
        Operation::AdjustVolume => match options.rate {
            Some(rate) if rate.is_finite() && rate >= 0.0 => {}
            _ => {
                return Err(MediaError::invalid_options(
                    "Incorrect option \"rate\". Please provide a non-negative number",
                ))
            }
        },
        Operation::ConvertTo | Operation::ExtractAudio => {}
    }

    Ok(())
}
