//! FFprobe-based probe engine.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::process::Command;
use tracing::debug;

use super::config::EngineConfig;
use super::error::EngineError;
use super::traits::ProbeEngine;
use super::types::{MediaCommand, MediaInformation, StreamInformation};

/// Probes media through the ffprobe binary.
pub struct FfprobeEngine {
    config: EngineConfig,
    last_output: Mutex<String>,
}

impl FfprobeEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            last_output: Mutex::new(String::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    fn spawn_error(&self, e: std::io::Error) -> EngineError {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::NotFound {
                path: self.config.ffprobe_path.clone(),
            }
        } else {
            EngineError::Io(e)
        }
    }

    fn set_last_output(&self, output: String) {
        match self.last_output.lock() {
            Ok(mut guard) => *guard = output,
            Err(poisoned) => *poisoned.into_inner() = output,
        }
    }

    /// Parses `-print_format json -show_format -show_streams` output.
    pub fn parse_probe_output(output: &str) -> Result<MediaInformation, EngineError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: Option<ProbeFormat>,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            filename: Option<String>,
            format_name: Option<String>,
            format_long_name: Option<String>,
            duration: Option<String>,
            start_time: Option<String>,
            size: Option<String>,
            bit_rate: Option<String>,
            #[serde(default)]
            tags: HashMap<String, String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            #[serde(default)]
            index: u32,
            codec_type: Option<String>,
            codec_name: Option<String>,
            codec_long_name: Option<String>,
            width: Option<u32>,
            height: Option<u32>,
            sample_rate: Option<String>,
            channels: Option<u32>,
            bit_rate: Option<String>,
        }

        let probe: ProbeOutput = serde_json::from_str(output)
            .map_err(|e| EngineError::parse_error(format!("invalid ffprobe output: {}", e)))?;

        let format = probe
            .format
            .ok_or_else(|| EngineError::parse_error("ffprobe output has no format section"))?;

        let streams = probe
            .streams
            .into_iter()
            .map(|s| StreamInformation {
                index: s.index,
                codec_type: s.codec_type,
                codec_name: s.codec_name,
                codec_long_name: s.codec_long_name,
                width: s.width,
                height: s.height,
                sample_rate: s.sample_rate.as_deref().and_then(|r| r.parse().ok()),
                channels: s.channels,
                bitrate_kbps: s.bit_rate.as_deref().and_then(bits_to_kbps),
            })
            .collect();

        Ok(MediaInformation {
            filename: format.filename,
            format: format
                .format_name
                .as_deref()
                .and_then(|n| n.split(',').next())
                .map(str::to_string),
            format_long_name: format.format_long_name,
            duration_ms: format.duration.as_deref().and_then(seconds_to_millis),
            start_time_ms: format.start_time.as_deref().and_then(seconds_to_millis),
            size: format.size.as_deref().and_then(|s| s.parse().ok()),
            bitrate_kbps: format.bit_rate.as_deref().and_then(bits_to_kbps),
            streams,
            tags: format.tags,
        })
    }
}

/// `"12.345"` seconds to milliseconds. Negative and non-numeric values are dropped.
fn seconds_to_millis(value: &str) -> Option<u64> {
    let secs = value.parse::<f64>().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some((secs * 1000.0).round() as u64)
}

fn bits_to_kbps(value: &str) -> Option<u32> {
    value.parse::<u64>().ok().map(|b| (b / 1000) as u32)
}

#[async_trait]
impl ProbeEngine for FfprobeEngine {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn get_media_information(&self, path: &str) -> Result<MediaInformation, EngineError> {
        debug!(path, "Probing media");

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(EngineError::non_zero_exit(
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Self::parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn execute(&self, command: &MediaCommand) -> Result<i32, EngineError> {
        debug!(command = %command, "Running ffprobe");

        let output = Command::new(&self.config.ffprobe_path)
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        self.set_last_output(String::from_utf8_lossy(&output.stdout).into_owned());
        Ok(output.status.code().unwrap_or(-1))
    }

    fn last_command_output(&self) -> String {
        match self.last_output.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
