//! Types for the engine module.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CommandArg {
    value: String,
    quoted: bool,
}

/// An engine invocation, kept as discrete arguments.
///
/// `Display` renders the single command-line form with path arguments in
/// double quotes, e.g. `-i "/in.mkv" "/out.mp4"`. The process spawner uses
/// [`MediaCommand::args`], which never contains the quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCommand {
    args: Vec<CommandArg>,
}

impl MediaCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plain argument.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(CommandArg {
            value: value.into(),
            quoted: false,
        });
        self
    }

    /// Appends an argument rendered in double quotes (paths, filters).
    pub fn quoted(mut self, value: impl Into<String>) -> Self {
        self.args.push(CommandArg {
            value: value.into(),
            quoted: true,
        });
        self
    }

    /// Raw argument values, without quoting.
    pub fn args(&self) -> Vec<&str> {
        self.args.iter().map(|a| a.value.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Splits a command line on whitespace, keeping double-quoted runs together.
    pub fn parse(line: &str) -> Result<Self, EngineError> {
        let mut command = Self::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut was_quoted = false;
        let mut pending = false;

        for c in line.chars() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    was_quoted = true;
                    pending = true;
                }
                c if c.is_whitespace() && !in_quotes => {
                    if pending {
                        command.args.push(CommandArg {
                            value: std::mem::take(&mut current),
                            quoted: was_quoted,
                        });
                        was_quoted = false;
                        pending = false;
                    }
                }
                c => {
                    current.push(c);
                    pending = true;
                }
            }
        }

        if in_quotes {
            return Err(EngineError::malformed_command("unterminated quote"));
        }
        if pending {
            command.args.push(CommandArg {
                value: current,
                quoted: was_quoted,
            });
        }
        if command.is_empty() {
            return Err(EngineError::malformed_command("empty command"));
        }

        Ok(command)
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if arg.quoted {
                write!(f, "\"{}\"", arg.value)?;
            } else {
                f.write_str(&arg.value)?;
            }
        }
        Ok(())
    }
}

/// Result of a finished engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub return_code: i32,
    /// Wall-clock time of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl ExecutionResult {
    pub fn success(elapsed_ms: u64) -> Self {
        Self {
            return_code: 0,
            elapsed_ms,
        }
    }
}

/// Per-stream data reported by a full probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInformation {
    pub index: u32,
    /// `audio`, `video`, `subtitle`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
}

impl StreamInformation {
    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    pub fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }
}

/// Container-level data reported by a full probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInformation {
    pub filename: Option<String>,
    pub format: Option<String>,
    pub format_long_name: Option<String>,
    pub duration_ms: Option<u64>,
    pub start_time_ms: Option<u64>,
    pub size: Option<u64>,
    pub bitrate_kbps: Option<u32>,
    pub streams: Vec<StreamInformation>,
    pub tags: HashMap<String, String>,
}

impl MediaInformation {
    /// First video stream, if any.
    pub fn video_stream(&self) -> Option<&StreamInformation> {
        self.streams.iter().find(|s| s.is_video())
    }

    /// First audio stream, if any.
    pub fn audio_stream(&self) -> Option<&StreamInformation> {
        self.streams.iter().find(|s| s.is_audio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_paths() {
        let command = MediaCommand::new()
            .arg("-i")
            .quoted("/storage/my clip.mkv")
            .quoted("/cache/out.mp4");
        assert_eq!(
            command.to_string(),
            "-i \"/storage/my clip.mkv\" \"/cache/out.mp4\""
        );
        assert_eq!(
            command.args(),
            vec!["-i", "/storage/my clip.mkv", "/cache/out.mp4"]
        );
    }

    #[test]
    fn test_parse_keeps_quoted_runs() {
        let command =
            MediaCommand::parse("-ss 00:00:10 -i \"/in dir/a.mp4\"  -c copy \"/out.mp4\"").unwrap();
        assert_eq!(
            command.args(),
            vec!["-ss", "00:00:10", "-i", "/in dir/a.mp4", "-c", "copy", "/out.mp4"]
        );
        assert_eq!(
            command.to_string(),
            "-ss 00:00:10 -i \"/in dir/a.mp4\" -c copy \"/out.mp4\""
        );
    }

    #[test]
    fn test_parse_empty_quotes_yield_empty_arg() {
        let command = MediaCommand::parse("-metadata title=\"\" \"\"").unwrap();
        assert_eq!(command.args(), vec!["-metadata", "title=", ""]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            MediaCommand::parse("-i \"/in.mp4"),
            Err(EngineError::MalformedCommand { .. })
        ));
        assert!(matches!(
            MediaCommand::parse("   "),
            Err(EngineError::MalformedCommand { .. })
        ));
    }

    #[test]
    fn test_media_information_stream_lookup() {
        let info = MediaInformation {
            streams: vec![
                StreamInformation {
                    index: 0,
                    codec_type: Some("audio".to_string()),
                    ..Default::default()
                },
                StreamInformation {
                    index: 1,
                    codec_type: Some("video".to_string()),
                    width: Some(1280),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(info.video_stream().map(|s| s.index), Some(1));
        assert_eq!(info.audio_stream().map(|s| s.index), Some(0));
    }
}
