//! Configuration for the engine collaborators.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ffmpeg/ffprobe collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Directory where generated output files are placed.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Upper bound for a single execution. No limit when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Additional global ffmpeg arguments, placed before the operation's own.
    #[serde(default)]
    pub extra_ffmpeg_args: Vec<String>,

    /// Pass `-y` so existing outputs are replaced without prompting.
    #[serde(default = "default_overwrite")]
    pub overwrite_output: bool,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("mediatools")
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_overwrite() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            cache_dir: default_cache_dir(),
            timeout_secs: None,
            ffmpeg_log_level: default_log_level(),
            extra_ffmpeg_args: Vec::new(),
            overwrite_output: default_overwrite(),
        }
    }
}

impl EngineConfig {
    /// Creates a new config with custom ffmpeg/ffprobe paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            ..Default::default()
        }
    }

    /// Sets the output cache directory.
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    /// Sets the execution timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.timeout_secs, None);
        assert!(config.overwrite_output);
        assert!(config.cache_dir.ends_with("mediatools"));
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::with_paths(
            PathBuf::from("/opt/ffmpeg/bin/ffmpeg"),
            PathBuf::from("/opt/ffmpeg/bin/ffprobe"),
        )
        .with_cache_dir(PathBuf::from("/tmp/outputs"))
        .with_timeout(600);

        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/outputs"));
        assert_eq!(config.timeout_secs, Some(600));
    }
}
