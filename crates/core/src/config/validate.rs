use super::{types::Config, ConfigError};

const FFMPEG_LOG_LEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

/// Validate configuration
/// Currently validates:
/// - Engine binary paths are not empty
/// - ffmpeg log level is one ffmpeg accepts
/// - A configured timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let engine = &config.engine;

    if engine.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "engine.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    if engine.ffprobe_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "engine.ffprobe_path cannot be empty".to_string(),
        ));
    }

    if !FFMPEG_LOG_LEVELS.contains(&engine.ffmpeg_log_level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "engine.ffmpeg_log_level must be one of {}",
            FFMPEG_LOG_LEVELS.join(", ")
        )));
    }

    if engine.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "engine.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_timeout_zero_fails() {
        let config = Config {
            engine: EngineConfig::default().with_timeout(0),
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = Config::default();
        config.engine.ffmpeg_log_level = "loud".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("warning"));
    }

    #[test]
    fn test_validate_empty_binary_path() {
        let mut config = Config::default();
        config.engine.ffprobe_path = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }
}
