//! FFmpeg-based execution engine.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use super::config::EngineConfig;
use super::error::EngineError;
use super::traits::ExecutionEngine;
use super::types::{ExecutionResult, MediaCommand};

/// Runs commands through the ffmpeg binary.
///
/// Cancellation is a counter on a `watch` channel: every [`cancel`] bumps it
/// and a running [`execute`] kills its child as soon as it sees the change.
/// Cancels issued while nothing is running have no effect on later runs.
///
/// [`cancel`]: ExecutionEngine::cancel
/// [`execute`]: ExecutionEngine::execute
pub struct FfmpegEngine {
    config: EngineConfig,
    cancel_tx: watch::Sender<u64>,
}

impl FfmpegEngine {
    /// Creates a new FFmpeg engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let (cancel_tx, _) = watch::channel(0);
        Self { config, cancel_tx }
    }

    /// Creates an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Builds the full ffmpeg argument list for a command.
    fn build_args(&self, command: &MediaCommand) -> Vec<String> {
        let mut args = Vec::new();

        if self.config.overwrite_output {
            args.push("-y".to_string());
        }

        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ]);

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        args.extend(command.args().into_iter().map(str::to_string));

        args
    }

    /// Checks that the ffmpeg binary can be started.
    pub async fn validate(&self) -> Result<(), EngineError> {
        Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        Ok(())
    }

    fn spawn_error(&self, e: std::io::Error) -> EngineError {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::NotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            EngineError::Io(e)
        }
    }
}

#[async_trait]
impl ExecutionEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn execute(&self, command: &MediaCommand) -> Result<ExecutionResult, EngineError> {
        let start = Instant::now();
        let args = self.build_args(command);
        let mut cancel_rx = self.cancel_tx.subscribe();

        debug!(command = %command, "Running ffmpeg");

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stderr = child.stderr.take().expect("stderr should be captured");
        let stderr_task = tokio::spawn(async move {
            let mut reader = BufReader::new(stderr).lines();
            let mut output = String::new();
            while let Ok(Some(line)) = reader.next_line().await {
                trace!(line = %line, "ffmpeg");
                output.push_str(&line);
                output.push('\n');
            }
            output
        });

        let status = tokio::select! {
            status = child.wait() => status?,
            Ok(()) = cancel_rx.changed() => {
                warn!(command = %command, "Cancelling ffmpeg");
                let _ = child.kill().await;
                stderr_task.abort();
                return Err(EngineError::Cancelled);
            }
        };

        let error_output = stderr_task.await.unwrap_or_default();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            debug!(code, elapsed_ms, "ffmpeg failed");
            return Err(EngineError::non_zero_exit(code, error_output));
        }

        debug!(elapsed_ms, "ffmpeg finished");
        Ok(ExecutionResult::success(elapsed_ms))
    }

    fn cancel(&self) {
        self.cancel_tx.send_modify(|generation| *generation += 1);
    }
}
