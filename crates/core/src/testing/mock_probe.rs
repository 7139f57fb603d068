//! Mock probe engine for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

use super::fixtures;
use crate::engine::{EngineError, MediaCommand, MediaInformation, ProbeEngine};

/// Narrow-probe output returned when none is configured.
pub const DEFAULT_SIZE_PROBE_OUTPUT: &str =
    r#"{"programs":[],"streams":[{"width":1920,"height":1080}],"format":{"size":"1048576"}}"#;

/// Mock implementation of the ProbeEngine trait.
///
/// Both probe entry points count their calls so tests can assert on cache
/// behaviour. Results are configurable per path, with a fallback.
#[derive(Debug)]
pub struct MockProbeEngine {
    /// Pre-configured full probe results by path.
    media_information: Arc<RwLock<HashMap<String, MediaInformation>>>,
    /// Full probe result for unknown paths.
    default_information: Arc<RwLock<MediaInformation>>,
    /// Stdout produced by every `execute` call.
    command_output: Arc<RwLock<String>>,
    /// Stdout for commands naming a specific path, over `command_output`.
    command_outputs: Arc<RwLock<HashMap<String, String>>>,
    /// Pause after `execute` has stored its output.
    execute_delay: Arc<RwLock<Option<Duration>>>,
    /// Return code produced by every `execute` call.
    return_code: Arc<RwLock<i32>>,
    /// If set, the next probe call will fail with this error.
    next_error: Arc<RwLock<Option<EngineError>>>,
    commands: Arc<RwLock<Vec<String>>>,
    last_output: Mutex<String>,
    information_calls: AtomicUsize,
    execute_calls: AtomicUsize,
}

impl Default for MockProbeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProbeEngine {
    /// Create a new mock that reports a one minute 1080p video.
    pub fn new() -> Self {
        Self {
            media_information: Arc::new(RwLock::new(HashMap::new())),
            default_information: Arc::new(RwLock::new(fixtures::video_information(60_000))),
            command_output: Arc::new(RwLock::new(DEFAULT_SIZE_PROBE_OUTPUT.to_string())),
            command_outputs: Arc::new(RwLock::new(HashMap::new())),
            execute_delay: Arc::new(RwLock::new(None)),
            return_code: Arc::new(RwLock::new(0)),
            next_error: Arc::new(RwLock::new(None)),
            commands: Arc::new(RwLock::new(Vec::new())),
            last_output: Mutex::new(String::new()),
            information_calls: AtomicUsize::new(0),
            execute_calls: AtomicUsize::new(0),
        }
    }

    /// Set the full probe result for a specific path.
    pub async fn set_media_information(&self, path: impl Into<String>, info: MediaInformation) {
        self.media_information
            .write()
            .await
            .insert(path.into(), info);
    }

    /// Set the full probe result for paths without a specific one.
    pub async fn set_default_media_information(&self, info: MediaInformation) {
        *self.default_information.write().await = info;
    }

    /// Set the stdout and return code of subsequent `execute` calls.
    pub async fn set_command_output(&self, output: impl Into<String>, return_code: i32) {
        *self.command_output.write().await = output.into();
        *self.return_code.write().await = return_code;
    }

    /// Set the stdout of `execute` calls whose command names `path`.
    pub async fn set_command_output_for(&self, path: impl Into<String>, output: impl Into<String>) {
        self.command_outputs
            .write()
            .await
            .insert(path.into(), output.into());
    }

    /// Make `execute` pause after storing its output.
    pub async fn set_execute_delay(&self, delay: Duration) {
        *self.execute_delay.write().await = Some(delay);
    }

    /// Configure the next probe call to fail with the given error.
    pub async fn set_next_error(&self, error: EngineError) {
        *self.next_error.write().await = Some(error);
    }

    /// Executed probe command lines.
    pub async fn recorded_commands(&self) -> Vec<String> {
        self.commands.read().await.clone()
    }

    /// Number of `get_media_information` calls.
    pub fn information_calls(&self) -> usize {
        self.information_calls.load(Ordering::SeqCst)
    }

    /// Number of `execute` calls.
    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }

    /// Total probe round-trips, counting both entry points.
    pub fn round_trips(&self) -> usize {
        self.information_calls() + self.execute_calls()
    }
}

#[async_trait]
impl ProbeEngine for MockProbeEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_media_information(&self, path: &str) -> Result<MediaInformation, EngineError> {
        self.information_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        if let Some(info) = self.media_information.read().await.get(path) {
            return Ok(info.clone());
        }

        let mut info = self.default_information.read().await.clone();
        info.filename = Some(path.to_string());
        Ok(info)
    }

    async fn execute(&self, command: &MediaCommand) -> Result<i32, EngineError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        self.commands.write().await.push(command.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let line = command.to_string();
        let specific = self
            .command_outputs
            .read()
            .await
            .iter()
            .find(|(path, _)| line.contains(path.as_str()))
            .map(|(_, output)| output.clone());
        let output = match specific {
            Some(output) => output,
            None => self.command_output.read().await.clone(),
        };
        match self.last_output.lock() {
            Ok(mut guard) => *guard = output,
            Err(poisoned) => *poisoned.into_inner() = output,
        }

        let delay = *self.execute_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(*self.return_code.read().await)
    }

    fn last_command_output(&self) -> String {
        match self.last_output.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
