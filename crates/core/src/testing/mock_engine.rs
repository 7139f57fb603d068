//! Mock execution engine for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use crate::engine::{EngineError, ExecutionEngine, ExecutionResult, MediaCommand};

/// Mock implementation of the ExecutionEngine trait.
///
/// Provides controllable behavior for testing:
/// - Track executed command lines for assertions
/// - Simulate failures and slow runs
/// - Count cancel signals
///
/// # Example
///
/// ```rust,ignore
/// use mediatools_core::testing::MockExecutionEngine;
///
/// let engine = Arc::new(MockExecutionEngine::new());
/// let executor = Executor::new(engine.clone());
///
/// executor.execute_line("-i \"/in.mkv\" \"/out.mp4\"").await?;
///
/// assert_eq!(engine.command_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockExecutionEngine {
    /// Rendered command lines, in execution order.
    commands: Arc<RwLock<Vec<String>>>,
    /// If set, the next execution will fail with this error.
    next_error: Arc<RwLock<Option<EngineError>>>,
    /// Simulated execution duration in milliseconds.
    execution_duration_ms: Arc<RwLock<u64>>,
    /// Number of cancel signals received.
    cancels: AtomicUsize,
    cancel_tx: watch::Sender<u64>,
}

impl Default for MockExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutionEngine {
    /// Create a new mock engine that succeeds immediately.
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(0);
        Self {
            commands: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            execution_duration_ms: Arc::new(RwLock::new(0)),
            cancels: AtomicUsize::new(0),
            cancel_tx,
        }
    }

    /// Get all executed command lines.
    pub async fn recorded_commands(&self) -> Vec<String> {
        self.commands.read().await.clone()
    }

    /// Get the number of executions performed.
    pub async fn command_count(&self) -> usize {
        self.commands.read().await.len()
    }

    /// Last executed command line.
    pub async fn last_command(&self) -> Option<String> {
        self.commands.read().await.last().cloned()
    }

    /// Clear recorded commands.
    pub async fn clear_recorded(&self) {
        self.commands.write().await.clear();
    }

    /// Configure the next execution to fail with the given error.
    pub async fn set_next_error(&self, error: EngineError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated execution duration.
    pub async fn set_execution_duration(&self, duration: Duration) {
        *self.execution_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Number of cancel signals received so far.
    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionEngine for MockExecutionEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, command: &MediaCommand) -> Result<ExecutionResult, EngineError> {
        let mut cancel_rx = self.cancel_tx.subscribe();
        self.commands.write().await.push(command.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let duration_ms = *self.execution_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(duration_ms)) => {}
                Ok(()) = cancel_rx.changed() => return Err(EngineError::Cancelled),
            }
        }

        Ok(ExecutionResult::success(duration_ms))
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.cancel_tx.send_modify(|generation| *generation += 1);
    }
}
