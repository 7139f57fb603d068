//! Execution and cancellation adapter.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::error::EngineError;
use super::traits::ExecutionEngine;
use super::types::{ExecutionResult, MediaCommand};

/// Forwards commands to an [`ExecutionEngine`] and owns the cancel protocol.
///
/// A single [`cancel`](Self::cancel) issues two engine cancels back to back.
#[derive(Clone)]
pub struct Executor {
    engine: Arc<dyn ExecutionEngine>,
    timeout: Option<Duration>,
}

impl Executor {
    pub fn new(engine: Arc<dyn ExecutionEngine>) -> Self {
        Self {
            engine,
            timeout: None,
        }
    }

    /// Bounds every execution. A run that exceeds it is cancelled.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine(&self) -> &Arc<dyn ExecutionEngine> {
        &self.engine
    }

    /// Runs a command on the engine.
    pub async fn execute(&self, command: &MediaCommand) -> Result<ExecutionResult, EngineError> {
        debug!(engine = self.engine.name(), command = %command, "Executing");

        let Some(limit) = self.timeout else {
            return self.engine.execute(command).await;
        };

        match timeout(limit, self.engine.execute(command)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_secs = limit.as_secs(), command = %command, "Execution timed out");
                self.cancel();
                Err(EngineError::Timeout {
                    timeout_secs: limit.as_secs(),
                })
            }
        }
    }

    /// Parses a raw command line and runs it.
    pub async fn execute_line(&self, line: &str) -> Result<ExecutionResult, EngineError> {
        let command = MediaCommand::parse(line)?;
        self.execute(&command).await
    }

    /// Requests cancellation of the running command. Returns immediately.
    pub fn cancel(&self) {
        debug!(engine = self.engine.name(), "Cancelling execution");
        self.engine.cancel();
        self.engine.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExecutionEngine;

    #[tokio::test]
    async fn test_cancel_dispatches_twice() {
        let engine = Arc::new(MockExecutionEngine::new());
        let executor = Executor::new(engine.clone());

        executor.cancel();

        assert_eq!(engine.cancel_count(), 2);
    }

    #[tokio::test]
    async fn test_execute_forwards_command() {
        let engine = Arc::new(MockExecutionEngine::new());
        let executor = Executor::new(engine.clone());

        let result = executor.execute_line("-i \"/a.mkv\" \"/b.mp4\"").await.unwrap();

        assert_eq!(result.return_code, 0);
        let recorded = engine.recorded_commands().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0], "-i \"/a.mkv\" \"/b.mp4\"");
    }

    #[tokio::test]
    async fn test_execute_line_rejects_malformed() {
        let engine = Arc::new(MockExecutionEngine::new());
        let executor = Executor::new(engine.clone());

        let result = executor.execute_line("-i \"/a.mkv").await;

        assert!(matches!(result, Err(EngineError::MalformedCommand { .. })));
        assert_eq!(engine.command_count().await, 0);
    }

    #[tokio::test]
    async fn test_timeout_cancels_engine() {
        let engine = Arc::new(MockExecutionEngine::new());
        engine.set_execution_duration(Duration::from_secs(5)).await;
        let executor =
            Executor::new(engine.clone()).with_timeout(Some(Duration::from_millis(20)));

        let result = executor.execute(&MediaCommand::new().arg("-version")).await;

        assert!(matches!(result, Err(EngineError::Timeout { .. })));
        assert_eq!(engine.cancel_count(), 2);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_running_execution() {
        let engine = Arc::new(MockExecutionEngine::new());
        engine.set_execution_duration(Duration::from_secs(5)).await;
        let executor = Executor::new(engine.clone());

        let running = {
            let executor = executor.clone();
            tokio::spawn(async move { executor.execute(&MediaCommand::new().arg("-version")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        executor.cancel();

        let result = running.await.unwrap();
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }
}
