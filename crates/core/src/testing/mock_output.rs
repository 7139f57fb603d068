//! Mock output location provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::{EngineError, OutputLocationProvider};

/// Hands out `<base_dir>/output-<n>.<ext>` without touching the filesystem.
#[derive(Debug)]
pub struct MockOutputLocation {
    base_dir: String,
    generated: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<EngineError>>>,
}

impl Default for MockOutputLocation {
    fn default() -> Self {
        Self::new("/mock/cache")
    }
}

impl MockOutputLocation {
    pub fn new(base_dir: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            generated: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Paths handed out so far.
    pub async fn generated(&self) -> Vec<String> {
        self.generated.read().await.clone()
    }

    /// Configure the next generation to fail with the given error.
    pub async fn set_next_error(&self, error: EngineError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl OutputLocationProvider for MockOutputLocation {
    async fn generate_file(&self, extension: &str) -> Result<String, EngineError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let mut generated = self.generated.write().await;
        let path = format!(
            "{}/output-{}.{}",
            self.base_dir,
            generated.len() + 1,
            extension.trim_start_matches('.')
        );
        generated.push(path.clone());
        Ok(path)
    }
}
