//! Output location generation.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use super::error::EngineError;
use super::traits::OutputLocationProvider;

/// Places outputs in a cache directory as `<uuid>.<extension>`.
#[derive(Debug, Clone)]
pub struct CacheDirOutputProvider {
    cache_dir: PathBuf,
}

impl CacheDirOutputProvider {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }
}

#[async_trait]
impl OutputLocationProvider for CacheDirOutputProvider {
    async fn generate_file(&self, extension: &str) -> Result<String, EngineError> {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(EngineError::output_location("empty extension"));
        }

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| {
                EngineError::output_location(format!(
                    "cannot create {}: {}",
                    self.cache_dir.display(),
                    e
                ))
            })?;

        let path = self
            .cache_dir
            .join(format!("{}.{}", Uuid::new_v4(), extension));
        debug!(path = %path.display(), "Generated output location");

        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[tokio::test]
    async fn test_generate_file_creates_dir_and_unique_names() {
        let temp = tempfile::tempdir().unwrap();
        let cache_dir = temp.path().join("nested").join("cache");
        let provider = CacheDirOutputProvider::new(&cache_dir);

        let first = provider.generate_file("mp4").await.unwrap();
        let second = provider.generate_file(".mp4").await.unwrap();

        assert!(cache_dir.is_dir());
        assert_ne!(first, second);
        for path in [&first, &second] {
            let path = Path::new(path);
            assert_eq!(path.parent(), Some(cache_dir.as_path()));
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
        }
    }

    #[tokio::test]
    async fn test_generate_file_fails_when_dir_is_a_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let provider = CacheDirOutputProvider::new(temp.path().join("sub"));

        let result = provider.generate_file("mp3").await;
        assert!(matches!(result, Err(EngineError::OutputLocation { .. })));
    }

    #[tokio::test]
    async fn test_generate_file_rejects_empty_extension() {
        let provider = CacheDirOutputProvider::new(std::env::temp_dir());
        assert!(provider.generate_file("").await.is_err());
    }
}
