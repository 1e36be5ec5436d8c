use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::artifact_store::ArtifactStore;
use crate::error::UploadError;

/// ArtifactStore implementation backed by a local directory
#[derive(Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    fn location(&self, key: &str) -> String {
        format!("file://{}", self.root.join(key).display())
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<(), UploadError> {
        let location = self.location(key);

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| UploadError::new(&location, format!("Failed to create store: {}", e)))?;

        fs::copy(path, self.root.join(key))
            .await
            .map_err(|e| UploadError::new(&location, format!("Failed to copy file: {}", e)))?;

        Ok(())
    }
}
