use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::local_store::LocalArtifactStore;
use super::s3_store::S3ArtifactStore;
use super::uri::Destination;
use crate::config::RunnerConfig;
use crate::error::UploadError;

/// Abstraction over the place finished artifacts are put.
/// Implementations attempt a put exactly once and never retry.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Human-readable location of `key`, used in logs and errors
    fn location(&self, key: &str) -> String;

    /// Store the local file at `path` under `key`
    async fn put_file(&self, key: &str, path: &Path) -> Result<(), UploadError>;
}

/// Store for a `BUCKET_NAME` that names no usable bucket: every put fails
/// with the parse reason, after the artifact has already been written.
#[derive(Clone)]
pub struct InvalidDestinationStore {
    value: String,
    reason: String,
}

impl InvalidDestinationStore {
    pub fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for InvalidDestinationStore {
    fn location(&self, key: &str) -> String {
        if self.value.contains("://") {
            format!("{}/{}", self.value.trim_end_matches('/'), key)
        } else {
            format!("s3://{}/{}", self.value, key)
        }
    }

    async fn put_file(&self, key: &str, _path: &Path) -> Result<(), UploadError> {
        Err(UploadError::new(self.location(key), self.reason.clone()))
    }
}

/// Build the store matching the configured destination
pub async fn create_store(config: &RunnerConfig) -> Arc<dyn ArtifactStore> {
    match &config.destination {
        Destination::S3 { bucket } => {
            let store = S3ArtifactStore::from_env(
                bucket.clone(),
                config.region.as_deref(),
                config.endpoint_url.as_deref(),
            )
            .await;
            Arc::new(store) as Arc<dyn ArtifactStore>
        }
        Destination::Local(root) => {
            Arc::new(LocalArtifactStore::new(root)) as Arc<dyn ArtifactStore>
        }
        Destination::Invalid { value, reason } => {
            Arc::new(InvalidDestinationStore::new(value, reason)) as Arc<dyn ArtifactStore>
        }
    }
}
