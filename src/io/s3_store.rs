use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use std::sync::Arc;

use super::artifact_store::ArtifactStore;
use crate::error::UploadError;

/// ArtifactStore implementation for an S3 bucket
#[derive(Clone)]
pub struct S3ArtifactStore {
    s3_client: Arc<S3Client>,
    bucket: String,
}

impl S3ArtifactStore {
    /// Create a new S3ArtifactStore
    pub fn new(s3_client: Arc<S3Client>, bucket: String) -> Self {
        Self { s3_client, bucket }
    }

    /// Build a client from the SDK's default credential and region chain.
    ///
    /// SDK retries are disabled: a failed put is reported, not re-attempted.
    pub async fn from_env(bucket: String, region: Option<&str>, endpoint_url: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint_url {
            // Emulators generally don't resolve virtual-hosted bucket names
            s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Arc::new(S3Client::from_conf(s3_config.build())), bucket)
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<(), UploadError> {
        let location = self.location(key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| UploadError::new(&location, format!("Failed to read artifact: {}", e)))?;

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| UploadError::new(&location, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
