//! High-level runner API.
//!
//! A run records its invocation to a timestamped artifact and then uploads
//! that artifact. Creating the artifact is the only fatal step: once the file
//! exists, the upload is always attempted exactly once and its failure is
//! reported in the returned [`UploadResult`] rather than as an error.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::artifact::{Artifact, RunRecord};
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::io::{ArtifactStore, create_store};
use crate::telemetry;

/// The argument vector of one execution, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    arguments: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// Result of the single upload attempt for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub remote_key: String,
    pub error: Option<String>,
}

/// Everything a completed run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub record: RunRecord,
    /// Absolute path of the artifact
    pub artifact_path: PathBuf,
    /// Where the artifact was (or would have been) uploaded
    pub location: String,
    pub upload: UploadResult,
}

pub struct BatchRunner {
    config: RunnerConfig,
    store: Arc<dyn ArtifactStore>,
}

impl BatchRunner {
    /// Create a runner whose store matches the configured destination
    pub async fn new(config: RunnerConfig) -> Self {
        let store = create_store(&config).await;
        Self::with_store(config, store)
    }

    pub fn with_store(config: RunnerConfig, store: Arc<dyn ArtifactStore>) -> Self {
        Self { config, store }
    }

    /// Run the invocation, stamped with the current local time
    pub async fn run(&self, invocation: &Invocation) -> Result<RunOutcome> {
        self.run_at(invocation, Local::now().naive_local()).await
    }

    /// Run the invocation as if it started at `started_at`
    pub async fn run_at(
        &self,
        invocation: &Invocation,
        started_at: NaiveDateTime,
    ) -> Result<RunOutcome> {
        let record = RunRecord::new(
            started_at,
            invocation.arguments().to_vec(),
            &self.config.output_dir,
            self.config.bucket_name(),
        );

        // Fatal on failure: no artifact means nothing to upload
        let artifact = Artifact::create(record).await?;
        info!("Artifact written to {}", artifact.path().display());

        let upload = self.upload(&artifact).await;

        match artifact.size().await {
            Ok(size) => {
                telemetry::report_disk_usage(artifact.path(), size);
            }
            Err(e) => warn!("Could not read artifact size: {}", e),
        }

        Ok(RunOutcome {
            location: self.store.location(&upload.remote_key),
            artifact_path: artifact.path().to_path_buf(),
            record: artifact.record().clone(),
            upload,
        })
    }

    async fn upload(&self, artifact: &Artifact) -> UploadResult {
        let key = artifact.key();
        info!("Uploading {} to {}", key, self.store.location(&key));

        match self.store.put_file(&key, artifact.path()).await {
            Ok(()) => {
                info!("Upload complete: {}", self.store.location(&key));
                UploadResult {
                    success: true,
                    remote_key: key,
                    error: None,
                }
            }
            Err(e) => {
                warn!("{}", e);
                UploadResult {
                    success: false,
                    remote_key: key,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Run one invocation with the given configuration
///
/// # Example
///
/// ```no_run
/// use s3_batch_runner::config::RunnerConfig;
/// use s3_batch_runner::runner::{Invocation, run_batch};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = RunnerConfig::from_env()?;
/// let outcome = run_batch(config, Invocation::new(["--mode", "fast"])).await?;
/// println!("{} -> {}", outcome.artifact_path.display(), outcome.location);
/// # Ok(())
/// # }
/// ```
pub async fn run_batch(config: RunnerConfig, invocation: Invocation) -> Result<RunOutcome> {
    BatchRunner::new(config).await.run(&invocation).await
}
