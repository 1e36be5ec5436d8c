//! Timestamped local artifacts recording one invocation.

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Timelike};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::{ARGUMENTS_LINE_PREFIX, ARTIFACT_PREFIX, ARTIFACT_SUFFIX, TIMESTAMP_FORMAT};
use crate::error::{Result, RunnerError};

/// `out_<YYYY-MM-DD_HH-MM-SS>.txt` for the given start time
pub fn artifact_file_name(started_at: &NaiveDateTime) -> String {
    format!(
        "{}{}{}",
        ARTIFACT_PREFIX,
        started_at.format(TIMESTAMP_FORMAT),
        ARTIFACT_SUFFIX
    )
}

/// The line recorded for an argument list
pub fn arguments_line(arguments: &[String]) -> String {
    format!("{}{}", ARGUMENTS_LINE_PREFIX, arguments.join(" "))
}

/// What was run, when, and where its artifact goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    /// Start time, truncated to whole seconds
    pub started_at: NaiveDateTime,
    pub arguments: Vec<String>,
    pub output_path: PathBuf,
    /// Destination bucket. For a local `file://` destination this holds the
    /// store's directory path instead.
    pub bucket: String,
}

impl RunRecord {
    pub fn new(
        started_at: NaiveDateTime,
        arguments: Vec<String>,
        output_dir: &Path,
        bucket: impl Into<String>,
    ) -> Self {
        let started_at = started_at.with_nanosecond(0).unwrap_or(started_at);
        let output_path = output_dir.join(artifact_file_name(&started_at));
        Self {
            started_at,
            arguments,
            output_path,
            bucket: bucket.into(),
        }
    }

    /// Base file name of the artifact, also used as the remote key
    pub fn file_name(&self) -> String {
        artifact_file_name(&self.started_at)
    }
}

/// A created artifact file. The file is never removed by this type, so it
/// stays inspectable whatever happens to the upload.
#[derive(Debug)]
pub struct Artifact {
    record: RunRecord,
    absolute_path: PathBuf,
}

impl Artifact {
    /// Create (or truncate) the artifact file and record the invocation's
    /// arguments in it.
    pub async fn create(record: RunRecord) -> Result<Self> {
        let path = record.output_path.clone();

        File::create(&path)
            .await
            .map_err(|e| RunnerError::io(&path, e))?;

        let absolute_path = fs::canonicalize(&path)
            .await
            .map_err(|e| RunnerError::io(&path, e))?;

        let artifact = Self {
            record,
            absolute_path,
        };
        artifact
            .append_line(&arguments_line(&artifact.record.arguments))
            .await?;

        debug!(path = %artifact.absolute_path.display(), "artifact created");
        Ok(artifact)
    }

    /// Append one line of captured output
    pub async fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.absolute_path)
            .await
            .map_err(|e| RunnerError::io(&self.absolute_path, e))?;

        file.write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| RunnerError::io(&self.absolute_path, e))?;
        file.flush()
            .await
            .map_err(|e| RunnerError::io(&self.absolute_path, e))?;

        Ok(())
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    /// Absolute path of the artifact on disk
    pub fn path(&self) -> &Path {
        &self.absolute_path
    }

    /// Remote key for the artifact
    pub fn key(&self) -> String {
        self.record.file_name()
    }

    pub async fn size(&self) -> Result<u64> {
        let metadata = fs::metadata(&self.absolute_path)
            .await
            .map_err(|e| RunnerError::io(&self.absolute_path, e))?;
        Ok(metadata.len())
    }
}
