//! Configuration for the batch runner
//!
//! Constants for artifact naming and logging live at the top of this module.
//! `RunnerConfig` is the explicit value handed to the runner; it is resolved
//! from environment variables once, at the binary boundary.

use std::path::PathBuf;

use derive_builder::Builder;

use crate::error::RunnerError;
use crate::io::Destination;

// ============================================================================
// Artifact Naming
// ============================================================================

pub const ARTIFACT_PREFIX: &str = "out_";

pub const ARTIFACT_SUFFIX: &str = ".txt";

/// chrono format for the artifact timestamp, second granularity
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Leading text of the single line written to every artifact
pub const ARGUMENTS_LINE_PREFIX: &str = "Arguments passed to the script: ";

// ============================================================================
// Environment
// ============================================================================

pub const BUCKET_NAME_VAR: &str = "BUCKET_NAME";

pub const OUTPUT_DIR_VAR: &str = "OUTPUT_DIR";

pub const REGION_VAR: &str = "AWS_REGION";

pub const ENDPOINT_URL_VAR: &str = "AWS_ENDPOINT_URL";

/// Placeholder bucket used when `BUCKET_NAME` is not set
pub const DEFAULT_BUCKET_NAME: &str = "your-bucket-name";

// ============================================================================
// Logging
// ============================================================================

pub const DEFAULT_LOG_FILTER: &str =
    "s3_batch_runner=info,aws_config=warn,aws_smithy_runtime=warn";

/// Runner configuration, passed to `BatchRunner::new`
#[derive(Debug, Clone, Builder)]
pub struct RunnerConfig {
    /// Where artifacts are uploaded
    pub destination: Destination,
    /// Directory the artifact is written into
    #[builder(setter(into), default = "PathBuf::from(\".\")")]
    pub output_dir: PathBuf,
    /// AWS region override; the SDK provider chain is used when unset
    #[builder(setter(into, strip_option), default)]
    pub region: Option<String>,
    /// Custom S3 endpoint (e.g. a local emulator)
    #[builder(setter(into, strip_option), default)]
    pub endpoint_url: Option<String>,
}

impl RunnerConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunnerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bucket = get(BUCKET_NAME_VAR).unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string());
        let destination = Destination::parse(&bucket);

        let mut builder = RunnerConfigBuilder::default();
        builder.destination(destination);
        if let Some(dir) = get(OUTPUT_DIR_VAR) {
            builder.output_dir(dir);
        }
        if let Some(region) = get(REGION_VAR) {
            builder.region(region);
        }
        if let Some(endpoint) = get(ENDPOINT_URL_VAR) {
            builder.endpoint_url(endpoint);
        }

        builder
            .build()
            .map_err(|e| RunnerError::Config(e.to_string()))
    }

    /// Name of the bucket recorded in the run record
    pub fn bucket_name(&self) -> String {
        self.destination.bucket_name()
    }
}
