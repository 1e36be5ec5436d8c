use std::path::PathBuf;

use thiserror::Error;

/// Failure to put an artifact into the destination store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Upload to {location} failed: {message}")]
pub struct UploadError {
    pub location: String,
    pub message: String,
}

impl UploadError {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Artifact I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RunnerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RunnerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
