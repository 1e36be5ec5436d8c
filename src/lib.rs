// Public API
pub mod config;
pub mod error;
pub mod runner;

// Internal modules
mod artifact;
mod io;
mod telemetry;

pub use artifact::RunRecord;
pub use io::{ArtifactStore, Destination, LocalArtifactStore, S3ArtifactStore};
