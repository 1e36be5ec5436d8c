//! Destinations for finished artifacts (S3 or a local directory)

pub mod artifact_store;
pub mod local_store;
pub mod s3_store;
pub mod uri;

pub use artifact_store::{ArtifactStore, InvalidDestinationStore, create_store};
pub use local_store::LocalArtifactStore;
pub use s3_store::S3ArtifactStore;
pub use uri::Destination;
