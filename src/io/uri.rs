use std::fmt;
use std::path::PathBuf;

use url::Url;

/// Parsed form of the `BUCKET_NAME` setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    S3 { bucket: String },
    Local(PathBuf),
    /// A value that names no usable bucket. Runs still record their
    /// artifact; the upload then fails with `reason`.
    Invalid { value: String, reason: String },
}

impl Destination {
    /// Parse a bucket name, an `s3://bucket` URI, or a `file:///dir` URI
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        // Try parsing as URL first
        if let Ok(url) = Url::parse(value) {
            return match url.scheme() {
                "s3" => {
                    let Some(bucket) = url.host_str().filter(|h| !h.is_empty()) else {
                        return invalid(value, "S3 URI missing bucket");
                    };

                    // The remote key is always the artifact file name
                    if !url.path().trim_start_matches('/').is_empty() {
                        return invalid(value, "S3 destination must not include a key");
                    }

                    Destination::S3 {
                        bucket: bucket.to_string(),
                    }
                }
                "file" => match url.to_file_path() {
                    Ok(path) => Destination::Local(path),
                    Err(_) => invalid(value, "invalid file:// URI"),
                },
                scheme => invalid(value, &format!("unsupported scheme '{}'", scheme)),
            };
        }

        // Otherwise a bare bucket name
        if value.is_empty() {
            return invalid(value, "bucket name is empty");
        }
        if value.contains('/') || value.chars().any(char::is_whitespace) {
            return invalid(value, "bucket name contains '/' or whitespace");
        }

        Destination::S3 {
            bucket: value.to_string(),
        }
    }

    /// Bucket name recorded in the run record. For a local destination this
    /// is the root directory path; for an invalid one, the raw value.
    pub fn bucket_name(&self) -> String {
        match self {
            Destination::S3 { bucket } => bucket.clone(),
            Destination::Local(root) => root.display().to_string(),
            Destination::Invalid { value, .. } => value.clone(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::S3 { bucket } => write!(f, "s3://{}", bucket),
            Destination::Local(root) => write!(f, "file://{}", root.display()),
            Destination::Invalid { value, reason } => write!(f, "{} (invalid: {})", value, reason),
        }
    }
}

fn invalid(value: &str, reason: &str) -> Destination {
    Destination::Invalid {
        value: value.to_string(),
        reason: format!("invalid bucket '{}': {}", value, reason),
    }
}
