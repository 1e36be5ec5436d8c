use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Runner binary isolated from the caller's AWS setup. S3 traffic goes to a
/// loopback port that refuses connections.
#[allow(deprecated)]
fn batch_runner(output_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("batch-runner").expect("cargo bin");
    cmd.current_dir(output_dir)
        .env("OUTPUT_DIR", output_dir)
        .env("AWS_REGION", "us-east-1")
        .env("AWS_ACCESS_KEY_ID", "test")
        .env("AWS_SECRET_ACCESS_KEY", "test")
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .env("AWS_CONFIG_FILE", output_dir.join("no-aws-config"))
        .env("AWS_SHARED_CREDENTIALS_FILE", output_dir.join("no-aws-credentials"))
        .env("AWS_ENDPOINT_URL", "http://127.0.0.1:1")
        .env_remove("AWS_PROFILE")
        .env_remove("AWS_SESSION_TOKEN")
        .env_remove("BUCKET_NAME");
    cmd
}

fn artifacts_in(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("out_") && name.ends_with(".txt"))
        .collect()
}

#[test]
fn records_and_uploads_to_local_store() {
    let work = tempdir().expect("tempdir");
    let store = tempdir().expect("tempdir");

    batch_runner(work.path())
        .env("BUCKET_NAME", format!("file://{}", store.path().display()))
        .args(["--mode", "fast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded: file://"));

    let artifacts = artifacts_in(work.path());
    assert_eq!(artifacts.len(), 1);

    let content = fs::read_to_string(work.path().join(&artifacts[0])).expect("artifact");
    assert_eq!(content, "Arguments passed to the script: --mode fast\n");
    assert!(store.path().join(&artifacts[0]).exists());
}

#[test]
fn flag_like_arguments_are_recorded_verbatim() {
    let work = tempdir().expect("tempdir");
    let store = tempdir().expect("tempdir");

    batch_runner(work.path())
        .env("BUCKET_NAME", format!("file://{}", store.path().display()))
        .args(["--help", "--", "-V"])
        .assert()
        .success();

    let artifacts = artifacts_in(work.path());
    let content = fs::read_to_string(work.path().join(&artifacts[0])).expect("artifact");
    assert_eq!(content, "Arguments passed to the script: --help -- -V\n");
}

#[test]
fn unreachable_bucket_still_exits_zero() {
    let work = tempdir().expect("tempdir");

    batch_runner(work.path())
        .env("BUCKET_NAME", "test-bucket")
        .arg("job-42")
        .assert()
        .success()
        .stdout(predicate::str::contains("Upload failed: s3://test-bucket/out_"));

    let artifacts = artifacts_in(work.path());
    assert_eq!(artifacts.len(), 1);
    let content = fs::read_to_string(work.path().join(&artifacts[0])).expect("artifact");
    assert_eq!(content, "Arguments passed to the script: job-42\n");
}

#[test]
fn missing_bucket_name_uses_default() {
    let work = tempdir().expect("tempdir");

    batch_runner(work.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Destination: s3://your-bucket-name"))
        .stdout(predicate::str::contains("s3://your-bucket-name/out_"));
}

#[test]
fn unwritable_output_dir_fails_without_upload() {
    let work = tempdir().expect("tempdir");
    let store = tempdir().expect("tempdir");
    let missing = work.path().join("missing");

    batch_runner(work.path())
        .env("OUTPUT_DIR", &missing)
        .env("BUCKET_NAME", format!("file://{}", store.path().display()))
        .arg("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to record invocation"));

    assert_eq!(fs::read_dir(store.path()).expect("read dir").count(), 0);
}

#[test]
fn invalid_bucket_is_a_failed_upload() {
    for bucket in ["my bucket", "s3://bucket/with/key", "gs://bucket"] {
        let work = tempdir().expect("tempdir");

        batch_runner(work.path())
            .env("BUCKET_NAME", bucket)
            .arg("job")
            .assert()
            .success()
            .stdout(predicate::str::contains("Upload failed:"));

        let artifacts = artifacts_in(work.path());
        assert_eq!(artifacts.len(), 1, "bucket {:?}", bucket);
        let content = fs::read_to_string(work.path().join(&artifacts[0])).expect("artifact");
        assert_eq!(content, "Arguments passed to the script: job\n");
    }
}

#[cfg(unix)]
#[test]
fn read_only_output_dir_fails_without_upload() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempdir().expect("tempdir");
    let store = tempdir().expect("tempdir");
    let read_only = work.path().join("read-only");
    fs::create_dir(&read_only).expect("create dir");
    fs::set_permissions(&read_only, fs::Permissions::from_mode(0o555)).expect("chmod");

    // Permission bits don't bind root
    if fs::write(read_only.join("writable-check"), b"").is_ok() {
        return;
    }

    batch_runner(work.path())
        .env("OUTPUT_DIR", &read_only)
        .env("BUCKET_NAME", format!("file://{}", store.path().display()))
        .arg("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to record invocation"));

    assert_eq!(fs::read_dir(store.path()).expect("read dir").count(), 0);
    fs::set_permissions(&read_only, fs::Permissions::from_mode(0o755)).expect("chmod");
}
