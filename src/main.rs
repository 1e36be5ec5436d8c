use anyhow::Context;
use s3_batch_runner::config::{DEFAULT_LOG_FILTER, RunnerConfig};
use s3_batch_runner::runner::{Invocation, run_batch};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default filter
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Every argument is recorded as given; nothing is parsed as a flag
    let invocation = Invocation::new(
        std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned()),
    );

    let config = RunnerConfig::from_env().context("Failed to load configuration")?;

    println!("Batch Runner");
    println!("============");
    println!("Destination: {}", config.destination);
    println!("Output dir: {}", config.output_dir.display());
    println!();

    let outcome = run_batch(config, invocation)
        .await
        .context("Failed to record invocation")?;

    println!("Artifact: {}", outcome.artifact_path.display());
    if outcome.upload.success {
        println!("Uploaded: {}", outcome.location);
    } else {
        // Reported only; the run itself still completed
        println!("Upload failed: {}", outcome.location);
        if let Some(ref error) = outcome.upload.error {
            println!("  {}", error);
        }
    }

    Ok(())
}
