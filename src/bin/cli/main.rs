use anyhow::{bail, Context, Result};
use bucket_teardown::{BucketName, S3StorageClient, TeardownService, TeardownServiceImpl};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bucket-teardown")]
#[command(about = "Force-delete an object storage bucket, versions and all", long_about = None)]
struct Cli {
    /// Bucket to empty and delete
    bucket: String,

    /// S3-compatible endpoint URL
    #[arg(long, env = "S3_ENDPOINT")]
    endpoint: String,

    /// Access key for the endpoint
    #[arg(long, env = "S3_ACCESS_KEY")]
    access_key: String,

    /// Secret key for the endpoint
    #[arg(long, env = "S3_SECRET_KEY")]
    secret_key: String,

    /// Confirm the irreversible deletion
    #[arg(long)]
    yes: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn init_logging(&self) -> Result<()> {
        // RUST_LOG wins over the --log-level flag when both are set
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.clone()));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    let bucket = BucketName::new(cli.bucket.clone())
        .with_context(|| format!("Invalid bucket name: {}", cli.bucket))?;

    if !cli.yes {
        bail!(
            "refusing to delete bucket '{}' without --yes; all versions and delete markers will be removed",
            bucket
        );
    }

    info!("Tearing down bucket {}", bucket);

    let client = S3StorageClient::new(&cli.endpoint, &cli.access_key, &cli.secret_key);
    let service = TeardownServiceImpl::new(Arc::new(client));

    let errors = service
        .force_delete_bucket(&bucket)
        .await
        .with_context(|| format!("Teardown of bucket '{}' failed", bucket))?;

    if errors.is_empty() {
        info!("Bucket {} emptied and deleted", bucket);
        return Ok(());
    }

    // Per-item failures: the bucket is left partially emptied and not
    // deleted. Report them and exit non-zero so callers can retry.
    eprintln!("{}", serde_json::to_string_pretty(&errors)?);
    std::process::exit(1);
}
