//! samanage - command-line client for the Samanage API
//!
//! Fetches, creates, updates or deletes one kind of record and prints the
//! result to stdout. Logs go to stderr.
//!
//! # Configuration
//!
//! Credentials and endpoint can be passed as flags or through the
//! environment (or a `.env` file):
//!
//! - `SAMANAGE_USERNAME`
//! - `SAMANAGE_PASSWORD`
//! - `SAMANAGE_URI` (defaults to `https://api.samanage.com`)
//! - `SAMANAGE_TIMEOUT` (seconds, defaults to 30)
//!
//! # Usage
//!
//! ```bash
//! samanage -u admin@example.com -p secret -T hardwares -c 10 -vv
//! samanage -T incidents -I 1234 -o text
//! samanage -T hardwares -I 42 --incidents
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::fmt;

use samanage::cli::Cli;
use samanage::samanage_client::SamanageClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present so clap can read credentials from it
    dotenvy::dotenv().ok();

    let cli = Cli::parse().sanitize();

    fmt()
        .with_env_filter(cli.env_filter())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("samanage v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.config().context("Failed to load configuration")?;
    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);

    let client = SamanageClient::new(&config).context("Failed to create Samanage client")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli.run(&client, &mut out).await.context("Request failed")?;

    Ok(())
}
