//! Neswara Dashboard - CLI Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use nw_dashboard::cli::{self, Cli};
use nw_dashboard::config::Config;
use nw_dashboard::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    debug!(api = %config.api_base_url, "Starting Neswara dashboard");

    cli::run(cli, config).await
}
