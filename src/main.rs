// src/main.rs
use anyhow::Result;
use candle_pattern_detector::cli::{execute_command, Cli};
use candle_pattern_detector::config::Settings;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment
    dotenv::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    // Load settings: defaults, settings file, DETECTOR_* variables
    let settings = Settings::load(cli.config.as_deref())?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Execute command
    execute_command(cli, settings).await?;

    Ok(())
}
