// src/cli.rs
use crate::config::Settings;
use crate::models::Interval;
use crate::patterns::{InvalidBarPolicy, PatternRecognizer};
use crate::presentation::{render_text, write_json, ScanExport};
use crate::processor::{ScanJob, ScanOutcome, Watcher, WatcherConfig};
use crate::source::{BarSource, BinanceSource, FetchRequest, FileSource};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "candle-pattern-detector")]
#[command(about = "Detect candlestick patterns in exchange kline data", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ./detector.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Stop a scan at the first invalid bar instead of skipping it
    #[arg(long, global = true)]
    pub abort_on_invalid: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch recent klines from Binance and scan them once
    Scan {
        /// Symbol (e.g., "BTCUSDT")
        #[arg(short, long)]
        symbol: Option<String>,

        /// Interval: 1m, 5m, 15m, 1h or 1d
        #[arg(short, long)]
        interval: Option<Interval>,

        /// Number of klines to fetch (1-1000)
        #[arg(short, long)]
        limit: Option<u16>,

        /// Export bars, matches and overlays to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Scan bars stored in a JSON file
    Detect {
        /// Input file holding an array of bars
        #[arg(short, long)]
        file: PathBuf,

        /// Symbol label for the report
        #[arg(short, long)]
        symbol: Option<String>,

        /// Interval label for the report: 1m, 5m, 15m, 1h or 1d
        #[arg(short, long)]
        interval: Option<Interval>,

        /// Keep only the most recent N bars (default: all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Export bars, matches and overlays to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Re-fetch and re-scan on a fixed cadence
    Watch {
        /// Symbol (e.g., "BTCUSDT")
        #[arg(short, long)]
        symbol: Option<String>,

        /// Interval: 1m, 5m, 15m, 1h or 1d
        #[arg(short, long)]
        interval: Option<Interval>,

        /// Number of klines to fetch (1-1000)
        #[arg(short, long)]
        limit: Option<u16>,

        /// Seconds between refreshes
        #[arg(long)]
        refresh_secs: Option<u64>,

        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<usize>,
    },
}

/// Build the job for a command, falling back to settings for anything not given.
pub fn resolve_job(
    settings: &Settings,
    symbol: Option<String>,
    interval: Option<Interval>,
    limit: Option<u16>,
) -> ScanJob {
    ScanJob::new(
        symbol.unwrap_or_else(|| settings.scan.symbol.clone()),
        interval.unwrap_or(settings.scan.interval),
        limit.unwrap_or(settings.scan.limit),
    )
}

fn recognizer(settings: &Settings, abort_on_invalid: bool) -> PatternRecognizer {
    let policy = if abort_on_invalid {
        InvalidBarPolicy::Abort
    } else {
        settings.scan.on_invalid_bar
    };
    PatternRecognizer::new(policy)
}

fn present(outcome: &ScanOutcome, export: Option<&PathBuf>) -> Result<()> {
    print!("{}", render_text(&outcome.series, &outcome.report));

    if let Some(export_path) = export {
        let export = ScanExport::new(&outcome.series, &outcome.report, &outcome.overlays);
        write_json(export_path, &export)?;
        println!("\nResults exported to {}.", export_path.display());
    }

    Ok(())
}

async fn scan_once<S: BarSource>(
    source: S,
    recognizer: PatternRecognizer,
    request: &FetchRequest,
    export: Option<&PathBuf>,
) -> Result<()> {
    let watcher = Watcher::new(source, recognizer, WatcherConfig::default());
    let outcome = watcher
        .run_once(request)
        .await
        .with_context(|| format!("Failed to fetch bars for {} {}", request.symbol, request.interval))?;

    present(&outcome, export)
}

/// Execute a command from the CLI
pub async fn execute_command(cli: Cli, settings: Settings) -> Result<()> {
    let recognizer = recognizer(&settings, cli.abort_on_invalid);

    match cli.command {
        Commands::Scan { symbol, interval, limit, export } => {
            let job = resolve_job(&settings, symbol, interval, limit);
            let request = job.to_request()?;
            let source = BinanceSource::new(&settings.binance)?;

            info!("Scanning {}", job.key());
            scan_once(source, recognizer, &request, export.as_ref()).await?;
        },

        Commands::Detect { file, symbol, interval, limit, export } => {
            let symbol = symbol.unwrap_or_else(|| settings.scan.symbol.clone());
            let interval = interval.unwrap_or(settings.scan.interval);
            let request = FetchRequest::local(&symbol, interval, limit)?;
            let source = FileSource::new(&file);

            info!("Scanning bars from {}", file.display());
            scan_once(source, recognizer, &request, export.as_ref()).await?;
        },

        Commands::Watch { symbol, interval, limit, refresh_secs, ticks } => {
            let job = resolve_job(&settings, symbol, interval, limit);
            let refresh_secs = refresh_secs.unwrap_or(settings.scan.refresh_secs);
            anyhow::ensure!(refresh_secs > 0, "--refresh-secs must be at least 1");

            let config = WatcherConfig {
                refresh: Duration::from_secs(refresh_secs),
                max_ticks: ticks,
            };
            let watcher = Watcher::new(BinanceSource::new(&settings.binance)?, recognizer, config);

            watcher
                .run(&job, |tick, outcome| {
                    println!("\n=== Refresh {} ===", tick);
                    print!("{}", render_text(&outcome.series, &outcome.report));
                })
                .await?;
        },
    }

    Ok(())
}
