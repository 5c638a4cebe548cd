use crate::error::SourceError;
use crate::models::CandleSeries;
use crate::patterns::{PatternRecognizer, ScanReport};
use crate::presentation::{build_overlays, PatternOverlay};
use crate::processor::job::ScanJob;
use crate::source::{BarSource, FetchRequest};
use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

// Watcher configuration
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub refresh: Duration,
    /// Stop after this many ticks; `None` runs until Ctrl-C
    pub max_ticks: Option<usize>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(15),
            max_ticks: None,
        }
    }
}

/// Result of one fetch-scan pass.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub series: CandleSeries,
    pub report: ScanReport,
    pub overlays: Vec<PatternOverlay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub ticks: usize,
    pub failures: usize,
    pub matches: usize,
}

/// Re-fetches and re-scans on a fixed cadence. Nothing carries over
/// between ticks.
pub struct Watcher<S> {
    source: S,
    recognizer: PatternRecognizer,
    config: WatcherConfig,
}

impl<S: BarSource> Watcher<S> {
    pub fn new(source: S, recognizer: PatternRecognizer, config: WatcherConfig) -> Self {
        Self {
            source,
            recognizer,
            config,
        }
    }

    #[instrument(skip(self, request), fields(source = self.source.name(), symbol = %request.symbol))]
    pub async fn run_once(&self, request: &FetchRequest) -> Result<ScanOutcome, SourceError> {
        let series = self.source.fetch(request).await?;
        let report = self.recognizer.scan(&series.bars);
        let overlays = build_overlays(&series.bars, &report.matches);

        debug!(
            bars = series.len(),
            matches = report.matches.len(),
            "Tick scanned"
        );

        Ok(ScanOutcome {
            series,
            report,
            overlays,
        })
    }

    /// Run ticks until `max_ticks` is reached or Ctrl-C arrives. A failed
    /// tick is logged and the loop carries on.
    pub async fn run<F>(&self, job: &ScanJob, on_tick: F) -> Result<WatchSummary>
    where
        F: FnMut(usize, &ScanOutcome),
    {
        self.run_until(job, shutdown_signal(), on_tick).await
    }

    /// Same as [`Watcher::run`] but stops when `shutdown` completes, including
    /// while a fetch is in flight. The in-flight tick is then abandoned.
    pub async fn run_until<F, Fut>(
        &self,
        job: &ScanJob,
        shutdown: Fut,
        mut on_tick: F,
    ) -> Result<WatchSummary>
    where
        F: FnMut(usize, &ScanOutcome),
        Fut: Future<Output = ()>,
    {
        anyhow::ensure!(!self.config.refresh.is_zero(), "refresh interval must be non-zero");
        let request = job
            .to_request()
            .with_context(|| format!("Invalid watch job {}", job.key()))?;

        info!(
            "Watching {} every {:?} using {}",
            job.key(),
            self.config.refresh,
            self.source.name()
        );

        let mut interval = tokio::time::interval(self.config.refresh);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Polled first on every select so the signal listener exists before
        // the first fetch starts.
        tokio::pin!(shutdown);

        let mut summary = WatchSummary::default();

        loop {
            if let Some(max) = self.config.max_ticks {
                if summary.ticks >= max {
                    break;
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping watcher");
                    break;
                }
                _ = interval.tick() => {}
            }

            summary.ticks += 1;

            let result = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested during tick {}, stopping watcher", summary.ticks);
                    break;
                }
                result = self.run_once(&request) => result,
            };

            match result {
                Ok(outcome) => {
                    summary.matches += outcome.report.matches.len();
                    on_tick(summary.ticks, &outcome);
                }
                Err(e) if e.is_retryable() => {
                    summary.failures += 1;
                    warn!("Tick {} failed, retrying next tick: {}", summary.ticks, e);
                }
                Err(e) => {
                    summary.failures += 1;
                    error!("Tick {} failed: {}", summary.ticks, e);
                }
            }
        }

        info!(
            "Watcher stopped after {} ticks ({} failed, {} matches)",
            summary.ticks, summary.failures, summary.matches
        );
        Ok(summary)
    }
}

// Resolves on Ctrl-C. If the listener cannot be installed the watcher keeps
// running until `max_ticks`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
