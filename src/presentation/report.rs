use crate::models::{Bar, CandleSeries, Interval};
use crate::patterns::{PatternMatch, RejectedBar, ScanReport};
use crate::presentation::overlay::PatternOverlay;
use crate::utils::format_timestamp;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Plain-text report of one scan.
pub fn render_text(series: &CandleSeries, report: &ScanReport) -> String {
    let mut out = String::new();

    if series.is_empty() {
        out.push_str("No candlestick data available.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{} ({}) - {} bars",
        series.symbol,
        series.interval,
        series.len()
    );
    let _ = writeln!(out, "Detected Patterns");

    if report.matches.is_empty() {
        out.push_str("No patterns detected.\n");
    }

    for m in &report.matches {
        match series.bars.get(m.start_index) {
            Some(bar) => {
                let _ = writeln!(
                    out,
                    "{} starting at {}",
                    m.pattern,
                    format_timestamp(bar.open_time)
                );
            }
            None => {
                let _ = writeln!(out, "{} starting at bar {}", m.pattern, m.start_index);
            }
        }
    }

    if !report.rejected.is_empty() {
        let _ = writeln!(out, "Skipped {} invalid bar(s):", report.rejected.len());
        for rejected in &report.rejected {
            let _ = writeln!(out, "  #{}: {}", rejected.index, rejected.error);
        }
    }

    out
}

/// Everything produced by one scan, ready to be written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ScanExport<'a> {
    pub symbol: &'a str,
    pub interval: Interval,
    pub generated_at: DateTime<Utc>,
    pub bars: &'a [Bar],
    pub matches: &'a [PatternMatch],
    pub overlays: &'a [PatternOverlay],
    pub rejected: &'a [RejectedBar],
}

impl<'a> ScanExport<'a> {
    pub fn new(series: &'a CandleSeries, report: &'a ScanReport, overlays: &'a [PatternOverlay]) -> Self {
        Self {
            symbol: &series.symbol,
            interval: series.interval,
            generated_at: Utc::now(),
            bars: &series.bars,
            matches: &report.matches,
            overlays,
            rejected: &report.rejected,
        }
    }
}

pub fn write_json(path: &Path, export: &ScanExport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(export)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    Ok(())
}
