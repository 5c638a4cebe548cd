use crate::error::PatternError;
use crate::models::Bar;
use crate::patterns::{single_candle, triple_candle};
use crate::patterns::utils::ensure_valid;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Pattern families the recognizer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    #[serde(rename = "Hammer")]
    Hammer,
    #[serde(rename = "Three White Soldiers")]
    ThreeWhiteSoldiers,
}

impl PatternKind {
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Hammer => "Hammer",
            PatternKind::ThreeWhiteSoldiers => "Three White Soldiers",
        }
    }

    /// Number of bars taking part in a match.
    pub fn span(&self) -> usize {
        match self {
            PatternKind::Hammer => 1,
            PatternKind::ThreeWhiteSoldiers => 3,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub pattern: PatternKind,
    /// Index of the first bar in the match
    pub start_index: usize,
}

impl PatternMatch {
    pub fn new(pattern: PatternKind, start_index: usize) -> Self {
        Self {
            pattern,
            start_index,
        }
    }
}

/// What a scan does when it meets a bar that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidBarPolicy {
    /// Record the bar and keep scanning; no evaluation that includes it runs.
    #[default]
    Skip,
    /// Stop at the first invalid bar.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedBar {
    pub index: usize,
    pub error: PatternError,
}

/// Outcome of one scan over a bar sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub matches: Vec<PatternMatch>,
    pub rejected: Vec<RejectedBar>,
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternRecognizer {
    policy: InvalidBarPolicy,
}

impl PatternRecognizer {
    pub fn new(policy: InvalidBarPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> InvalidBarPolicy {
        self.policy
    }

    // Scan every index: Hammer on bars[i], then Three White Soldiers on
    // bars[i-2..=i] once i >= 2. Matches come out in that order.
    pub fn scan(&self, bars: &[Bar]) -> ScanReport {
        let mut report = ScanReport::default();
        let mut valid = Vec::with_capacity(bars.len());

        for (i, bar) in bars.iter().enumerate() {
            if let Err(error) = ensure_valid(bar) {
                warn!(index = i, "Skipping bar: {}", error);
                report.rejected.push(RejectedBar { index: i, error });
                valid.push(false);

                if self.policy == InvalidBarPolicy::Abort {
                    break;
                }
                continue;
            }
            valid.push(true);

            let window_ready = i >= 2 && valid[i - 2] && valid[i - 1];

            // Bars reaching here are validated; an error would be a classifier bug.
            if let Err(error) = self.evaluate_at(bars, i, window_ready, &mut report.matches) {
                report.rejected.push(RejectedBar { index: i, error });
            }
        }

        debug!(
            bars = bars.len(),
            matches = report.matches.len(),
            rejected = report.rejected.len(),
            "Pattern scan complete"
        );

        report
    }

    /// Scan that aborts with the first classification error.
    pub fn scan_strict(&self, bars: &[Bar]) -> Result<Vec<PatternMatch>, PatternError> {
        let mut matches = Vec::new();

        for i in 0..bars.len() {
            self.evaluate_at(bars, i, i >= 2, &mut matches)?;
        }

        debug!(bars = bars.len(), matches = matches.len(), "Strict pattern scan complete");
        Ok(matches)
    }

    fn evaluate_at(
        &self,
        bars: &[Bar],
        index: usize,
        window_ready: bool,
        matches: &mut Vec<PatternMatch>,
    ) -> Result<(), PatternError> {
        if single_candle::is_hammer(&bars[index])? {
            debug!(index, "Hammer detected");
            matches.push(PatternMatch::new(PatternKind::Hammer, index));
        }

        if window_ready && triple_candle::is_three_white_soldiers(&bars[index - 2..=index])? {
            debug!(start_index = index - 2, "Three White Soldiers detected");
            matches.push(PatternMatch::new(PatternKind::ThreeWhiteSoldiers, index - 2));
        }

        Ok(())
    }
}
