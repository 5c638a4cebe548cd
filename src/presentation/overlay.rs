use crate::models::Bar;
use crate::patterns::{PatternKind, PatternMatch};
use serde::Serialize;
use tracing::warn;

/// Chart annotation for one match: a line from (start_time, start_price)
/// to (end_time, end_price).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternOverlay {
    pub pattern: PatternKind,
    pub start_index: usize,
    pub end_index: usize,
    pub start_time: i64,
    pub end_time: i64,
    pub start_price: f64,
    pub end_price: f64,
}

// Soldiers run from the first bar's low to the third bar's high; a hammer
// is a vertical marker over its own range.
pub fn build_overlays(bars: &[Bar], matches: &[PatternMatch]) -> Vec<PatternOverlay> {
    let mut overlays = Vec::with_capacity(matches.len());

    for m in matches {
        let end_index = m.start_index + m.pattern.span() - 1;
        let (Some(first), Some(last)) = (bars.get(m.start_index), bars.get(end_index)) else {
            warn!(
                "Dropping {} overlay: bars {}..={} out of range ({} bars)",
                m.pattern,
                m.start_index,
                end_index,
                bars.len()
            );
            continue;
        };

        overlays.push(PatternOverlay {
            pattern: m.pattern,
            start_index: m.start_index,
            end_index,
            start_time: first.open_time,
            end_time: last.open_time,
            start_price: first.low,
            end_price: last.high,
        });
    }

    overlays
}
