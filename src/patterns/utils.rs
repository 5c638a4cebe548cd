use crate::error::PatternError;
use crate::models::Bar;

// Helper functions for pattern recognition
pub fn is_bullish(open: f64, close: f64) -> bool {
    close > open
}

pub fn body_size(open: f64, close: f64) -> f64 {
    (open - close).abs()
}

pub fn upper_shadow(high: f64, open: f64, close: f64) -> f64 {
    if is_bullish(open, close) {
        high - close
    } else {
        high - open
    }
}

pub fn lower_shadow(low: f64, open: f64, close: f64) -> f64 {
    if is_bullish(open, close) {
        open - low
    } else {
        close - low
    }
}

/// Fail with `InvalidBar` unless the bar passes validation.
pub fn ensure_valid(bar: &Bar) -> Result<(), PatternError> {
    bar.validate().map_err(|defect| PatternError::InvalidBar {
        open_time: bar.open_time,
        defect,
    })
}
