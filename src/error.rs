// src/error.rs
use serde::Serialize;
use thiserror::Error;

/// What is wrong with a bar that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub enum BarDefect {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} is negative")]
    Negative { field: &'static str },

    #[error("low {low} is above the body bottom {body_low}")]
    LowAboveBody { low: f64, body_low: f64 },

    #[error("high {high} is below the body top {body_high}")]
    HighBelowBody { high: f64, body_high: f64 },
}

/// Errors raised by the pattern classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub enum PatternError {
    #[error("invalid bar at {open_time}: {defect}")]
    InvalidBar { open_time: i64, defect: BarDefect },
}

/// Errors raised while obtaining bars from a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    /// Whether the next refresh has a reasonable chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Network(_) => true,
            SourceError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
