mod binance;
mod file;

pub use binance::BinanceSource;
pub use file::FileSource;

use crate::error::SourceError;
use crate::models::{CandleSeries, Interval};
use async_trait::async_trait;

/// Largest `limit` the klines endpoint accepts.
pub const MAX_LIMIT: u16 = 1000;

/// Which bars to fetch. `limit` keeps the most recent bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub symbol: String,
    pub interval: Interval,
    pub limit: usize,
}

impl FetchRequest {
    /// Request for the exchange: `limit` must lie in `1..=MAX_LIMIT`.
    pub fn new(symbol: &str, interval: Interval, limit: u16) -> Result<Self, SourceError> {
        if limit > MAX_LIMIT {
            return Err(SourceError::InvalidRequest(format!(
                "limit {} is outside 1..={}",
                limit, MAX_LIMIT
            )));
        }
        Self::local(symbol, interval, Some(usize::from(limit)))
    }

    /// Request for local data with no upper bound; `None` keeps every bar.
    pub fn local(symbol: &str, interval: Interval, limit: Option<usize>) -> Result<Self, SourceError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(SourceError::InvalidRequest("symbol is empty".to_string()));
        }
        if limit == Some(0) {
            return Err(SourceError::InvalidRequest("limit must be at least 1".to_string()));
        }

        Ok(Self {
            symbol: symbol.to_uppercase(),
            interval,
            limit: limit.unwrap_or(usize::MAX),
        })
    }
}

/// Supplier of closed bars, oldest first.
#[async_trait]
pub trait BarSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, request: &FetchRequest) -> Result<CandleSeries, SourceError>;
}
