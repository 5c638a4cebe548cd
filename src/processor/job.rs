use crate::error::SourceError;
use crate::models::Interval;
use crate::source::FetchRequest;
use serde::{Deserialize, Serialize};

/// The work done on every tick of the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanJob {
    pub symbol: String,
    pub interval: Interval,
    pub limit: u16,
}

impl ScanJob {
    pub fn new(symbol: impl Into<String>, interval: Interval, limit: u16) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            limit,
        }
    }

    pub fn key(&self) -> String {
        format!("scan:{}:{}:{}", self.symbol, self.interval, self.limit)
    }

    pub fn to_request(&self) -> Result<FetchRequest, SourceError> {
        FetchRequest::new(&self.symbol, self.interval, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_key() {
        let job = ScanJob::new("BTCUSDT", Interval::FiveMinutes, 100);
        assert_eq!(job.key(), "scan:BTCUSDT:5m:100");
    }

    #[test]
    fn test_job_to_request_validates() {
        let job = ScanJob::new("btcusdt", Interval::OneDay, 0);
        assert!(job.to_request().is_err());

        let job = ScanJob::new("btcusdt", Interval::OneDay, 30);
        assert_eq!(job.to_request().unwrap().symbol, "BTCUSDT");
    }
}
