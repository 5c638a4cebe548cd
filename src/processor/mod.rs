pub mod job;
pub mod worker;

pub use job::ScanJob;
pub use worker::{ScanOutcome, WatchSummary, Watcher, WatcherConfig};
