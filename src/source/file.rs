use crate::error::SourceError;
use crate::models::{Bar, CandleSeries};
use crate::source::{BarSource, FetchRequest};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bars read from a JSON array on disk.
///
/// The request's symbol and interval only label the series; `limit` keeps
/// the most recent bars.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BarSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self, request), fields(path = %self.path.display()))]
    async fn fetch(&self, request: &FetchRequest) -> Result<CandleSeries, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let mut bars: Vec<Bar> = serde_json::from_str(&contents)?;

        if bars.len() > request.limit {
            bars.drain(..bars.len() - request.limit);
        }

        let series = CandleSeries::new(request.symbol.clone(), request.interval, bars);
        if let Err(index) = series.check_ordering() {
            return Err(SourceError::Malformed(format!(
                "{}: open times are not strictly increasing at bar {}",
                self.path.display(),
                index
            )));
        }

        debug!("Loaded {} bars", series.len());
        Ok(series)
    }
}
