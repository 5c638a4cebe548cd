use crate::config::BinanceSettings;
use crate::error::SourceError;
use crate::models::{Bar, CandleSeries};
use crate::source::{BarSource, FetchRequest, MAX_LIMIT};
use crate::utils::truncate_string;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const KLINES_PATH: &str = "/api/v3/klines";

// Error bodies are echoed into logs; keep them short.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct BinanceErrorBody {
    #[allow(dead_code)]
    code: i64,
    msg: String,
}

/// Public market data from the Binance spot REST API.
pub struct BinanceSource {
    client: Client,
    base_url: String,
}

impl BinanceSource {
    pub fn new(settings: &BinanceSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BarSource for BinanceSource {
    fn name(&self) -> &str {
        "binance"
    }

    #[instrument(skip(self), fields(symbol = %request.symbol, interval = %request.interval))]
    async fn fetch(&self, request: &FetchRequest) -> Result<CandleSeries, SourceError> {
        if request.limit == 0 || request.limit > usize::from(MAX_LIMIT) {
            return Err(SourceError::InvalidRequest(format!(
                "limit {} is outside 1..={}",
                request.limit, MAX_LIMIT
            )));
        }

        let url = format!("{}{}", self.base_url, KLINES_PATH);
        let limit = request.limit.to_string();

        debug!("GET {} (limit {})", url, limit);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", request.symbol.as_str()),
                ("interval", request.interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<BinanceErrorBody>(&body) {
                Ok(error) => error.msg,
                Err(_) => truncate_string(&body, MAX_ERROR_BODY),
            };
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<Vec<Value>> = serde_json::from_str(&body).map_err(|e| {
            SourceError::Malformed(format!("klines response is not an array of rows: {}", e))
        })?;

        let bars = rows
            .iter()
            .enumerate()
            .map(|(index, row)| parse_kline_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;

        if bars.is_empty() {
            warn!("Binance returned no klines for {} {}", request.symbol, request.interval);
        }

        let series = CandleSeries::new(request.symbol.clone(), request.interval, bars);
        if let Err(index) = series.check_ordering() {
            return Err(SourceError::Malformed(format!(
                "open times are not strictly increasing at row {}",
                index
            )));
        }

        debug!("Fetched {} bars", series.len());
        Ok(series)
    }
}

// Kline rows are [open_time, open, high, low, close, volume, close_time, ...]
// with prices as decimal strings.
fn parse_kline_row(index: usize, row: &[Value]) -> Result<Bar, SourceError> {
    let open_time = row
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| SourceError::Malformed(format!("row {}: missing or non-integer open time", index)))?;

    let price = |position: usize, field: &str| -> Result<f64, SourceError> {
        let value = row.get(position).ok_or_else(|| {
            SourceError::Malformed(format!("row {}: missing {}", index, field))
        })?;

        let parsed = match value {
            Value::String(s) => s.parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };

        parsed.ok_or_else(|| {
            SourceError::Malformed(format!("row {}: {} is not numeric: {}", index, field, value))
        })
    };

    Ok(Bar {
        open_time,
        open: price(1, "open")?,
        high: price(2, "high")?,
        low: price(3, "low")?,
        close: price(4, "close")?,
        volume: price(5, "volume")?,
    })
}
