use crate::error::BarDefect;
use crate::models::Interval;
use serde::{Deserialize, Serialize};

/// One closed kline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Epoch milliseconds
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(open_time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check that every field is a finite, non-negative number and that
    /// `low <= min(open, close) <= max(open, close) <= high`.
    pub fn validate(&self) -> Result<(), BarDefect> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(BarDefect::NonFinite { field });
            }
            if value < 0.0 {
                return Err(BarDefect::Negative { field });
            }
        }

        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);

        if self.low > body_low {
            return Err(BarDefect::LowAboveBody {
                low: self.low,
                body_low,
            });
        }
        if self.high < body_high {
            return Err(BarDefect::HighBelowBody {
                high: self.high,
                body_high,
            });
        }

        Ok(())
    }
}

/// Bars for one symbol and interval, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub symbol: String,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

impl CandleSeries {
    pub fn new(symbol: impl Into<String>, interval: Interval, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn empty(symbol: impl Into<String>, interval: Interval) -> Self {
        Self::new(symbol, interval, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the first index whose open time does not strictly exceed the previous one.
    pub fn check_ordering(&self) -> Result<(), usize> {
        match self
            .bars
            .windows(2)
            .position(|pair| pair[1].open_time <= pair[0].open_time)
        {
            Some(pos) => Err(pos + 1),
            None => Ok(()),
        }
    }
}
