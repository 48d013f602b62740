use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single closed OHLCV candle, as returned by the Binance klines endpoint.
///
/// Candles are immutable once fetched and always handled oldest-first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time in Unix milliseconds.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
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

    /// Open time rendered as an RFC 3339 UTC timestamp, if it is in range.
    pub fn open_time_rfc3339(&self) -> Option<String> {
        chrono::DateTime::from_timestamp_millis(self.open_time).map(|dt| dt.to_rfc3339())
    }
}
