// =============================================================================
// Series Extractor
// =============================================================================
//
// Splits a candle slice into index-aligned numeric columns. Every column has
// exactly one entry per candle, oldest first, so indicator outputs can be
// zipped back against any other column by index.

use crate::error::AnalysisError;
use crate::market_data::Candle;

/// Index-aligned OHLCV columns extracted from a candle sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvSeries {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl OhlcvSeries {
    /// Validate `candles` and split them into columns.
    ///
    /// # Errors
    /// - [`AnalysisError::InsufficientData`] when `candles` is empty.
    /// - [`AnalysisError::InvalidInput`] for the first value that is not
    ///   finite, a price that is not strictly positive, or a negative volume.
    pub fn from_candles(candles: &[Candle]) -> Result<Self, AnalysisError> {
        if candles.is_empty() {
            return Err(AnalysisError::InsufficientData);
        }

        for (index, c) in candles.iter().enumerate() {
            for (field, value) in [
                ("open", c.open),
                ("high", c.high),
                ("low", c.low),
                ("close", c.close),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(AnalysisError::InvalidInput { field, index, value });
                }
            }
            if !c.volume.is_finite() || c.volume < 0.0 {
                return Err(AnalysisError::InvalidInput {
                    field: "volume",
                    index,
                    value: c.volume,
                });
            }
        }

        let n = candles.len();
        let mut series = Self {
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
        };
        for c in candles {
            series.open.push(c.open);
            series.high.push(c.high);
            series.low.push(c.low);
            series.close.push(c.close);
            series.volume.push(c.volume);
        }
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Most recent close. Always present: construction rejects empty input.
    pub fn last_close(&self) -> f64 {
        self.close[self.close.len() - 1]
    }

    /// Most recent volume.
    pub fn last_volume(&self) -> f64 {
        self.volume[self.volume.len() - 1]
    }
}
