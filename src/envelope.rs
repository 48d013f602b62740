// =============================================================================
// Analysis Envelope — auditable record of one served analysis
// =============================================================================
//
// Wraps an engine `Report` (indicators, labels, per-label score breakdown and
// key levels) with the request context it was produced for.
// =============================================================================

use serde::Serialize;

use crate::report::Report;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisEnvelope {
    /// Unique identifier for this analysis (UUID v4).
    pub id: String,

    /// Binance pair the candles were fetched for, e.g. `BTCUSDT`.
    pub pair: String,

    /// Kline interval, e.g. `1h`.
    pub interval: String,

    /// Number of candles the engine ran over.
    pub candle_count: usize,

    /// RFC 3339 timestamp of when this envelope was created.
    pub created_at: String,

    pub report: Report,
}

impl AnalysisEnvelope {
    pub fn new(
        pair: impl Into<String>,
        interval: impl Into<String>,
        candle_count: usize,
        report: Report,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pair: pair.into(),
            interval: interval.into(),
            candle_count,
            created_at: chrono::Utc::now().to_rfc3339(),
            report,
        }
    }
}
