// =============================================================================
// Analysis Report — immutable result of one engine run
// =============================================================================

use serde::Serialize;

use crate::levels::KeyLevels;
use crate::signals::{Recommendation, ScoringResult, Signal, SignalContribution, SignalSet};

/// Latest scalar reading of every indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub last_close: f64,
    pub last_volume: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub rsi: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub stoch_rsi_k: f64,
    pub stoch_rsi_d: f64,
    pub atr: f64,
    /// ATR as a percentage of the last close.
    pub atr_pct: f64,
    pub obv: f64,
    pub volume_ma: f64,
}

/// Indicator values, labels, score, recommendation and key levels for one
/// candle series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub indicators: IndicatorSnapshot,
    /// One label per family, in fixed family order.
    pub signals: Vec<Signal>,
    pub score: i32,
    pub recommendation: Recommendation,
    /// Weight each label contributed to `score`, in label order.
    pub contributions: Vec<SignalContribution>,
    pub levels: KeyLevels,
}

impl Report {
    pub fn new(
        indicators: IndicatorSnapshot,
        signals: &SignalSet,
        scoring: ScoringResult,
        levels: KeyLevels,
    ) -> Self {
        Self {
            indicators,
            signals: signals.labels().to_vec(),
            score: scoring.score,
            recommendation: scoring.recommendation,
            contributions: scoring.contributions,
            levels,
        }
    }

    /// Comma-separated label keywords, e.g. `price_above_sma, ema_bull, ...`.
    pub fn signal_summary(&self) -> String {
        self.signals
            .iter()
            .map(Signal::keyword)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
