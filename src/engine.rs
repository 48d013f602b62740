// =============================================================================
// Analysis Engine — candles in, report out
// =============================================================================
//
// Pipeline (strictly left to right, no shared state):
//
//   candles -> OhlcvSeries -> IndicatorSeries -> IndicatorSnapshot
//           -> SignalSet -> ScoringResult -> Report
//
// Key levels (supports, resistances, liquidity zones, trade plan) are derived
// from the same OhlcvSeries and snapshot and ride along in the Report.
//
// The engine is synchronous and deterministic: the same candles and parameters
// always produce the same report. Short series are not an error — every
// indicator degrades to a reduced window or a neutral reading. Only an empty
// input or non-finite / non-positive values are rejected, before any
// computation starts.
// =============================================================================

use tracing::debug;

use crate::error::AnalysisError;
use crate::indicators::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_obv,
    calculate_rsi, calculate_sma, calculate_stochastic, calculate_stochastic_rsi,
    calculate_volume_ma, BollingerBands, MacdSeries, StochasticSeries,
};
use crate::levels::key_levels;
use crate::market_data::{Candle, OhlcvSeries};
use crate::report::{IndicatorSnapshot, Report};
use crate::runtime_config::IndicatorParams;
use crate::signals::{aggregator, classify};

/// Every indicator as a full series aligned with the input candles.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub sma_short: Vec<f64>,
    pub sma_long: Vec<f64>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub macd: MacdSeries,
    pub bollinger: BollingerBands,
    pub rsi: Vec<f64>,
    pub stochastic: StochasticSeries,
    pub stoch_rsi: StochasticSeries,
    pub atr: Vec<f64>,
    pub obv: Vec<f64>,
    pub volume_ma: Vec<f64>,
}

impl IndicatorSeries {
    /// Run every indicator over `series`.
    pub fn compute(series: &OhlcvSeries, p: &IndicatorParams) -> Self {
        let close = &series.close;
        Self {
            sma_short: calculate_sma(close, p.sma_short),
            sma_long: calculate_sma(close, p.sma_long),
            ema_fast: calculate_ema(close, p.ema_fast),
            ema_slow: calculate_ema(close, p.ema_slow),
            macd: calculate_macd(close, p.macd_fast, p.macd_slow, p.macd_signal),
            bollinger: calculate_bollinger(close, p.bollinger_period, p.bollinger_std),
            rsi: calculate_rsi(close, p.rsi_period),
            stochastic: calculate_stochastic(&series.high, &series.low, close, p.stoch_k, p.stoch_d),
            stoch_rsi: calculate_stochastic_rsi(close, p.rsi_period, p.stoch_rsi_k, p.stoch_rsi_d),
            atr: calculate_atr(&series.high, &series.low, close, p.atr_period),
            obv: calculate_obv(close, &series.volume),
            volume_ma: calculate_volume_ma(&series.volume, p.volume_ma),
        }
    }

    /// Latest value of every series.
    ///
    /// `series` must be the input these indicators were computed from, so all
    /// columns are non-empty and share its length.
    pub fn snapshot(&self, series: &OhlcvSeries) -> IndicatorSnapshot {
        let i = series.len() - 1;
        let last_close = series.last_close();
        IndicatorSnapshot {
            last_close,
            last_volume: series.last_volume(),
            sma_short: self.sma_short[i],
            sma_long: self.sma_long[i],
            ema_fast: self.ema_fast[i],
            ema_slow: self.ema_slow[i],
            macd: self.macd.macd[i],
            macd_signal: self.macd.signal[i],
            macd_hist: self.macd.histogram[i],
            bb_upper: self.bollinger.upper[i],
            bb_middle: self.bollinger.middle[i],
            bb_lower: self.bollinger.lower[i],
            rsi: self.rsi[i],
            stoch_k: self.stochastic.k[i],
            stoch_d: self.stochastic.d[i],
            stoch_rsi_k: self.stoch_rsi.k[i],
            stoch_rsi_d: self.stoch_rsi.d[i],
            atr: self.atr[i],
            atr_pct: self.atr[i] / last_close * 100.0,
            obv: self.obv[i],
            volume_ma: self.volume_ma[i],
        }
    }
}

/// Analyse one candle series (oldest first) and build its report.
///
/// # Errors
/// - [`AnalysisError::InsufficientData`] for an empty slice.
/// - [`AnalysisError::InvalidInput`] for non-finite values, non-positive
///   prices or negative volume.
pub fn analyze(candles: &[Candle], params: &IndicatorParams) -> Result<Report, AnalysisError> {
    let series = OhlcvSeries::from_candles(candles)?;
    let indicators = IndicatorSeries::compute(&series, params);
    let snapshot = indicators.snapshot(&series);

    let signals = classify(&snapshot);
    let scoring = aggregator::score(&signals.labels());
    let levels = key_levels(&series, &snapshot);

    debug!(
        candles = series.len(),
        score = scoring.score,
        recommendation = %scoring.recommendation,
        opportunity = ?levels.opportunity,
        "analysis complete"
    );

    Ok(Report::new(snapshot, &signals, scoring, levels))
}
