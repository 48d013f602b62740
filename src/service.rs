// =============================================================================
// Analysis service — fetch, validate, analyze
// =============================================================================
//
// Shared by the JSON API and the Telegram commands. Request validation
// happens before any upstream call so malformed input never costs a
// round-trip.
// =============================================================================

use tracing::{info, warn};

use crate::app_state::AppState;
use crate::binance::{is_valid_interval, is_valid_pair, symbol_to_pair, BinanceApiError};
use crate::coingecko::SpotPrice;
use crate::engine;
use crate::envelope::AnalysisEnvelope;
use crate::error::ServiceError;
use crate::runtime_config::{RuntimeConfig, MAX_KLINE_LIMIT};

/// One analysis request. Unset fields fall back to the runtime config.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    pub symbol: String,
    pub quote: Option<String>,
    pub interval: Option<String>,
    pub limit: Option<u32>,
}

/// Fully resolved request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub pair: String,
    pub interval: String,
    pub limit: u32,
}

impl AnalyzeRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Apply config defaults and validate. Never touches the network.
    pub fn resolve(&self, config: &RuntimeConfig) -> Result<ResolvedRequest, ServiceError> {
        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            return Err(ServiceError::InvalidSymbol("symbol is empty".into()));
        }

        let quote = self.quote.as_deref().unwrap_or(&config.quote_asset);
        let pair = symbol_to_pair(symbol, quote);
        if !is_valid_pair(&pair) {
            return Err(ServiceError::InvalidSymbol(pair));
        }

        let interval = self
            .interval
            .clone()
            .unwrap_or_else(|| config.default_interval.clone());
        if !is_valid_interval(&interval) {
            return Err(ServiceError::InvalidRequest(format!(
                "unsupported interval `{interval}`"
            )));
        }

        let limit = self.limit.unwrap_or(config.kline_limit);
        let min = config.min_candles.max(1) as u32;
        if limit < min || limit > MAX_KLINE_LIMIT {
            return Err(ServiceError::InvalidRequest(format!(
                "limit must be within {min}..={MAX_KLINE_LIMIT}, got {limit}"
            )));
        }

        Ok(ResolvedRequest {
            pair,
            interval,
            limit,
        })
    }
}

/// Fetch candles for `request` and run the engine over them.
pub async fn analyze_symbol(
    state: &AppState,
    request: &AnalyzeRequest,
) -> Result<AnalysisEnvelope, ServiceError> {
    let config = state.config();
    let resolved = request.resolve(&config)?;

    let candles = state
        .binance
        .get_klines(&resolved.pair, &resolved.interval, resolved.limit)
        .await
        .map_err(|e| kline_error(e, &resolved.pair))?;

    if candles.len() < config.min_candles {
        warn!(
            pair = %resolved.pair,
            got = candles.len(),
            need = config.min_candles,
            "not enough candles for analysis"
        );
        return Err(ServiceError::NotEnoughCandles {
            pair: resolved.pair,
            got: candles.len(),
            need: config.min_candles,
        });
    }

    let report = engine::analyze(&candles, &config.indicators)?;
    state.record_analysis();

    info!(
        pair = %resolved.pair,
        interval = %resolved.interval,
        candles = candles.len(),
        score = report.score,
        recommendation = %report.recommendation,
        "analysis served"
    );

    Ok(AnalysisEnvelope::new(
        resolved.pair,
        resolved.interval,
        candles.len(),
        report,
    ))
}

/// A pair Binance rejects as unknown is the caller's mistake, not an outage.
fn kline_error(err: anyhow::Error, pair: &str) -> ServiceError {
    match err.downcast_ref::<BinanceApiError>() {
        Some(api) if api.is_invalid_symbol() => {
            warn!(pair, code = ?api.code, "Binance does not list pair");
            ServiceError::InvalidSymbol(pair.to_string())
        }
        _ => ServiceError::Upstream(err),
    }
}

/// CoinGecko ids are lowercase slugs such as `bitcoin` or `shiba-inu`.
pub fn is_valid_coin_id(coin_id: &str) -> bool {
    !coin_id.is_empty()
        && coin_id.len() <= 64
        && coin_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Spot price for a CoinGecko coin id, in `vs` or the configured currency.
pub async fn spot_price(
    state: &AppState,
    coin_id: &str,
    vs: Option<&str>,
) -> Result<SpotPrice, ServiceError> {
    let coin_id = coin_id.trim().to_lowercase();
    if !is_valid_coin_id(&coin_id) {
        return Err(ServiceError::InvalidSymbol(coin_id));
    }
    let vs = match vs {
        Some(vs) => vs.trim().to_lowercase(),
        None => state.config().vs_currency,
    };
    if vs.is_empty() || !vs.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ServiceError::InvalidRequest(format!("invalid currency `{vs}`")));
    }

    state
        .coingecko
        .simple_price(&coin_id, &vs)
        .await
        .map_err(ServiceError::Upstream)
}
