// =============================================================================
// Binance REST API Client — public market data
// =============================================================================
//
// Only the unauthenticated klines endpoint is used, so no API key or request
// signing is involved. Every request carries a 10 s timeout.
// =============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::Candle;

const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Binance error code for an unknown trading pair.
pub const INVALID_SYMBOL_CODE: i64 = -1121;

/// Non-2xx answer from Binance, with the `{code, msg}` body when it has one.
#[derive(Debug, thiserror::Error)]
#[error("Binance returned {status}: {msg}")]
pub struct BinanceApiError {
    pub status: u16,
    pub code: Option<i64>,
    pub msg: String,
}

impl BinanceApiError {
    fn from_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            code: i64,
            msg: String,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(b) => Self {
                status,
                code: Some(b.code),
                msg: b.msg,
            },
            Err(_) => Self {
                status,
                code: None,
                msg: body.trim().to_string(),
            },
        }
    }

    /// The request named a pair Binance does not list. Rate limits (429/418)
    /// and server errors are not.
    pub fn is_invalid_symbol(&self) -> bool {
        self.code == Some(INVALID_SYMBOL_CODE) || self.status == 400
    }
}

/// Binance REST API client for candle data.
#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a client against the production REST endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (testnet, proxy, mock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        debug!(base_url = %base_url, "BinanceClient initialised");

        Self { base_url, client }
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/klines (public, no signature required).
    ///
    /// Returns candles oldest-first, exactly as Binance orders them.
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("interval", interval), ("limit", limit.as_str())])
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("failed to read klines response")?;

        if !status.is_success() {
            let err = BinanceApiError::from_body(status.as_u16(), &text);
            warn!(status = err.status, code = ?err.code, msg = %err.msg, "klines request rejected");
            return Err(err.into());
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).context("failed to parse klines response")?;

        let candles = parse_klines(&body)?;
        debug!(
            symbol,
            interval,
            count = candles.len(),
            first = ?candles.first().and_then(Candle::open_time_rfc3339),
            last = ?candles.last().and_then(Candle::open_time_rfc3339),
            "klines fetched"
        );
        Ok(candles)
    }
}

impl Default for BinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Response parsing
// -----------------------------------------------------------------------------

/// Parse Binance's array-of-arrays kline payload.
///
/// Array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] closeTime, ... (the remaining fields are not used)
///
/// Entries with fewer than six fields are skipped with a warning.
pub fn parse_klines(body: &serde_json::Value) -> Result<Vec<Candle>> {
    let raw = body.as_array().context("klines response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());
    for entry in raw {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < 6 {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let open_time = arr[0].as_i64().context("kline open time is not an integer")?;
        let open = parse_str_f64(&arr[1])?;
        let high = parse_str_f64(&arr[2])?;
        let low = parse_str_f64(&arr[3])?;
        let close = parse_str_f64(&arr[4])?;
        let volume = parse_str_f64(&arr[5])?;

        candles.push(Candle::new(open_time, open, high, low, close, volume));
    }
    Ok(candles)
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}
