// =============================================================================
// CoinGecko Client — spot price + 24h change
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Spot price of one coin in one fiat/crypto currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotPrice {
    pub coin_id: String,
    pub vs_currency: String,
    pub price: f64,
    /// Percentage change over the last 24 hours, when CoinGecko reports it.
    pub change_24h: Option<f64>,
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self { base_url, client }
    }

    /// GET /simple/price for a single coin id (e.g. `bitcoin`).
    #[instrument(skip(self), name = "coingecko::simple_price")]
    pub async fn simple_price(&self, coin_id: &str, vs_currency: &str) -> Result<SpotPrice> {
        let coin_id = coin_id.trim().to_lowercase();
        let vs_currency = vs_currency.trim().to_lowercase();
        let url = format!("{}/simple/price", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("ids", coin_id.as_str()),
                ("vs_currencies", vs_currency.as_str()),
                ("include_24hr_change", "true"),
            ])
            .send()
            .await
            .context("GET /simple/price request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse simple price response")?;

        if !status.is_success() {
            anyhow::bail!("CoinGecko GET /simple/price returned {}: {}", status, body);
        }

        let price = parse_simple_price(&body, &coin_id, &vs_currency)?;
        debug!(coin_id = %price.coin_id, price = price.price, "spot price fetched");
        Ok(price)
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Extract one coin from a `{ "<id>": { "<vs>": 1.0, "<vs>_24h_change": 0.5 } }`
/// payload. An id CoinGecko does not know comes back as an empty object.
pub fn parse_simple_price(
    body: &serde_json::Value,
    coin_id: &str,
    vs_currency: &str,
) -> Result<SpotPrice> {
    let entry = body
        .get(coin_id)
        .with_context(|| format!("unknown coin id `{coin_id}`"))?;

    let price = entry
        .get(vs_currency)
        .and_then(serde_json::Value::as_f64)
        .with_context(|| format!("no `{vs_currency}` price for `{coin_id}`"))?;

    let change_24h = entry
        .get(format!("{vs_currency}_24h_change"))
        .and_then(serde_json::Value::as_f64);

    Ok(SpotPrice {
        coin_id: coin_id.to_string(),
        vs_currency: vs_currency.to_string(),
        price,
        change_24h,
    })
}
