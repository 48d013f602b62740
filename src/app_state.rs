// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every HTTP handler and spawned webhook task via `Arc<AppState>`.
//
// Thread safety:
//   - parking_lot::RwLock around the runtime config; callers clone what they
//     need and drop the guard before awaiting. `reload_config` is the only
//     writer outside tests.
//   - Atomic counters for lock-free statistics.
//   - The HTTP clients are cheap to share and internally synchronised.
// =============================================================================

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::info;

use crate::binance::BinanceClient;
use crate::coingecko::CoinGeckoClient;
use crate::runtime_config::{BotSecrets, RuntimeConfig};
use crate::telegram::TelegramClient;

pub struct AppState {
    // ── Configuration ───────────────────────────────────────────────────
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; webhook deliveries are
    /// accepted unchecked when unset.
    pub webhook_secret: Option<String>,

    // ── Upstream clients ────────────────────────────────────────────────
    pub binance: BinanceClient,
    pub coingecko: CoinGeckoClient,
    pub telegram: TelegramClient,

    // ── Statistics ──────────────────────────────────────────────────────
    started_at: Instant,
    analyses_served: AtomicU64,
    updates_received: AtomicU64,
}

impl AppState {
    /// Build the production state: real upstream endpoints, secrets from the
    /// environment.
    pub fn new(config: RuntimeConfig, secrets: &BotSecrets) -> Self {
        Self::with_clients(
            config,
            BinanceClient::new(),
            CoinGeckoClient::new(),
            TelegramClient::new(secrets.telegram_token.clone()),
            secrets.webhook_secret.clone(),
        )
    }

    pub fn with_clients(
        config: RuntimeConfig,
        binance: BinanceClient,
        coingecko: CoinGeckoClient,
        telegram: TelegramClient,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            runtime_config: Arc::new(RwLock::new(config)),
            webhook_secret,
            binance,
            coingecko,
            telegram,
            started_at: Instant::now(),
            analyses_served: AtomicU64::new(0),
            updates_received: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current runtime config (the lock is released on return).
    pub fn config(&self) -> RuntimeConfig {
        self.runtime_config.read().clone()
    }

    /// Re-read the config file and swap it in. On any load or validation
    /// error the running config is kept and the error returned.
    pub fn reload_config(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let fresh = RuntimeConfig::load(path)?;
        *self.runtime_config.write() = fresh;
        info!("runtime config reloaded");
        Ok(())
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn record_analysis(&self) {
        self.analyses_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }

    pub fn record_update(&self) {
        self.updates_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn updates_received(&self) -> u64 {
        self.updates_received.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// State whose clients point at an unroutable local port, so any test
    /// that accidentally reaches the network fails fast.
    pub fn offline_state(webhook_secret: Option<&str>) -> Arc<AppState> {
        let base = "http://127.0.0.1:9";
        Arc::new(AppState::with_clients(
            RuntimeConfig::default(),
            BinanceClient::with_base_url(base),
            CoinGeckoClient::with_base_url(base),
            TelegramClient::with_base_url("0:test", base),
            webhook_secret.map(str::to_string),
        ))
    }

    /// Offline state except for Binance, which points at `binance_base`.
    pub fn state_with_binance(binance_base: &str) -> Arc<AppState> {
        let base = "http://127.0.0.1:9";
        Arc::new(AppState::with_clients(
            RuntimeConfig::default(),
            BinanceClient::with_base_url(binance_base),
            CoinGeckoClient::with_base_url(base),
            TelegramClient::with_base_url("0:test", base),
            None,
        ))
    }

    /// Local stand-in for `GET /api/v3/klines` answering every request with
    /// `status` and `body`. Returns its base URL.
    pub async fn mock_binance(status: axum::http::StatusCode, body: String) -> String {
        let app = axum::Router::new().route(
            "/api/v3/klines",
            axum::routing::get(move || {
                let body = body.clone();
                async move { (status, body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_increment() {
        let state = test_support::offline_state(None);
        assert_eq!(state.analyses_served(), 0);
        state.record_analysis();
        state.record_analysis();
        state.record_update();
        assert_eq!(state.analyses_served(), 2);
        assert_eq!(state.updates_received(), 1);
    }

    #[test]
    fn config_snapshot_reflects_writes() {
        let state = test_support::offline_state(None);
        state.runtime_config.write().kline_limit = 200;
        assert_eq!(state.config().kline_limit, 200);
    }

    #[test]
    fn reload_swaps_valid_config_and_keeps_old_on_error() {
        let state = test_support::offline_state(None);
        let path = std::env::temp_dir().join(format!("bot-config-{}.json", uuid::Uuid::new_v4()));

        std::fs::write(&path, r#"{ "kline_limit": 300, "default_interval": "4h" }"#).unwrap();
        state.reload_config(&path).unwrap();
        assert_eq!(state.config().kline_limit, 300);
        assert_eq!(state.config().default_interval, "4h");

        std::fs::write(&path, r#"{ "kline_limit": 0 }"#).unwrap();
        assert!(state.reload_config(&path).is_err());
        assert_eq!(state.config().kline_limit, 300);

        let _ = std::fs::remove_file(&path);
    }
}
