// =============================================================================
// Signal Desk Bot — Main Entry Point
// =============================================================================
//
// Serves the JSON API and the Telegram webhook from one axum server. The
// webhook is registered with Telegram at startup when `WEBHOOK_URL` is set.
// SIGHUP re-reads the runtime config file.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod binance;
mod coingecko;
mod engine;
mod envelope;
mod error;
mod indicators;
mod levels;
mod market_data;
mod report;
mod runtime_config;
mod service;
mod signals;
mod telegram;

use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::{BotSecrets, RuntimeConfig};

const DEFAULT_CONFIG_PATH: &str = "bot_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Signal Desk Bot starting up");

    let config_path =
        std::env::var("BOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = RuntimeConfig::load_or_default(&config_path);

    let secrets = BotSecrets::from_env()?;
    info!(
        bind_addr = %secrets.bind_addr,
        webhook = secrets.webhook_url.is_some(),
        interval = %config.default_interval,
        kline_limit = config.kline_limit,
        "Configuration ready"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config, &secrets));

    // ── 3. Register the Telegram webhook ─────────────────────────────────
    match &secrets.webhook_url {
        Some(url) => {
            if let Err(e) = state
                .telegram
                .set_webhook(url, secrets.webhook_secret.as_deref())
                .await
            {
                error!(error = %e, "Failed to register Telegram webhook");
            }
        }
        None => warn!("WEBHOOK_URL not set; Telegram updates will not be delivered"),
    }

    // ── 4. Reload config on SIGHUP ───────────────────────────────────────
    #[cfg(unix)]
    {
        let state = state.clone();
        let path = config_path.clone();
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            let mut hangups = match signal(SignalKind::hangup()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGHUP handler");
                    return;
                }
            };
            while hangups.recv().await.is_some() {
                if let Err(e) = state.reload_config(&path) {
                    warn!(path = %path, error = %format!("{e:#}"), "Config reload failed, keeping current config");
                }
            }
        });
    }

    // ── 5. HTTP server ───────────────────────────────────────────────────
    let app = api::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&secrets.bind_addr).await?;
    info!(addr = %secrets.bind_addr, "HTTP server listening");

    // ── 6. Serve until Ctrl+C ────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await?;

    info!(
        analyses_served = state.analyses_served(),
        updates_received = state.updates_received(),
        "Signal Desk Bot shut down complete."
    );
    Ok(())
}
