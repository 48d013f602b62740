// =============================================================================
// Runtime Configuration — indicator windows and bot settings with atomic save
// =============================================================================
//
// Two layers of configuration:
//
// * `RuntimeConfig` — tunables loaded from a JSON file. Every field carries
//   `#[serde(default)]` so that adding new fields never breaks loading an
//   older config file.
// * `BotSecrets` — credentials and deployment endpoints read once from the
//   process environment at startup and handed to the I/O clients explicitly.
//   The analysis engine never sees either.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::binance::is_valid_interval;

/// Binance rejects kline requests above this limit.
pub const MAX_KLINE_LIMIT: u32 = 1000;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_sma_short() -> usize {
    20
}

fn default_sma_long() -> usize {
    50
}

fn default_ema_fast() -> usize {
    9
}

fn default_ema_slow() -> usize {
    21
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_std() -> f64 {
    2.0
}

fn default_period_14() -> usize {
    14
}

fn default_smoothing_3() -> usize {
    3
}

fn default_volume_ma() -> usize {
    20
}

fn default_interval() -> String {
    "1h".to_string()
}

fn default_kline_limit() -> u32 {
    500
}

fn default_min_candles() -> usize {
    50
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Look-back windows of every indicator. Each one is independent: changing a
/// field only changes the corresponding indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,

    /// Window of the SMA used by the trend-vs-MA rule.
    #[serde(default = "default_sma_long")]
    pub sma_long: usize,

    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,

    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_std")]
    pub bollinger_std: f64,

    #[serde(default = "default_period_14")]
    pub rsi_period: usize,

    #[serde(default = "default_period_14")]
    pub stoch_k: usize,

    #[serde(default = "default_smoothing_3")]
    pub stoch_d: usize,

    /// %K window of Stochastic RSI (its RSI period is `rsi_period`).
    #[serde(default = "default_period_14")]
    pub stoch_rsi_k: usize,

    #[serde(default = "default_smoothing_3")]
    pub stoch_rsi_d: usize,

    #[serde(default = "default_period_14")]
    pub atr_period: usize,

    #[serde(default = "default_volume_ma")]
    pub volume_ma: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: default_sma_short(),
            sma_long: default_sma_long(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_period: default_bollinger_period(),
            bollinger_std: default_bollinger_std(),
            rsi_period: default_period_14(),
            stoch_k: default_period_14(),
            stoch_d: default_smoothing_3(),
            stoch_rsi_k: default_period_14(),
            stoch_rsi_d: default_smoothing_3(),
            atr_period: default_period_14(),
            volume_ma: default_volume_ma(),
        }
    }
}

impl IndicatorParams {
    /// Reject zero windows and a non-positive band multiplier.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("rsi_period", self.rsi_period),
            ("stoch_k", self.stoch_k),
            ("stoch_d", self.stoch_d),
            ("stoch_rsi_k", self.stoch_rsi_k),
            ("stoch_rsi_d", self.stoch_rsi_d),
            ("atr_period", self.atr_period),
            ("volume_ma", self.volume_ma),
        ];
        for (name, value) in windows {
            if value == 0 {
                bail!("indicator window `{name}` must be at least 1");
            }
        }
        if !(self.bollinger_std.is_finite() && self.bollinger_std > 0.0) {
            bail!(
                "bollinger_std must be a positive number, got {}",
                self.bollinger_std
            );
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the bot.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Indicator windows used by every analysis.
    #[serde(default)]
    pub indicators: IndicatorParams,

    /// Kline interval requested from Binance (e.g. "15m", "1h", "4h").
    #[serde(default = "default_interval")]
    pub default_interval: String,

    /// Number of candles requested per analysis.
    #[serde(default = "default_kline_limit")]
    pub kline_limit: u32,

    /// Below this many candles the bot refuses to report an analysis.
    #[serde(default = "default_min_candles")]
    pub min_candles: usize,

    /// Quote asset appended to bare symbols (`BTC` -> `BTCUSDT`).
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,

    /// CoinGecko `vs_currencies` value for spot prices.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            default_interval: default_interval(),
            kline_limit: default_kline_limit(),
            min_candles: default_min_candles(),
            quote_asset: default_quote_asset(),
            vs_currency: default_vs_currency(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path` and validate it.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid runtime config in {}", path.display()))?;

        info!(
            path = %path.display(),
            interval = %config.default_interval,
            kline_limit = config.kline_limit,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Startup loader. A missing file is seeded with the defaults; a file that
    /// fails to parse or validate is left untouched and the defaults are used
    /// in memory only.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => info!(path = %path.display(), "no runtime config found, wrote defaults"),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to write default runtime config"),
            }
            return config;
        }

        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %format!("{e:#}"), "failed to load runtime config, using defaults");
            Self::default()
        })
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.indicators.validate()?;
        if self.kline_limit == 0 || self.kline_limit > MAX_KLINE_LIMIT {
            bail!(
                "kline_limit must be within 1..={MAX_KLINE_LIMIT}, got {}",
                self.kline_limit
            );
        }
        if self.min_candles > self.kline_limit as usize {
            bail!(
                "min_candles ({}) exceeds kline_limit ({})",
                self.min_candles,
                self.kline_limit
            );
        }
        if !is_valid_interval(&self.default_interval) {
            bail!("unsupported default_interval `{}`", self.default_interval);
        }
        Ok(())
    }
}

// =============================================================================
// BotSecrets
// =============================================================================

/// Credentials and deployment endpoints, read once from the environment.
#[derive(Clone)]
pub struct BotSecrets {
    pub telegram_token: String,
    /// Public URL Telegram should deliver updates to. No webhook is
    /// registered when unset.
    pub webhook_url: Option<String>,
    /// Value Telegram echoes back in `X-Telegram-Bot-Api-Secret-Token`.
    pub webhook_secret: Option<String>,
    pub bind_addr: String,
}

impl BotSecrets {
    /// Read `TELEGRAM_TOKEN`, `WEBHOOK_URL`, `TELEGRAM_WEBHOOK_SECRET`,
    /// `BIND_ADDR` and `PORT` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let telegram_token =
            non_empty("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN is not set")?;

        let bind_addr = match non_empty("BIND_ADDR") {
            Some(addr) => addr,
            None => {
                let port = non_empty("PORT").unwrap_or_else(|| "5000".to_string());
                let port: u16 = port
                    .parse()
                    .with_context(|| format!("PORT is not a valid port number: {port}"))?;
                format!("0.0.0.0:{port}")
            }
        };

        Ok(Self {
            telegram_token,
            webhook_url: non_empty("WEBHOOK_URL"),
            webhook_secret: non_empty("TELEGRAM_WEBHOOK_SECRET"),
            bind_addr,
        })
    }
}

impl std::fmt::Debug for BotSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotSecrets")
            .field("telegram_token", &"<redacted>")
            .field("webhook_url", &self.webhook_url)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        let p = &cfg.indicators;
        assert_eq!((p.sma_short, p.sma_long), (20, 50));
        assert_eq!((p.ema_fast, p.ema_slow), (9, 21));
        assert_eq!((p.macd_fast, p.macd_slow, p.macd_signal), (12, 26, 9));
        assert_eq!(p.bollinger_period, 20);
        assert!((p.bollinger_std - 2.0).abs() < f64::EPSILON);
        assert_eq!(p.rsi_period, 14);
        assert_eq!((p.stoch_k, p.stoch_d), (14, 3));
        assert_eq!((p.stoch_rsi_k, p.stoch_rsi_d), (14, 3));
        assert_eq!(p.atr_period, 14);
        assert_eq!(p.volume_ma, 20);
        assert_eq!(cfg.default_interval, "1h");
        assert_eq!(cfg.kline_limit, 500);
        assert_eq!(cfg.min_candles, 50);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.indicators, IndicatorParams::default());
        assert_eq!(cfg.quote_asset, "USDT");
        assert_eq!(cfg.vs_currency, "usd");
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "indicators": { "rsi_period": 7 }, "default_interval": "4h" }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.indicators.rsi_period, 7);
        assert_eq!(cfg.indicators.sma_long, 50);
        assert_eq!(cfg.default_interval, "4h");
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut cfg = RuntimeConfig::default();
        cfg.indicators.stoch_d = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("stoch_d"));
    }

    #[test]
    fn validate_rejects_bad_limits() {
        let mut cfg = RuntimeConfig::default();
        cfg.kline_limit = 1500;
        assert!(cfg.validate().is_err());

        let mut cfg = RuntimeConfig::default();
        cfg.kline_limit = 40;
        assert!(cfg.validate().is_err(), "min_candles 50 > limit 40");

        let mut cfg = RuntimeConfig::default();
        cfg.indicators.bollinger_std = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = RuntimeConfig::default();
        cfg.default_interval = "90m".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("bot-config-{}.json", uuid::Uuid::new_v4()));
        let mut cfg = RuntimeConfig::default();
        cfg.indicators.ema_fast = 5;
        cfg.save(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.indicators.ema_fast, 5);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(RuntimeConfig::load("/nonexistent/bot_config.json").is_err());
    }

    fn temp_config_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("bot-config-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn load_or_default_seeds_missing_file() {
        let path = temp_config_path();
        let cfg = RuntimeConfig::load_or_default(&path);
        assert_eq!(cfg.kline_limit, 500);

        let written = RuntimeConfig::load(&path).unwrap();
        assert_eq!(written.indicators, IndicatorParams::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_leaves_broken_file_alone() {
        let path = temp_config_path();
        let broken = r#"{ "kline_limit": 5000, "indicators": { "rsi_period": 7 } }"#;
        std::fs::write(&path, broken).unwrap();

        let cfg = RuntimeConfig::load_or_default(&path);
        assert_eq!(cfg.kline_limit, 500);
        assert_eq!(cfg.indicators.rsi_period, 14);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);

        std::fs::write(&path, "{ not json").unwrap();
        let _ = RuntimeConfig::load_or_default(&path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
        let _ = std::fs::remove_file(&path);
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn secrets_require_token() {
        assert!(BotSecrets::from_lookup(env(&[])).is_err());
        assert!(BotSecrets::from_lookup(env(&[("TELEGRAM_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn secrets_bind_addr_from_port() {
        let s = BotSecrets::from_lookup(env(&[("TELEGRAM_TOKEN", "t"), ("PORT", "8080")])).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:8080");
        assert!(s.webhook_url.is_none());

        let s = BotSecrets::from_lookup(env(&[("TELEGRAM_TOKEN", "t")])).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:5000");

        let s = BotSecrets::from_lookup(env(&[
            ("TELEGRAM_TOKEN", "t"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap();
        assert_eq!(s.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn secrets_debug_redacts_token() {
        let s = BotSecrets::from_lookup(env(&[("TELEGRAM_TOKEN", "12345:secret")])).unwrap();
        assert!(!format!("{s:?}").contains("12345:secret"));
    }
}
