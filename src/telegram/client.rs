// =============================================================================
// Telegram Bot API Client
// =============================================================================
//
// SECURITY: the bot token is part of every request path; it is never logged
// and the `Debug` impl redacts it.
// =============================================================================

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, info, instrument};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Telegram caps a single message at 4096 UTF-16 code units.
pub const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Clone)]
pub struct TelegramClient {
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// POST a Bot API method and fail on `ok: false` or a non-2xx status.
    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Telegram {method} request failed"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse Telegram {method} response"))?;

        if !status.is_success() || body["ok"].as_bool() != Some(true) {
            anyhow::bail!(
                "Telegram {} returned {}: {}",
                method,
                status,
                body["description"].as_str().unwrap_or("no description")
            );
        }
        Ok(body)
    }

    /// Send a plain-text message, truncated to Telegram's length limit.
    #[instrument(skip(self, text), name = "telegram::send_message")]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let text = truncate_message(text);
        self.call("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        debug!(chat_id, "message sent");
        Ok(())
    }

    /// Register `url` as the webhook. Telegram will echo `secret` back in the
    /// `X-Telegram-Bot-Api-Secret-Token` header of every delivery.
    #[instrument(skip(self, secret), name = "telegram::set_webhook")]
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<()> {
        let mut payload = json!({ "url": url });
        if let Some(secret) = secret {
            payload["secret_token"] = json!(secret);
        }
        self.call("setWebhook", payload).await?;
        info!(url, "webhook registered");
        Ok(())
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Cut `text` to at most [`MAX_MESSAGE_CHARS`] characters.
fn truncate_message(text: &str) -> std::borrow::Cow<'_, str> {
    match text.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((byte_idx, _)) => text[..byte_idx].to_string().into(),
        None => text.into(),
    }
}
