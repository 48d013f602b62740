// =============================================================================
// Update handling — command dispatch and replies
// =============================================================================

use tracing::{debug, error, info};

use super::commands::{Command, ANALYZE_USAGE, HELP_TEXT, PRICE_USAGE, START_TEXT};
use super::format::{format_price, format_report};
use super::types::Update;
use crate::app_state::AppState;
use crate::error::ServiceError;
use crate::service::{self, AnalyzeRequest};

/// Process one webhook delivery: parse the command, build the reply and send
/// it back to the originating chat.
pub async fn handle_update(state: &AppState, update: Update) {
    state.record_update();

    let Some((chat_id, text)) = update.text_message() else {
        debug!(update_id = update.update_id, "ignoring non-text update");
        return;
    };
    let Some(command) = Command::parse(text) else {
        debug!(update_id = update.update_id, "ignoring non-command message");
        return;
    };

    info!(chat_id, command = ?command, "command received");

    // fetching and scoring takes a moment; acknowledge first
    if let Command::Analyze {
        symbol: Some(symbol),
        ..
    } = &command
    {
        let notice = format!("⏳ Analyzing {symbol}, please wait...");
        if let Err(e) = state.telegram.send_message(chat_id, &notice).await {
            error!(chat_id, error = %e, "failed to send progress notice");
        }
    }

    let reply = respond(state, command).await;

    if let Err(e) = state.telegram.send_message(chat_id, &reply).await {
        error!(chat_id, error = %e, "failed to send reply");
    }
}

/// Reply text for `command`.
pub async fn respond(state: &AppState, command: Command) -> String {
    match command {
        Command::Start => START_TEXT.to_string(),
        Command::Help => HELP_TEXT.to_string(),
        Command::Unknown(name) => format!("Unknown command /{name}. Send /help for usage."),
        Command::Price { coin_id: None } => PRICE_USAGE.to_string(),
        Command::Price {
            coin_id: Some(coin_id),
        } => match service::spot_price(state, &coin_id, None).await {
            Ok(price) => format_price(&price),
            Err(e) => error_reply(&e),
        },
        Command::Analyze { symbol: None, .. } => ANALYZE_USAGE.to_string(),
        Command::Analyze {
            symbol: Some(symbol),
            quote,
        } => {
            let request = AnalyzeRequest {
                quote,
                ..AnalyzeRequest::new(symbol)
            };
            match service::analyze_symbol(state, &request).await {
                Ok(env) => format_report(&env.pair, &env.interval, &env.report),
                Err(e) => error_reply(&e),
            }
        }
    }
}

fn error_reply(err: &ServiceError) -> String {
    match err {
        ServiceError::NotEnoughCandles { pair, got, .. } => {
            format!("⚠️ Not enough data to analyze {pair} ({got} candles).")
        }
        ServiceError::InvalidSymbol(symbol) => {
            format!("⚠️ Unknown symbol: {symbol}. Check the symbol and try again.")
        }
        ServiceError::InvalidRequest(reason) => format!("⚠️ {reason}"),
        ServiceError::Analysis(e) => format!("⚠️ Analysis failed: {e}"),
        ServiceError::Upstream(e) => {
            error!(error = %e, "upstream request failed");
            "⚠️ Could not fetch market data right now, please try again later.".to_string()
        }
    }
}
