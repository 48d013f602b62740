// =============================================================================
// Bot command parsing
// =============================================================================
//
//   /start
//   /help
//   /price <coingecko_id>
//   /analyze <symbol> [vs]
//
// Commands may carry a bot-username suffix (`/price@SignalDeskBot`), which is
// stripped. Text that is not a command yields `None` and is ignored.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Argument is missing when the user sent a bare `/price`.
    Price { coin_id: Option<String> },
    Analyze {
        symbol: Option<String>,
        quote: Option<String>,
    },
    Unknown(String),
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "price" => Self::Price {
                coin_id: args.first().map(|s| s.to_lowercase()),
            },
            "analyze" => Self::Analyze {
                symbol: args.first().map(|s| s.to_string()),
                quote: args.get(1).map(|s| s.to_uppercase()),
            },
            _ => Self::Unknown(name),
        };
        Some(command)
    }
}

pub const START_TEXT: &str = "👋 Welcome! Send /help to see the available commands.";

pub const HELP_TEXT: &str = "/price <coingecko_id> - spot price and 24h change\n\
/analyze <symbol> [vs] - full technical analysis (e.g. /analyze bitcoin usdt)";

pub const PRICE_USAGE: &str = "Send a coin id, for example: /price bitcoin";

pub const ANALYZE_USAGE: &str = "Example: /analyze bitcoin usdt";
