// =============================================================================
// Symbol mapping — human-friendly coin names to Binance trading pairs
// =============================================================================

/// Common names and tickers mapped to their Binance base asset.
const BASE_ASSETS: &[(&str, &str)] = &[
    ("BITCOIN", "BTC"),
    ("BTC", "BTC"),
    ("ETHEREUM", "ETH"),
    ("ETH", "ETH"),
    ("BNB", "BNB"),
    ("ADA", "ADA"),
    ("XRP", "XRP"),
    ("DOGE", "DOGE"),
    ("SOL", "SOL"),
    ("DOT", "DOT"),
];

/// Map `symbol` + quote asset `vs` to a Binance pair, e.g.
/// `("bitcoin", "usdt") -> "BTCUSDT"`.
///
/// Unknown symbols are upper-cased and used as the base asset unchanged.
pub fn symbol_to_pair(symbol: &str, vs: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    let base = BASE_ASSETS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, base)| (*base).to_string())
        .unwrap_or(upper);
    format!("{base}{}", vs.trim().to_uppercase())
}

/// Whether `pair` only contains characters Binance accepts in a symbol.
pub fn is_valid_pair(pair: &str) -> bool {
    (2..=20).contains(&pair.len())
        && pair
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Kline intervals accepted by `GET /api/v3/klines`.
pub const KLINE_INTERVALS: &[&str] = &[
    "1s", "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w",
    "1M",
];

pub fn is_valid_interval(interval: &str) -> bool {
    KLINE_INTERVALS.contains(&interval)
}
