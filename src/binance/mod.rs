pub mod client;
pub mod symbols;

pub use client::{BinanceApiError, BinanceClient};
pub use symbols::{is_valid_interval, is_valid_pair, symbol_to_pair};
