// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators used by
// the analysis engine. Every function maps index-aligned input slices to an
// output series of the same length: warm-up indices are computed over the
// history available so far instead of being dropped, and zero denominators
// resolve to neutral values instead of NaN.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;
pub mod window;

pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdSeries};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::{calculate_stochastic, calculate_stochastic_rsi, StochasticSeries};
pub use volume::{calculate_obv, calculate_volume_ma};
