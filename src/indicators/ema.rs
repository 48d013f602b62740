// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is the first close itself, so the series is defined from
// index 0 and has the same length as the input.
// =============================================================================

use super::window::{ema_alpha, exponential_smooth};

/// Compute the EMA series for `values` and look-back `period`.
///
/// # Edge cases
/// - Empty input => empty vec
/// - `period == 0` behaves like `period == 1` (the series is returned as-is)
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    exponential_smooth(values, ema_alpha(period))
}
