// =============================================================================
// Volume Indicators — On-Balance Volume & Volume Moving Average
// =============================================================================
//
// OBV_0 = 0
// OBV_t = OBV_{t-1} + sign(close_t - close_{t-1}) * volume_t
//
// An unchanged close contributes nothing.

use super::window::rolling_mean;

/// Cumulative on-balance volume. `close` and `volume` must be index-aligned.
pub fn calculate_obv(close: &[f64], volume: &[f64]) -> Vec<f64> {
    debug_assert_eq!(close.len(), volume.len());

    let mut out = Vec::with_capacity(close.len());
    let mut total = 0.0;
    for i in 0..close.len() {
        if i > 0 {
            let delta = close[i] - close[i - 1];
            if delta > 0.0 {
                total += volume[i];
            } else if delta < 0.0 {
                total -= volume[i];
            }
        }
        out.push(total);
    }
    out
}

/// Simple moving average of traded volume.
pub fn calculate_volume_ma(volume: &[f64], window: usize) -> Vec<f64> {
    rolling_mean(volume, window)
}
