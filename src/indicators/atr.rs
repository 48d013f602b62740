// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR_0 = H_0 - L_0                          (no previous close yet)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is the Wilder-smoothed average of TR, seeded with TR_0:
//   ATR_0 = TR_0
//   ATR_t = TR_t / period + ATR_{t-1} * (1 - 1 / period)
//
// Default period: 14
// =============================================================================

use super::window::{exponential_smooth, wilder_alpha};

/// True range of every bar. Slices must be index-aligned.
pub fn calculate_true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    debug_assert!(high.len() == close.len() && low.len() == close.len());

    (0..close.len())
        .map(|i| {
            let hl = high[i] - low[i];
            if i == 0 {
                return hl;
            }
            let prev_close = close[i - 1];
            let hc = (high[i] - prev_close).abs();
            let lc = (low[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// Compute the ATR series using Wilder's smoothing over `period`.
pub fn calculate_atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let tr = calculate_true_range(high, low, close);
    exponential_smooth(&tr, wilder_alpha(period))
}
