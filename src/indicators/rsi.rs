// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into a gain (max(d, 0)) and a loss (max(-d, 0)).
// Step 3 — Smooth gains and losses with Wilder's factor alpha = 1 / period:
//            avg_t = alpha * x_t + (1 - alpha) * avg_{t-1}
//          seeded with the first delta.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The first close has no delta, so RSI[0] is the neutral 50.
// =============================================================================

use super::window::{exponential_smooth, wilder_alpha};

/// Neutral RSI reading used when there has been no movement at all.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The returned vector has one RSI value per close.
///
/// # Edge cases
/// - Empty input => empty vec
/// - Single close => `[50.0]`
/// - Average loss zero with positive average gain => 100.0
/// - Average loss and gain both zero (flat market) => 50.0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if closes.is_empty() {
        return Vec::new();
    }

    // --- Price deltas --------------------------------------------------------
    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            (d.max(0.0), (-d).max(0.0))
        })
        .unzip();

    // --- Wilder's smoothing --------------------------------------------------
    let alpha = wilder_alpha(period);
    let avg_gain = exponential_smooth(&gains, alpha);
    let avg_loss = exponential_smooth(&losses, alpha);

    let mut result = Vec::with_capacity(closes.len());
    result.push(NEUTRAL_RSI);
    result.extend(
        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| rsi_from_averages(g, l)),
    );
    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement).
/// - If average loss is zero (only gains), RSI is 100.0.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            NEUTRAL_RSI
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
