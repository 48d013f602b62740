// =============================================================================
// Stochastic Oscillator & Stochastic RSI
// =============================================================================
//
// %K = 100 * (close - lowest_low(k)) / (highest_high(k) - lowest_low(k))
// %D = SMA(%K, d)
//
// A zero high-low range means there is no position to measure inside the
// range, so %K falls back to the neutral 50.
//
// Stochastic RSI runs the same formula over the RSI series, using the RSI value
// as close, high and low at once.
// =============================================================================

use super::rsi::calculate_rsi;
use super::window::{rolling_max, rolling_mean, rolling_min};

const NEUTRAL: f64 = 50.0;

/// Aligned %K / %D series, both bounded to [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Classic stochastic oscillator over high/low/close.
///
/// All three slices must be index-aligned and the same length.
pub fn calculate_stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_window: usize,
    d_window: usize,
) -> StochasticSeries {
    debug_assert!(high.len() == close.len() && low.len() == close.len());

    let highest = rolling_max(high, k_window);
    let lowest = rolling_min(low, k_window);

    let k: Vec<f64> = close
        .iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(&c, (&hh, &ll))| percent_k(c, hh, ll))
        .collect();
    let d = rolling_mean(&k, d_window);

    StochasticSeries { k, d }
}

/// Stochastic oscillator applied to the RSI(`rsi_period`) series.
pub fn calculate_stochastic_rsi(
    closes: &[f64],
    rsi_period: usize,
    k_window: usize,
    d_window: usize,
) -> StochasticSeries {
    let rsi = calculate_rsi(closes, rsi_period);
    calculate_stochastic(&rsi, &rsi, &rsi, k_window, d_window)
}

fn percent_k(close: f64, highest: f64, lowest: f64) -> f64 {
    let range = highest - lowest;
    if range == 0.0 {
        return NEUTRAL;
    }
    // A close outside its own candle's range (inconsistent feed data) is pinned
    // to the edge of the oscillator.
    (100.0 * (close - lowest) / range).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_bounds(values: &[f64]) -> bool {
        values.iter().all(|v| (0.0..=100.0).contains(v))
    }

    #[test]
    fn stochastic_flat_range_is_neutral() {
        let v = vec![10.0; 20];
        let s = calculate_stochastic(&v, &v, &v, 14, 3);
        assert!(s.k.iter().all(|&k| k == 50.0));
        assert!(s.d.iter().all(|&d| d == 50.0));
    }

    #[test]
    fn stochastic_close_at_high_is_100() {
        let high = vec![11.0, 12.0, 13.0, 14.0];
        let low = vec![9.0, 10.0, 11.0, 12.0];
        let close = high.clone();
        let s = calculate_stochastic(&high, &low, &close, 14, 3);
        // lowest low = 9, highest high = 14, close = 14
        assert!((s.k[3] - 100.0).abs() < 1e-12);
        assert!(in_bounds(&s.k) && in_bounds(&s.d));
    }

    #[test]
    fn stochastic_known_value() {
        let high = vec![10.0, 12.0];
        let low = vec![8.0, 9.0];
        let close = vec![9.0, 11.0];
        let s = calculate_stochastic(&high, &low, &close, 14, 3);
        // range 8..12, close 11 => 75
        assert!((s.k[1] - 75.0).abs() < 1e-12);
        // k[0]: range 8..10, close 9 => 50 ; d[1] = (50 + 75) / 2
        assert!((s.d[1] - 62.5).abs() < 1e-12);
    }

    #[test]
    fn stochastic_close_outside_range_is_clamped() {
        let s = calculate_stochastic(&[10.0], &[8.0], &[11.0], 14, 3);
        assert_eq!(s.k[0], 100.0);
    }

    #[test]
    fn stochastic_rsi_bounded_and_aligned() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        let s = calculate_stochastic_rsi(&closes, 14, 14, 3);
        assert_eq!(s.k.len(), closes.len());
        assert_eq!(s.d.len(), closes.len());
        assert!(in_bounds(&s.k) && in_bounds(&s.d));
    }

    #[test]
    fn stochastic_rsi_of_constant_rsi_is_neutral() {
        // Strictly rising closes: RSI is 50 then 100 forever. Once the window
        // only holds 100s the range is zero.
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let s = calculate_stochastic_rsi(&closes, 14, 14, 3);
        assert_eq!(*s.k.last().unwrap(), 50.0);
    }
}
