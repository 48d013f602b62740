// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================

use super::window::rolling_mean;

/// SMA series over `window` values.
///
/// Indices with fewer than `window` points of history average everything
/// seen so far, so the output is always the same length as `values`.
pub fn calculate_sma(values: &[f64], window: usize) -> Vec<f64> {
    rolling_mean(values, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 20).is_empty());
    }

    #[test]
    fn sma_window_longer_than_series_is_full_mean() {
        let closes = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = calculate_sma(&closes, 50);
        assert_eq!(sma.len(), closes.len());
        assert!((sma[4] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn sma_known_values() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let sma = calculate_sma(&closes, 4);
        // mean of 7, 8, 9, 10
        assert!((sma[9] - 8.5).abs() < 1e-12);
        // warm-up: mean of 1, 2
        assert!((sma[1] - 1.5).abs() < 1e-12);
    }
}
