// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the sample standard deviation of the
// same trailing window. During warm-up the window shrinks to the available
// points; a single point has σ = 0 so all three bands coincide.

use super::window::{rolling_mean, rolling_sample_std};

/// Aligned Bollinger band series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Calculate Bollinger Bands for the given closing prices.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerBands {
    let middle = rolling_mean(closes, period);
    let std = rolling_sample_std(closes, period);

    let upper = middle.iter().zip(&std).map(|(m, s)| m + num_std * s).collect();
    let lower = middle.iter().zip(&std).map(|(m, s)| m - num_std * s).collect();

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(bb: &BollingerBands, i: usize) -> f64 {
        bb.upper[i] - bb.lower[i]
    }

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        let last = closes.len() - 1;
        assert!(bb.upper[last] > bb.middle[last]);
        assert!(bb.lower[last] < bb.middle[last]);
        assert!((bb.middle[last] - 10.5).abs() < 1e-12);
        assert!(width(&bb, last) > 0.0);
    }

    #[test]
    fn bollinger_short_series_is_defined() {
        let bb = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert_eq!(bb.upper.len(), 3);
        // first point: zero spread
        assert_eq!(bb.upper[0], 1.0);
        assert_eq!(bb.lower[0], 1.0);
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, 20, 2.0);
        for i in 0..closes.len() {
            assert!(width(&bb, i).abs() < 1e-10);
        }
    }

    #[test]
    fn bollinger_width_scales_with_multiplier() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + (i % 5) as f64).collect();
        let one = calculate_bollinger(&closes, 20, 1.0);
        let two = calculate_bollinger(&closes, 20, 2.0);
        assert!((width(&two, 29) - 2.0 * width(&one, 29)).abs() < 1e-10);
    }
}
