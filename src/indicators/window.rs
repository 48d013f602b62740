// =============================================================================
// Windowed Aggregation Helpers
// =============================================================================
//
// Every indicator in this crate produces an output series aligned 1:1 with its
// input. Near the start of a series there is not yet a full window of history,
// so each trailing window is clamped to whatever points are available instead
// of being left undefined. Exponential smoothing needs no clamping: it is
// seeded with the first value and is recursive from index 0.
//
// A window of zero is treated as a window of one.
// =============================================================================

/// The trailing window of at most `window` values ending at index `end`
/// (inclusive).
///
/// # Panics
/// If `end` is out of bounds for `values`.
pub fn trailing(values: &[f64], end: usize, window: usize) -> &[f64] {
    let start = (end + 1).saturating_sub(window.max(1));
    &values[start..=end]
}

/// Arithmetic mean of each trailing window.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| mean(trailing(values, i, window)))
        .collect()
}

/// Sample standard deviation (n - 1 denominator) of each trailing window.
///
/// A window holding a single point has no spread and yields 0.
pub fn rolling_sample_std(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| sample_std(trailing(values, i, window)))
        .collect()
}

/// Minimum of each trailing window.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| trailing(values, i, window).iter().copied().fold(f64::INFINITY, f64::min))
        .collect()
}

/// Maximum of each trailing window.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            trailing(values, i, window)
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect()
}

/// Recursive exponential smoothing seeded with the first value:
///
/// ```text
/// out[0] = x[0]
/// out[i] = alpha * x[i] + (1 - alpha) * out[i-1]
/// ```
pub fn exponential_smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => alpha * x + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Smoothing factor of a classic EMA: `2 / (window + 1)`.
pub fn ema_alpha(window: usize) -> f64 {
    2.0 / (window.max(1) as f64 + 1.0)
}

/// Smoothing factor of Wilder's moving average: `1 / window`.
pub fn wilder_alpha(window: usize) -> f64 {
    1.0 / window.max(1) as f64
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_clamps_at_series_start() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing(&v, 0, 3), &[1.0]);
        assert_eq!(trailing(&v, 1, 3), &[1.0, 2.0]);
        assert_eq!(trailing(&v, 3, 3), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn trailing_zero_window_is_one_point() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(trailing(&v, 2, 0), &[3.0]);
    }

    #[test]
    fn rolling_mean_uses_available_points() {
        let v = [2.0, 4.0, 6.0, 8.0];
        let m = rolling_mean(&v, 3);
        assert_eq!(m, vec![2.0, 3.0, 4.0, 6.0]);
    }

    #[test]
    fn rolling_std_single_point_is_zero() {
        let s = rolling_sample_std(&[5.0, 7.0], 20);
        assert_eq!(s[0], 0.0);
        // sample std of {5, 7} = sqrt(2)
        assert!((s[1] - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn rolling_min_max_track_window() {
        let v = [3.0, 1.0, 4.0, 1.5, 5.0];
        assert_eq!(rolling_min(&v, 2), vec![3.0, 1.0, 1.0, 1.5, 1.5]);
        assert_eq!(rolling_max(&v, 2), vec![3.0, 3.0, 4.0, 4.0, 5.0]);
    }

    #[test]
    fn smoothing_is_seeded_with_first_value() {
        let s = exponential_smooth(&[10.0, 20.0], 0.5);
        assert_eq!(s, vec![10.0, 15.0]);
        assert!(exponential_smooth(&[], 0.5).is_empty());
    }

    #[test]
    fn alphas() {
        assert!((ema_alpha(9) - 0.2).abs() < 1e-12);
        assert!((wilder_alpha(14) - 1.0 / 14.0).abs() < 1e-12);
        assert_eq!(wilder_alpha(0), 1.0);
    }
}
