//! Small descriptive statistics used by the fit orchestration.

/// Arithmetic mean. Returns `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (`n − 1` denominator).
///
/// Returns `NaN` when fewer than two values are given.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n as f64 - 1.0)).sqrt()
}

/// Sample quantile at probability `p` (Hyndman–Fan definition 5).
///
/// Piecewise-linear interpolation between order statistics placed at
/// `(k − 0.5) / n`; probabilities below the first or above the last knot clamp
/// to the minimum or maximum. Returns `None` for an empty input.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let pos = n as f64 * p - 0.5;
    if pos <= 0.0 {
        return Some(sorted[0]);
    }
    if pos >= (n - 1) as f64 {
        return Some(sorted[n - 1]);
    }
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[lo + 1] - sorted[lo]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v) - 5.0).abs() < 1e-15);
        assert!((sample_std_dev(&v) - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(sample_std_dev(&[1.0]).is_nan());
    }

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let v = [3.0, 1.0, 4.0, 2.0];
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(4.0));
        // pos = 4 * 0.3 - 0.5 = 0.7 → 1 + 0.7 * (2 - 1)
        assert!((quantile(&v, 0.3).unwrap() - 1.7).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn odd_length_median_is_the_middle_value() {
        let v = [9.0, -1.0, 3.0, 7.0, 0.0];
        assert_eq!(quantile(&v, 0.5), Some(3.0));
    }
}
