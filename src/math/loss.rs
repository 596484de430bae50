//! Pinball (check) loss.
//!
//! ```text
//! ρ_τ(r) = r · (τ − 1[r < 0])
//! ```
//!
//! Positive residuals are charged `τ` per unit, negative residuals `1 − τ` per
//! unit, so the minimizer of `Σ ρ_τ(y_i − q)` over `q` is the τ-quantile of `y`.

use nalgebra::DVector;

/// Check loss of a single residual.
#[inline]
pub fn check(r: f64, tau: f64) -> f64 {
    if r < 0.0 { r * (tau - 1.0) } else { r * tau }
}

/// Summed check loss over a residual vector.
pub fn check_loss(resid: &DVector<f64>, tau: f64) -> f64 {
    resid.iter().map(|&r| check(r, tau)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_is_asymmetric_absolute_value() {
        assert!((check(2.0, 0.25) - 0.5).abs() < 1e-15);
        assert!((check(-2.0, 0.25) - 1.5).abs() < 1e-15);
        assert_eq!(check(0.0, 0.25), 0.0);

        // tau = 0.5 is half the absolute value.
        for &r in &[-3.0, -0.1, 0.0, 0.7, 12.0] {
            assert!((check(r, 0.5) - 0.5 * f64::abs(r)).abs() < 1e-15);
        }
    }

    #[test]
    fn check_loss_is_non_negative_and_zero_only_at_origin() {
        let zero = DVector::zeros(5);
        assert_eq!(check_loss(&zero, 0.3), 0.0);

        let r = DVector::from_vec(vec![0.0, 0.0, -1e-9, 0.0]);
        assert!(check_loss(&r, 0.3) > 0.0);

        for &tau in &[0.05, 0.5, 0.95] {
            let r = DVector::from_vec(vec![-4.0, -0.5, 0.0, 0.25, 3.0]);
            assert!(check_loss(&r, tau) > 0.0);
        }
    }

    #[test]
    fn check_loss_is_convex_along_a_segment() {
        let a = DVector::from_vec(vec![-2.0, 1.0, 0.5, -0.1]);
        let b = DVector::from_vec(vec![1.0, -3.0, 0.2, 0.4]);
        let tau = 0.8;
        for k in 0..=10 {
            let t = k as f64 / 10.0;
            let mid = &a * (1.0 - t) + &b * t;
            let lhs = check_loss(&mid, tau);
            let rhs = (1.0 - t) * check_loss(&a, tau) + t * check_loss(&b, tau);
            assert!(lhs <= rhs + 1e-12, "convexity violated at t={t}: {lhs} > {rhs}");
        }
    }
}
