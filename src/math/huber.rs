//! Huber-smoothed derivative of the check loss.
//!
//! The check loss has a kink at zero. Replacing it on `[−μ, μ]` with a quadratic
//! gives a continuously differentiable objective whose derivative is
//!
//! ```text
//!          ⎧ τ            r >  μ
//! ψ(r)  =  ⎨ τ − 1        r < −μ
//!          ⎪ r·τ/μ        0 ≤ r ≤ μ
//!          ⎩ r·(τ−1)/μ   −μ ≤ r < 0
//! ```
//!
//! Outside the band this is exactly the check-loss subgradient; inside it the
//! derivative is linear, so `μ → 0` recovers the non-smooth problem.

use nalgebra::{DMatrix, DVector};

/// Smoothed derivative of the check loss at residual `r`.
///
/// `mu` must be strictly positive. The interior branches are only reached for
/// `|r| <= mu`, so the division stays finite even for `mu = 1e-15`.
#[inline]
pub fn smoothed_derivative(r: f64, tau: f64, mu: f64) -> f64 {
    if r > mu {
        tau
    } else if r < -mu {
        tau - 1.0
    } else if r >= 0.0 {
        r * tau / mu
    } else {
        r * (tau - 1.0) / mu
    }
}

/// Refresh `derivs` from `resid` and write `grad = x_t · derivs / n` in place.
///
/// `x_t` is the transposed design (p × n). Both output buffers must already be
/// sized (`derivs`: n, `grad`: p).
pub fn update_huber_grad(
    x_t: &DMatrix<f64>,
    resid: &DVector<f64>,
    derivs: &mut DVector<f64>,
    grad: &mut DVector<f64>,
    tau: f64,
    mu: f64,
    one_over_n: f64,
) {
    for (d, &r) in derivs.iter_mut().zip(resid.iter()) {
        *d = smoothed_derivative(r, tau, mu);
    }
    grad.gemv(one_over_n, x_t, &*derivs, 0.0);
}
