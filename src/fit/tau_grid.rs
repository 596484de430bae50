//! Fitting several quantile levels on the same data.
//!
//! Each level is an independent fit; the grid is evaluated in order so the
//! results are deterministic and line up with the requested levels.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitOptions, QuantileFit};
use crate::error::{FitError, FitResult};
use crate::fit::fitter::fit_model;
use crate::resample::Subsample;

/// Generate `steps` evenly spaced quantile levels between `min` and `max`
/// (inclusive), all strictly inside `(0, 1)`.
pub fn tau_grid(min: f64, max: f64, steps: usize) -> FitResult<Vec<f64>> {
    if !(min.is_finite() && min > 0.0 && min < 1.0) {
        return Err(FitError::invalid("tau_min", min, "must lie strictly inside (0, 1)"));
    }
    if !(max.is_finite() && max > min && max < 1.0) {
        return Err(FitError::invalid("tau_max", max, "must lie in (tau_min, 1)"));
    }
    if steps < 2 {
        return Err(FitError::invalid("tau_steps", steps as f64, "must be >= 2"));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// Fit every level in `taus`, sharing all other options with `base`.
pub fn fit_tau_grid(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    init_beta: &DVector<f64>,
    warm_start: Option<&Subsample>,
    base: &FitOptions,
    taus: &[f64],
) -> FitResult<Vec<QuantileFit>> {
    taus.iter()
        .map(|&tau| {
            let opts = FitOptions { tau, ..base.clone() };
            fit_model(x, y, init_beta, warm_start, &opts)
        })
        .collect()
}
