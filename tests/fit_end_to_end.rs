//! End-to-end behavior of the quantile fit on synthetic data.

use huber_quantreg::math::check;
use huber_quantreg::{
    FitError, FitOptions, Intercept, Subsample, fit_model, fit_model_interruptible, fit_tau_grid,
};
use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

/// `y = a + b·x + N(0, sd)` with `x ~ U(lo, hi)`; column 0 is the intercept
/// placeholder.
fn line(
    n: usize,
    a: f64,
    b: f64,
    lo: f64,
    hi: f64,
    sd: f64,
    seed: u64,
) -> (DMatrix<f64>, DVector<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sd).unwrap();
    let mut x = DMatrix::zeros(n, 2);
    let mut y = DVector::zeros(n);
    for i in 0..n {
        let xi: f64 = rng.gen_range(lo..hi);
        x[(i, 0)] = 1.0;
        x[(i, 1)] = xi;
        y[i] = a + b * xi + noise.sample(&mut rng);
    }
    (x, y)
}

fn line_loss(x: &DMatrix<f64>, y: &DVector<f64>, a: f64, b: f64, tau: f64) -> f64 {
    (0..y.len()).map(|i| check(y[i] - a - b * x[(i, 1)], tau)).sum()
}

/// Exact least-absolute-deviation line: some optimal line interpolates two
/// observations, so searching all pairs finds the minimum.
fn lad_by_enumeration(x: &DMatrix<f64>, y: &DVector<f64>) -> (f64, f64, f64) {
    let n = y.len();
    let mut best = (0.0, 0.0, f64::INFINITY);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[(j, 1)] - x[(i, 1)];
            if dx.abs() < 1e-12 {
                continue;
            }
            let b = (y[j] - y[i]) / dx;
            let a = y[i] - b * x[(i, 1)];
            let loss = line_loss(x, y, a, b, 0.5);
            if loss < best.2 {
                best = (a, b, loss);
            }
        }
    }
    best
}

#[test]
fn recovers_intercept_and_slope_of_a_noisy_line() {
    let (x, y) = line(500, 2.0, 3.0, 0.0, 10.0, 0.5, 2024);
    let opts = FitOptions {
        tau: 0.5,
        intercept: Intercept::Column(1),
        ..FitOptions::default()
    };

    let fit = fit_model(&x, &y, &DVector::zeros(2), None, &opts).unwrap();

    let (a, b) = (fit.coefficients[0], fit.coefficients[1]);
    assert!((a - 2.0).abs() < 0.3, "intercept {a}");
    assert!((b - 3.0).abs() < 0.3, "slope {b}");
    assert!(fit.solve.loss.is_finite());
}

#[test]
fn median_fit_with_tiny_smoothing_matches_exact_lad() {
    let (x, y) = line(201, 1.0, 0.5, -2.0, 2.0, 1.0, 77);
    let (a_lad, b_lad, loss_lad) = lad_by_enumeration(&x, &y);

    let fit = fit_model(&x, &y, &DVector::zeros(2), None, &FitOptions::new(0.5)).unwrap();
    let (a, b) = (fit.coefficients[0], fit.coefficients[1]);
    let loss = line_loss(&x, &y, a, b, 0.5);

    assert!(loss <= loss_lad * 1.01, "loss {loss} vs LAD {loss_lad}");
    assert!((a - a_lad).abs() < 0.15, "intercept {a} vs {a_lad}");
    assert!((b - b_lad).abs() < 0.08, "slope {b} vs {b_lad}");
}

#[test]
fn fitted_quantile_lines_rise_with_tau() {
    let (x, y) = line(400, 1.0, 2.0, 0.0, 5.0, 1.0, 9);
    let taus = [0.1, 0.5, 0.9];

    let base = FitOptions::default();
    let fits = fit_tau_grid(&x, &y, &DVector::zeros(2), None, &base, &taus).unwrap();

    let x_bar = x.column(1).mean();
    let at_center: Vec<f64> = fits
        .iter()
        .map(|f| f.coefficients[0] + f.coefficients[1] * x_bar)
        .collect();
    assert!(at_center[0] < at_center[1] && at_center[1] < at_center[2], "{at_center:?}");

    let intercepts: Vec<f64> = fits.iter().map(|f| f.coefficients[0]).collect();
    assert!(intercepts[0] < intercepts[1] && intercepts[1] < intercepts[2], "{intercepts:?}");
}

#[test]
fn warm_start_lands_near_the_cold_fit() {
    let (x, y) = line(1_000, -1.0, 0.75, -3.0, 3.0, 1.0, 31);
    let mut rng = StdRng::seed_from_u64(5);
    let sub = Subsample::draw(&x, &y, 200, &mut rng).unwrap();
    let opts = FitOptions::new(0.5);

    let cold = fit_model(&x, &y, &DVector::zeros(2), None, &opts).unwrap();
    let warm = fit_model(&x, &y, &DVector::zeros(2), Some(&sub), &opts).unwrap();

    assert!(warm.warm_start.is_some());
    assert!((warm.coefficients[0] - cold.coefficients[0]).abs() < 0.1);
    assert!((warm.coefficients[1] - cold.coefficients[1]).abs() < 0.1);
}

#[test]
fn intercept_in_second_column_is_reported_there() {
    let (x, y) = line(300, 4.0, -1.5, 0.0, 4.0, 0.5, 12);
    // Swap to [x, placeholder].
    let swapped = DMatrix::from_fn(x.nrows(), 2, |i, j| x[(i, 1 - j)]);
    let opts = FitOptions {
        intercept: Intercept::Column(2),
        ..FitOptions::default()
    };

    let fit = fit_model(&swapped, &y, &DVector::zeros(2), None, &opts).unwrap();

    assert!((fit.coefficients[0] + 1.5).abs() < 0.3, "slope {}", fit.coefficients[0]);
    assert!((fit.coefficients[1] - 4.0).abs() < 0.3, "intercept {}", fit.coefficients[1]);
    assert!(fit.design.column(1).iter().all(|&v| v == 1.0));
}

#[test]
fn interrupt_during_long_solve_fails_the_fit() {
    let (x, y) = line(300, 0.0, 1.0, -1.0, 1.0, 1.0, 3);
    let opts = FitOptions {
        max_iter: 10_000,
        beta_tol: 0.0,
        check_tol: 0.0,
        ..FitOptions::default()
    };
    let abort_from_150 = |iteration: usize| iteration >= 150;

    let result = fit_model_interruptible(&x, &y, &DVector::zeros(2), None, &opts, &abort_from_150);

    assert_eq!(result.unwrap_err(), FitError::Cancelled { iteration: 200 });
}
