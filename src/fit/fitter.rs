//! Top-level quantile fit.
//!
//! Given the caller's design `X` (n × p, optionally with a placeholder intercept
//! column), response `y` and starting coefficients, we:
//!
//! - drop the placeholder column and z-score the remaining predictors
//! - center `y` and prepend a ones column when an intercept is requested
//! - optionally warm start on a subsample (same standardization, capped at
//!   [`WARM_START_MAX_ITER`] iterations)
//! - initialize the intercept at the τ-quantile of the partial residuals
//! - solve on the full data
//! - map coefficients and the design back to the caller's units and layout

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{FitOptions, QuantileFit};
use crate::error::{FitError, FitResult};
use crate::fit::reorder::{reorder_coefficients, reorder_columns};
use crate::fit::standardize::Standardization;
use crate::math::{mean, quantile};
use crate::resample::Subsample;
use crate::solver::{Design, Interrupt, NoInterrupt, SolverControls, huber_descent};

/// Iteration cap for the subsample warm start, regardless of `max_iter`.
pub const WARM_START_MAX_ITER: usize = 100;

/// Fit a smoothed quantile regression.
///
/// `init_beta` has one entry per column of `x`. Passing a `warm_start`
/// subsample first solves on those rows and uses the result as the starting
/// point for the full fit.
pub fn fit_model(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    init_beta: &DVector<f64>,
    warm_start: Option<&Subsample>,
    opts: &FitOptions,
) -> FitResult<QuantileFit> {
    fit_model_interruptible(x, y, init_beta, warm_start, opts, &NoInterrupt)
}

/// [`fit_model`] with a cancellation hook consulted every
/// [`crate::solver::CHECK_INTERVAL`] solver iterations.
pub fn fit_model_interruptible(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    init_beta: &DVector<f64>,
    warm_start: Option<&Subsample>,
    opts: &FitOptions,
    interrupt: &dyn Interrupt,
) -> FitResult<QuantileFit> {
    opts.validate()?;
    validate_inputs(x, y, init_beta, warm_start, opts)?;

    let intercept = opts.intercept.position();
    debug!(
        n = x.nrows(),
        p = x.ncols(),
        tau = opts.tau,
        ?intercept,
        warm_start = warm_start.is_some(),
        "fitting quantile model"
    );

    let stats = Standardization::from_columns(&strip_placeholder(x.clone(), intercept))
        .map_err(|e| to_caller_column(e, intercept))?;
    let y_mean = mean(y.as_slice());

    let (design, y_work) = prepare(x, y, &stats, intercept, y_mean);
    let controls = SolverControls::from_options(opts);

    let mut beta = init_beta.clone();
    let warm_summary = match warm_start {
        Some(sub) => {
            let (sub_design, sub_y) = prepare(sub.x(), sub.y(), &stats, intercept, y_mean);
            let warm_controls = controls.with_max_iter(WARM_START_MAX_ITER);
            let out = huber_descent(&sub_y, &sub_design, beta, &warm_controls, interrupt)?;
            debug!(
                num_samples = sub.num_samples(),
                iterations = out.summary.iterations,
                loss = out.summary.loss,
                "warm start finished"
            );
            beta = out.beta;
            Some(out.summary)
        }
        None => None,
    };

    if intercept.is_some() {
        beta[0] = initial_intercept(&y_work, design.x(), &beta, opts.tau);
    }

    let out = huber_descent(&y_work, &design, beta, &controls, interrupt)?;
    debug!(
        iterations = out.summary.iterations,
        stop_reason = ?out.summary.stop_reason,
        loss = out.summary.loss,
        "quantile fit finished"
    );

    let mut coefficients = out.beta;
    stats.unscale_coefficients(&mut coefficients, intercept.map(|_| y_mean));
    let centers = intercept.is_none().then(|| stats.means.clone());

    let mut restored = design.into_matrix();
    stats.invert(&mut restored, usize::from(intercept.is_some()));
    if let Some(k) = intercept {
        restored = reorder_columns(restored, k);
        coefficients = reorder_coefficients(coefficients, k);
    }

    Ok(QuantileFit {
        coefficients,
        design: restored,
        tau: opts.tau,
        intercept: opts.intercept,
        solve: out.summary,
        warm_start: warm_summary,
        centers,
    })
}

fn validate_inputs(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    init_beta: &DVector<f64>,
    warm_start: Option<&Subsample>,
    opts: &FitOptions,
) -> FitResult<()> {
    let (n, p) = x.shape();
    if n == 0 || p == 0 {
        return Err(FitError::EmptyInput { what: "design matrix" });
    }
    if y.len() != n {
        return Err(FitError::mismatch("response length", n, y.len()));
    }
    if init_beta.len() != p {
        return Err(FitError::mismatch("initial coefficients", p, init_beta.len()));
    }
    if let Some(k) = opts.intercept.position() {
        if k > p {
            return Err(FitError::invalid(
                "intercept",
                k as f64,
                "position exceeds the number of design columns",
            ));
        }
    }
    if let Some(sub) = warm_start {
        if sub.x().ncols() != p {
            return Err(FitError::mismatch("subsample columns", p, sub.x().ncols()));
        }
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFiniteInput { what: "design matrix" });
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFiniteInput { what: "response" });
    }
    if init_beta.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFiniteInput { what: "initial coefficients" });
    }
    Ok(())
}

/// Drop the caller's placeholder intercept column (1-based `position`).
fn strip_placeholder(x: DMatrix<f64>, position: Option<usize>) -> DMatrix<f64> {
    match position {
        Some(k) => x.remove_column(k - 1),
        None => x,
    }
}

/// Standardized working copy of `(x, y)` laid out for the solver.
fn prepare(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    stats: &Standardization,
    intercept: Option<usize>,
    y_mean: f64,
) -> (Design, DVector<f64>) {
    let mut x = strip_placeholder(x.clone(), intercept);
    stats.apply(&mut x, 0);

    let mut y = y.clone();
    if intercept.is_some() {
        y.add_scalar_mut(-y_mean);
        x = x.insert_column(0, 1.0);
    }
    (Design::new(x), y)
}

/// τ-quantile of `y − X[:, 1..]·β[1..]`.
fn initial_intercept(y: &DVector<f64>, x: &DMatrix<f64>, beta: &DVector<f64>, tau: f64) -> f64 {
    let k = x.ncols() - 1;
    if k == 0 {
        return quantile(y.as_slice(), tau).unwrap_or(0.0);
    }
    let partial = y - x.columns(1, k) * beta.rows(1, k);
    quantile(partial.as_slice(), tau).unwrap_or(0.0)
}

/// Re-index a degenerate predictor from the stripped matrix to the caller's.
fn to_caller_column(err: FitError, intercept: Option<usize>) -> FitError {
    match (err, intercept) {
        (FitError::DegeneratePredictor { column }, Some(k)) if column >= k - 1 => {
            FitError::DegeneratePredictor { column: column + 1 }
        }
        (err, _) => err,
    }
}
