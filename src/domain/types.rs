//! Shared domain types.
//!
//! These types are kept plain and serializable so callers can:
//!
//! - build options in code or load them from JSON
//! - inspect fit diagnostics alongside the coefficients
//! - persist a fitted model for later prediction

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{FitError, FitResult};

/// Default smoothing half-width.
pub const DEFAULT_MU: f64 = 1e-15;
/// Default iteration cap for the full-data solve.
pub const DEFAULT_MAX_ITER: usize = 10_000;
/// Default gradient (∞-norm) tolerance.
pub const DEFAULT_BETA_TOL: f64 = 1e-4;
/// Default tolerance on loss change per unit step.
pub const DEFAULT_CHECK_TOL: f64 = 1e-6;

/// Where the intercept column lives in the caller's design matrix.
///
/// Positions are **1-based** to match the column numbering used by statistical
/// front-ends. The caller's matrix carries a placeholder column at that
/// position; it is discarded during the fit and the intercept is estimated
/// analytically, then reported back at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intercept {
    /// Fit through the origin of the standardized predictors.
    None,
    /// Intercept placeholder at this 1-based column.
    Column(usize),
}

impl Intercept {
    /// Map the integer convention (`0` = none, `k` = column k) to a variant.
    pub fn from_position(position: usize) -> Self {
        if position == 0 {
            Intercept::None
        } else {
            Intercept::Column(position)
        }
    }

    /// 1-based column position, if any.
    pub fn position(self) -> Option<usize> {
        match self {
            Intercept::None => None,
            Intercept::Column(k) => Some(k),
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, Intercept::Column(_))
    }
}

impl Default for Intercept {
    fn default() -> Self {
        Intercept::Column(1)
    }
}

/// Options controlling a single quantile fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Target quantile, strictly inside `(0, 1)`.
    pub tau: f64,
    /// Half-width of the band on which the check loss is smoothed.
    pub mu: f64,
    /// Iteration cap for the full-data solve (the warm start has its own cap).
    pub max_iter: usize,
    /// Stop once the largest gradient component is at or below this value.
    pub beta_tol: f64,
    /// Stop once `|Δloss| · step` is at or below this value.
    pub check_tol: f64,
    pub intercept: Intercept,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tau: 0.5,
            mu: DEFAULT_MU,
            max_iter: DEFAULT_MAX_ITER,
            beta_tol: DEFAULT_BETA_TOL,
            check_tol: DEFAULT_CHECK_TOL,
            intercept: Intercept::default(),
        }
    }
}

impl FitOptions {
    /// Default options at quantile `tau`.
    pub fn new(tau: f64) -> Self {
        Self {
            tau,
            ..Self::default()
        }
    }

    /// Validate scalar options. Column-dependent checks (intercept position vs
    /// matrix width) happen in the fitter once the design is known.
    pub fn validate(&self) -> FitResult<()> {
        if !(self.tau.is_finite() && self.tau > 0.0 && self.tau < 1.0) {
            return Err(FitError::invalid("tau", self.tau, "must lie strictly inside (0, 1)"));
        }
        if !(self.mu.is_finite() && self.mu > 0.0) {
            return Err(FitError::invalid("mu", self.mu, "must be positive and finite"));
        }
        if self.max_iter == 0 {
            return Err(FitError::invalid("max_iter", 0.0, "must be at least 1"));
        }
        if !(self.beta_tol.is_finite() && self.beta_tol >= 0.0) {
            return Err(FitError::invalid(
                "beta_tol",
                self.beta_tol,
                "must be non-negative and finite",
            ));
        }
        if !(self.check_tol.is_finite() && self.check_tol >= 0.0) {
            return Err(FitError::invalid(
                "check_tol",
                self.check_tol,
                "must be non-negative and finite",
            ));
        }
        if self.intercept == Intercept::Column(0) {
            return Err(FitError::invalid("intercept", 0.0, "column positions are 1-based"));
        }
        Ok(())
    }
}

/// Why the solver loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Largest gradient component fell to `beta_tol`.
    GradientTolerance,
    /// Loss change per unit step fell to `check_tol`.
    LossTolerance,
    /// The iteration cap was reached first.
    MaxIterations,
}

impl StopReason {
    pub fn converged(self) -> bool {
        !matches!(self, StopReason::MaxIterations)
    }
}

/// Diagnostics of one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Completed iterations.
    pub iterations: usize,
    pub stop_reason: StopReason,
    /// Check loss at the final iterate.
    pub loss: f64,
}

/// Output of [`crate::fit::fit_model`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantileFit {
    /// Coefficients in the caller's original units and column order.
    pub coefficients: DVector<f64>,
    /// Design in caller units and layout; the intercept column (if any) is
    /// materialized as ones.
    pub design: DMatrix<f64>,
    pub tau: f64,
    pub intercept: Intercept,
    /// Full-data solve.
    pub solve: SolveSummary,
    /// Subsample warm start, when one was run.
    pub warm_start: Option<SolveSummary>,
    /// Without an intercept the predictors are still centered before solving,
    /// so the coefficients describe `y ≈ (x − centers)·β`. `None` for
    /// intercept models, where the centering is folded into the intercept.
    #[serde(default)]
    pub centers: Option<DVector<f64>>,
}

impl QuantileFit {
    /// Whether the full-data solve stopped on a tolerance rather than the cap.
    pub fn converged(&self) -> bool {
        self.solve.stop_reason.converged()
    }

    pub fn iterations(&self) -> usize {
        self.solve.iterations
    }

    /// `design · coefficients`, measured from [`QuantileFit::centers`] when
    /// there is no intercept.
    pub fn fitted_values(&self) -> DVector<f64> {
        let mut fitted = &self.design * &self.coefficients;
        fitted.add_scalar_mut(-self.center_offset());
        fitted
    }

    /// `y − fitted_values()`.
    pub fn residuals(&self, y: &DVector<f64>) -> FitResult<DVector<f64>> {
        if y.len() != self.design.nrows() {
            return Err(FitError::mismatch("response length", self.design.nrows(), y.len()));
        }
        Ok(y - self.fitted_values())
    }

    /// Predict at new rows laid out like the caller's original design
    /// (placeholder intercept column included).
    pub fn predict(&self, x: &DMatrix<f64>) -> FitResult<DVector<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(FitError::mismatch("design columns", self.coefficients.len(), x.ncols()));
        }
        let mut x = x.clone();
        if let Some(k) = self.intercept.position() {
            x.column_mut(k - 1).fill(1.0);
        }
        let mut predicted = x * &self.coefficients;
        predicted.add_scalar_mut(-self.center_offset());
        Ok(predicted)
    }

    fn center_offset(&self) -> f64 {
        self.centers.as_ref().map_or(0.0, |m| m.dot(&self.coefficients))
    }
}
