//! Accelerated gradient descent on the smoothed check loss.
//!
//! Each iteration:
//!
//! 1. pick a step from two Barzilai–Borwein estimates when the previous step
//!    showed positive curvature (`cross > 0`), capped at [`STEP_CAP`]; otherwise
//!    use a unit step
//! 2. rebuild the smoothed derivative vector and the gradient from the residuals
//! 3. extrapolate with momentum `(i − 1)/(i + 2)` and take the gradient step
//! 4. update residuals incrementally with the net movement of `β`
//!
//! `grad = Xᵗψ(r)/n` points downhill for `Σρ(y − Xβ)`, so the gradient step is
//! *added* to `β`.
//!
//! The loop runs while all of:
//!
//! - `i < max_iter`
//! - `‖grad‖∞ > beta_tol`, or this is the first iteration
//! - `|Δloss| · step > check_tol`, or the step has collapsed below [`SMALL_STEP`]

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::domain::{FitOptions, SolveSummary, StopReason};
use crate::error::{FitError, FitResult};
use crate::math::{check_loss, update_huber_grad};
use crate::solver::interrupt::{CHECK_INTERVAL, Interrupt};

/// Upper bound on the adaptive step size.
pub const STEP_CAP: f64 = 2.0;

/// Below this step size the loss-change criterion is ignored: tiny steps make
/// `|Δloss|` small without saying anything about convergence.
pub const SMALL_STEP: f64 = 0.01;

/// Scalar controls for one solver run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverControls {
    pub tau: f64,
    pub mu: f64,
    pub max_iter: usize,
    pub beta_tol: f64,
    pub check_tol: f64,
}

impl SolverControls {
    pub fn from_options(opts: &FitOptions) -> Self {
        Self {
            tau: opts.tau,
            mu: opts.mu,
            max_iter: opts.max_iter,
            beta_tol: opts.beta_tol,
            check_tol: opts.check_tol,
        }
    }

    pub fn with_max_iter(self, max_iter: usize) -> Self {
        Self { max_iter, ..self }
    }
}

/// Design matrix paired with its transpose, built once and shared by every
/// gradient evaluation.
#[derive(Debug, Clone)]
pub struct Design {
    x: DMatrix<f64>,
    x_t: DMatrix<f64>,
    one_over_n: f64,
}

impl Design {
    pub fn new(x: DMatrix<f64>) -> Self {
        let x_t = x.transpose();
        let one_over_n = 1.0 / x.nrows() as f64;
        Self { x, x_t, one_over_n }
    }

    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    pub fn x_t(&self) -> &DMatrix<f64> {
        &self.x_t
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn one_over_n(&self) -> f64 {
        self.one_over_n
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.x
    }
}

/// Mutable iteration state.
///
/// `resid` tracks `y − X·beta` through incremental updates only; it is computed
/// from scratch once, in [`SolverState::new`].
#[derive(Debug, Clone)]
pub struct SolverState {
    pub beta: DVector<f64>,
    pub last_beta: DVector<f64>,
    pub grad: DVector<f64>,
    pub last_grad: DVector<f64>,
    pub derivs: DVector<f64>,
    pub resid: DVector<f64>,
    pub beta_diff: DVector<f64>,
    pub grad_diff: DVector<f64>,
    /// `beta_diffᵗ·grad_diff` from the previous iteration.
    pub cross: f64,
    /// Current step size.
    pub delta: f64,
    pub checkfun_diff: f64,
    pub last_loss: f64,
    /// 1-based iteration counter; `iteration − 1` steps have completed.
    pub iteration: usize,
}

impl SolverState {
    pub fn new(y: &DVector<f64>, design: &Design, beta: DVector<f64>, tau: f64) -> Self {
        let n = design.nrows();
        let p = design.ncols();
        let resid = y - design.x() * &beta;
        let loss = check_loss(&resid, tau);

        Self {
            last_beta: beta.clone(),
            beta,
            grad: DVector::zeros(p),
            last_grad: DVector::zeros(p),
            derivs: DVector::zeros(n),
            resid,
            beta_diff: DVector::zeros(p),
            grad_diff: DVector::zeros(p),
            cross: 0.0,
            // Only has to let the first loop test pass; overwritten before use.
            delta: (1.0 / tau).min(1.0 / (1.0 - tau)),
            checkfun_diff: loss,
            last_loss: loss,
            iteration: 1,
        }
    }

    /// `Some(reason)` once any loop condition fails.
    pub fn stop_reason(&self, controls: &SolverControls) -> Option<StopReason> {
        let gradient_active = self.grad.amax() > controls.beta_tol || self.iteration == 1;
        let loss_active =
            self.checkfun_diff * self.delta > controls.check_tol || self.delta < SMALL_STEP;

        if !gradient_active {
            Some(StopReason::GradientTolerance)
        } else if !loss_active {
            Some(StopReason::LossTolerance)
        } else if self.iteration >= controls.max_iter {
            Some(StopReason::MaxIterations)
        } else {
            None
        }
    }

    pub fn iterations(&self) -> usize {
        self.iteration - 1
    }

    /// Advance one iteration.
    pub fn step(
        &mut self,
        design: &Design,
        controls: &SolverControls,
        interrupt: &dyn Interrupt,
    ) -> FitResult<()> {
        let i = self.iteration;

        self.delta = 1.0;
        if self.cross > 0.0 {
            let a1 = self.cross / self.grad_diff.norm_squared();
            let a2 = self.beta_diff.norm_squared() / self.cross;
            self.delta = a1.min(a2).min(STEP_CAP);
        }

        if i % CHECK_INTERVAL == 0 {
            trace!(iteration = i, loss = self.last_loss, step = self.delta, "solver checkpoint");
            if interrupt.should_abort(i) {
                return Err(FitError::Cancelled { iteration: i });
            }
        }

        self.last_grad.copy_from(&self.grad);
        update_huber_grad(
            design.x_t(),
            &self.resid,
            &mut self.derivs,
            &mut self.grad,
            controls.tau,
            controls.mu,
            design.one_over_n(),
        );

        self.beta_diff.copy_from(&self.beta);
        self.beta_diff -= &self.last_beta;
        self.grad_diff.copy_from(&self.grad);
        self.grad_diff -= &self.last_grad;

        let momentum = (i as f64 - 1.0) / (i as f64 + 2.0);
        self.beta.axpy(momentum, &self.beta_diff, 1.0);
        self.beta.axpy(self.delta, &self.grad, 1.0);

        // Net movement this iteration, for the residual update and the next
        // curvature estimate.
        self.beta_diff.axpy(self.delta, &self.grad, 1.0);

        self.resid.gemv(-1.0, design.x(), &self.beta_diff, 1.0);
        self.last_beta.copy_from(&self.beta);

        let loss = check_loss(&self.resid, controls.tau);
        self.checkfun_diff = (self.last_loss - loss).abs();
        self.last_loss = loss;

        self.iteration += 1;
        self.cross = self.beta_diff.dot(&self.grad_diff);
        Ok(())
    }
}

/// Final iterate plus diagnostics.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub beta: DVector<f64>,
    pub summary: SolveSummary,
}

/// Minimize the smoothed check loss of `y − X·β` starting from `beta`.
///
/// Hitting `max_iter` is not an error; inspect `summary.stop_reason`.
pub fn huber_descent(
    y: &DVector<f64>,
    design: &Design,
    beta: DVector<f64>,
    controls: &SolverControls,
    interrupt: &dyn Interrupt,
) -> FitResult<SolverOutcome> {
    if design.nrows() == 0 || design.ncols() == 0 {
        return Err(FitError::EmptyInput { what: "design matrix" });
    }
    if y.len() != design.nrows() {
        return Err(FitError::mismatch("response length", design.nrows(), y.len()));
    }
    if beta.len() != design.ncols() {
        return Err(FitError::mismatch("coefficient length", design.ncols(), beta.len()));
    }

    let mut state = SolverState::new(y, design, beta, controls.tau);
    let stop_reason = loop {
        if let Some(reason) = state.stop_reason(controls) {
            break reason;
        }
        state.step(design, controls, interrupt)?;
    };

    let summary = SolveSummary {
        iterations: state.iterations(),
        stop_reason,
        loss: state.last_loss,
    };
    Ok(SolverOutcome {
        beta: state.beta,
        summary,
    })
}
