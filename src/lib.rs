//! `huber-quantreg` library crate.
//!
//! Linear quantile regression by accelerated gradient descent on a
//! Huber-smoothed check loss. The crate is organized so that:
//!
//! - numeric kernels (`math`) and the solver (`solver`) are usable on their own
//! - `fit` owns standardization and intercept bookkeeping around the solver
//! - bootstrap-style callers get their resampling helpers from `resample`

pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod resample;
pub mod solver;

pub use domain::{FitOptions, Intercept, QuantileFit, SolveSummary, StopReason};
pub use error::{FitError, FitResult};
pub use fit::{fit_model, fit_model_interruptible, fit_tau_grid};
pub use resample::{Subsample, exp_weights};
pub use solver::{CancelToken, Interrupt, NoInterrupt};
