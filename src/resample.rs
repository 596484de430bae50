//! Resampling helpers for callers that fit repeatedly (bootstrap loops) or
//! warm start on a subset of rows.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand::seq::index;

use crate::error::{FitError, FitResult};

/// `n` independent rate-1 exponential variates, by inverse CDF `−ln(1 − U)`.
///
/// These are the observation weights of a Bayesian / weighted bootstrap.
pub fn exp_weights<R: Rng + ?Sized>(n: usize, rng: &mut R) -> DVector<f64> {
    DVector::from_fn(n, |_, _| {
        let u: f64 = rng.gen_range(0.0..1.0);
        -(-u).ln_1p()
    })
}

/// Rows used for the warm-start solve.
///
/// Columns must be laid out like the full design (placeholder intercept column
/// included); the fitter checks that when the subsample is used.
#[derive(Debug, Clone)]
pub struct Subsample {
    x: DMatrix<f64>,
    y: DVector<f64>,
}

impl Subsample {
    /// Wrap a caller-chosen subsample.
    pub fn new(x: DMatrix<f64>, y: DVector<f64>) -> FitResult<Self> {
        if x.nrows() == 0 {
            return Err(FitError::EmptyInput { what: "subsample" });
        }
        if y.len() != x.nrows() {
            return Err(FitError::mismatch("subsample response length", x.nrows(), y.len()));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteInput { what: "subsample" });
        }
        Ok(Self { x, y })
    }

    /// Draw `num_samples` distinct rows of `(x, y)` uniformly at random.
    ///
    /// Rows keep their original relative order.
    pub fn draw<R: Rng + ?Sized>(
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        num_samples: usize,
        rng: &mut R,
    ) -> FitResult<Self> {
        if y.len() != x.nrows() {
            return Err(FitError::mismatch("response length", x.nrows(), y.len()));
        }
        if num_samples == 0 || num_samples > x.nrows() {
            return Err(FitError::invalid(
                "num_samples",
                num_samples as f64,
                "must be between 1 and the number of rows",
            ));
        }

        let mut rows = index::sample(rng, x.nrows(), num_samples).into_vec();
        rows.sort_unstable();
        Self::new(x.select_rows(rows.iter()), y.select_rows(rows.iter()))
    }

    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    pub fn num_samples(&self) -> usize {
        self.x.nrows()
    }
}
