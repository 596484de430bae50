//! Column standardization and its inverse.
//!
//! Predictors are z-scored with column means and sample standard deviations
//! before solving, so a single step size and smoothing width behave the same
//! across columns of very different scale. Coefficients are mapped back with
//!
//! ```text
//! β_j      = β'_j / s_j
//! β_0      = β'_0 + ȳ − Σ_j m_j β_j      (intercept models only)
//! ```

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{FitError, FitResult};
use crate::math::{mean, sample_std_dev};

/// Per-column location and scale of the predictor block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardization {
    pub means: DVector<f64>,
    pub std_devs: DVector<f64>,
}

impl Standardization {
    /// Column means and sample standard deviations of `x`.
    ///
    /// A column that is constant, or whose deviation is non-finite or below
    /// rounding noise relative to its largest entry, is rejected; `column` in
    /// the error indexes into `x`. The test is scale-free, so predictors
    /// recorded in very small or very large units are accepted.
    pub fn from_columns(x: &DMatrix<f64>) -> FitResult<Self> {
        let p = x.ncols();
        let mut means = DVector::zeros(p);
        let mut std_devs = DVector::zeros(p);

        for (j, col) in x.column_iter().enumerate() {
            let values: Vec<f64> = col.iter().copied().collect();
            let m = mean(&values);
            let s = sample_std_dev(&values);
            let constant = col.max() == col.min();
            if constant || !(s.is_finite() && s > f64::EPSILON * col.amax()) {
                return Err(FitError::DegeneratePredictor { column: j });
            }
            means[j] = m;
            std_devs[j] = s;
        }

        Ok(Self { means, std_devs })
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Z-score the predictor block of `x`, which starts at column `offset`.
    pub fn apply(&self, x: &mut DMatrix<f64>, offset: usize) {
        for j in 0..self.len() {
            let (m, s) = (self.means[j], self.std_devs[j]);
            x.column_mut(offset + j).apply(|v| *v = (*v - m) / s);
        }
    }

    /// Undo [`Standardization::apply`].
    pub fn invert(&self, x: &mut DMatrix<f64>, offset: usize) {
        for j in 0..self.len() {
            let (m, s) = (self.means[j], self.std_devs[j]);
            x.column_mut(offset + j).apply(|v| *v = *v * s + m);
        }
    }

    /// Map coefficients fitted on standardized predictors back to raw units.
    ///
    /// With `intercept_mean = Some(ȳ)` the vector is `[β_0, β_1..]` and the
    /// response was centered by `ȳ`; otherwise every entry is a slope.
    pub fn unscale_coefficients(&self, beta: &mut DVector<f64>, intercept_mean: Option<f64>) {
        let k = self.len();
        match intercept_mean {
            Some(y_mean) => {
                beta.rows_mut(1, k).component_div_assign(&self.std_devs);
                let shift = self.means.dot(&beta.rows(1, k));
                beta[0] += y_mean - shift;
            }
            None => {
                beta.rows_mut(0, k).component_div_assign(&self.std_devs);
            }
        }
    }
}
