//! Intercept column placement.
//!
//! The solver always carries the intercept in column 0. Callers may keep it
//! elsewhere; these helpers move the column (and its coefficient) to the
//! caller's position while leaving every other column in order.

use nalgebra::{DMatrix, DVector};

/// Move column `from` of `x` to index `to`; other columns keep their order.
///
/// # Panics
/// Panics if either index is out of bounds.
pub fn move_column(x: DMatrix<f64>, from: usize, to: usize) -> DMatrix<f64> {
    if from == to {
        return x;
    }
    let col = x.column(from).clone_owned();
    let mut x = x.remove_column(from).insert_column(to, 0.0);
    x.set_column(to, &col);
    x
}

/// Move entry `from` of `v` to index `to`; other entries keep their order.
///
/// # Panics
/// Panics if either index is out of bounds.
pub fn move_entry(v: DVector<f64>, from: usize, to: usize) -> DVector<f64> {
    if from == to {
        return v;
    }
    let value = v[from];
    v.remove_row(from).insert_row(to, value)
}

/// Relocate the leading intercept column to the 1-based `position`, filling it
/// with ones.
///
/// # Panics
/// Panics if `position > x.ncols()`.
pub fn reorder_columns(x: DMatrix<f64>, position: usize) -> DMatrix<f64> {
    if position <= 1 {
        return x;
    }
    let mut x = move_column(x, 0, position - 1);
    x.column_mut(position - 1).fill(1.0);
    x
}

/// Coefficient counterpart of [`reorder_columns`].
///
/// # Panics
/// Panics if `position > beta.len()`.
pub fn reorder_coefficients(beta: DVector<f64>, position: usize) -> DVector<f64> {
    if position <= 1 {
        return beta;
    }
    move_entry(beta, 0, position - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> DMatrix<f64> {
        // Intercept first, then three predictors tagged by their column number.
        DMatrix::from_fn(4, 4, |i, j| if j == 0 { 1.0 } else { (10 * j + i) as f64 })
    }

    #[test]
    fn intercept_lands_at_requested_position() {
        let x = reorder_columns(design(), 3);
        assert!(x.column(2).iter().all(|&v| v == 1.0));
        assert_eq!(x[(0, 0)], 10.0);
        assert_eq!(x[(0, 1)], 20.0);
        assert_eq!(x[(0, 3)], 30.0);

        let beta = reorder_coefficients(DVector::from_vec(vec![9.0, 1.0, 2.0, 3.0]), 3);
        assert_eq!(beta.as_slice(), &[1.0, 2.0, 9.0, 3.0]);
    }

    #[test]
    fn position_one_is_a_no_op() {
        assert_eq!(reorder_columns(design(), 1), design());
        let beta = DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(reorder_coefficients(beta.clone(), 1), beta);
    }

    #[test]
    fn moving_there_and_back_is_identity() {
        for k in 2..=4 {
            let moved = reorder_columns(design(), k);
            assert_eq!(move_column(moved, k - 1, 0), design());

            let beta = DVector::from_vec(vec![0.5, -1.0, 2.0, 4.0]);
            let moved = reorder_coefficients(beta.clone(), k);
            assert_eq!(move_entry(moved, k - 1, 0), beta);
        }
    }
}
