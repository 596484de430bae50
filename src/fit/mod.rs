//! Quantile fit orchestration.
//!
//! Responsibilities:
//!
//! - standardize predictors and center the response
//! - manage the intercept column (strip placeholder, prepend, restore position)
//! - warm start on a subsample, then solve on the full data
//! - fit a grid of quantile levels

pub mod fitter;
pub mod reorder;
pub mod standardize;
pub mod tau_grid;

pub use fitter::*;
pub use reorder::*;
pub use standardize::*;
pub use tau_grid::*;
