//! Iterative solver for the smoothed quantile objective.
//!
//! The solver works on already-prepared data (standardized, intercept column
//! in place); see `crate::fit` for the orchestration around it.

pub mod accelerated;
pub mod interrupt;

pub use accelerated::*;
pub use interrupt::*;
