//! Numeric kernels: check loss, its smoothed derivative, and descriptive stats.

pub mod huber;
pub mod loss;
pub mod stats;

pub use huber::*;
pub use loss::*;
pub use stats::*;
