//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - fit configuration (`FitOptions`, `Intercept`)
//! - solver diagnostics (`StopReason`, `SolveSummary`)
//! - the fit output (`QuantileFit`)

pub mod types;

pub use types::*;
