//! Cooperative cancellation for long solves.
//!
//! The solver consults its interrupt hook every [`CHECK_INTERVAL`] iterations.
//! A hook that fires aborts the whole fit with [`crate::error::FitError::Cancelled`];
//! no partial coefficients are returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Iterations between interrupt checks.
pub const CHECK_INTERVAL: usize = 100;

/// Decides at a checkpoint whether the running solve should be abandoned.
pub trait Interrupt {
    /// Called with the current (1-based) iteration number.
    fn should_abort(&self, iteration: usize) -> bool;
}

/// Hook that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterrupt;

impl Interrupt for NoInterrupt {
    fn should_abort(&self, _iteration: usize) -> bool {
        false
    }
}

impl<F> Interrupt for F
where
    F: Fn(usize) -> bool,
{
    fn should_abort(&self, iteration: usize) -> bool {
        self(iteration)
    }
}

/// Shareable cancellation flag, e.g. set from a signal handler or another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Interrupt for CancelToken {
    fn should_abort(&self, _iteration: usize) -> bool {
        self.is_cancelled()
    }
}
