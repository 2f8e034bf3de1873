//! Cooperative stop flag.
//!
//! The run loop polls the flag once per step and the autocorrelation
//! pass once per run. Any thread holding a clone may set it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, clonable stop request.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Create a cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running loop to stop at the next step boundary.
    pub fn request(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear a previous request.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}
