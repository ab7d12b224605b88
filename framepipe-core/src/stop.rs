//! Pipeline cancellation signal
//!
//! A [`StopFlag`] is the external shutdown input to a pipeline: a monotonic
//! boolean that, once raised, is never lowered for the lifetime of the
//! pipeline instance. Loops observe it at iteration boundaries and unwind
//! within one iteration; items already buffered stay valid and drainable.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;

#[cfg(feature = "std")]
use std::sync::Arc;

use portable_atomic::{AtomicBool, Ordering};

/// Monotonic, clonable cancellation flag
///
/// Cloning shares the underlying flag, so any holder can request a stop and
/// every loop observes it.
///
/// # Example
///
/// ```rust
/// use framepipe_core::StopFlag;
///
/// let stop = StopFlag::new();
/// let observer = stop.clone();
///
/// assert!(!observer.is_raised());
/// stop.raise();
/// assert!(observer.is_raised());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    raised: Arc<AtomicBool>,
}

impl StopFlag {
    /// Creates a new, un-raised stop flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop
    ///
    /// Idempotent; there is no way to lower the flag again.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// True once a stop has been requested
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
