//! Tokio Time-related Adapter Implementations
//!
//! Tokio-specific implementations of the time traits from framepipe-core:
//! timestamps via `std::time::Instant`, sleep via `tokio::time::sleep`.

use core::future::Future;
use std::time::{Duration, Instant};

use framepipe_core::time::{SleepCapable, TimestampProvider};

#[cfg(feature = "tokio-runtime")]
use crate::TokioAdapter;

/// Implementation of TimestampProvider for TokioAdapter
///
/// Uses `std::time::Instant` for high-resolution timestamps suitable for
/// pacing measurement in demos and tests.
#[cfg(feature = "tokio-runtime")]
impl TimestampProvider for TokioAdapter {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }
}

/// Implementation of SleepCapable for TokioAdapter
///
/// Non-blocking sleep via `tokio::time::sleep`; pauses the calling task
/// without blocking the runtime.
#[cfg(feature = "tokio-runtime")]
impl SleepCapable for TokioAdapter {
    type Duration = Duration;

    fn sleep(&self, duration: Self::Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
