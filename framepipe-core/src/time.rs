//! Time and timing utilities for framepipe
//!
//! Provides the time-related traits runtime adapters implement, used by
//! simulated producers for pacing and by demos for measurement.

use core::future::Future;

/// Trait for adapters that provide current time information
///
/// Enables timestamping and performance measurement without tying the core
/// to a clock source.
pub trait TimestampProvider {
    /// Type representing an instant in time for this runtime
    type Instant;

    /// Gets the current timestamp according to the runtime's time source
    fn now(&self) -> Self::Instant;
}

/// Trait for adapters that support sleep/delay operations
///
/// Provides capability to pause a task for a specified duration without
/// blocking other tasks.
pub trait SleepCapable {
    /// Type representing a duration for this runtime
    type Duration;

    /// Pauses execution for the specified duration without blocking other tasks
    ///
    /// # Example
    /// ```rust,no_run
    /// use framepipe_core::time::SleepCapable;
    /// use std::time::Duration;
    ///
    /// async fn paced_fetch<S: SleepCapable<Duration = Duration>>(sleeper: &S) {
    ///     sleeper.sleep(Duration::from_millis(5)).await;
    ///     // fetch the next frame...
    /// }
    /// ```
    fn sleep(&self, duration: Self::Duration) -> impl Future<Output = ()> + Send;
}

/// Utility functions for time-based operations
pub mod utils {
    use super::*;

    /// Measures the execution time of an async operation
    ///
    /// Works in both `std` and `no_std` environments using the provided
    /// `TimestampProvider`.
    pub async fn measure_async<F, T, P>(provider: &P, operation: F) -> (T, P::Instant, P::Instant)
    where
        F: Future<Output = T>,
        P: TimestampProvider,
    {
        let start = provider.now();
        let result = operation.await;
        let end = provider.now();
        (result, start, end)
    }
}
