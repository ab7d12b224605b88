//! Runtime context for framepipe services
//!
//! Provides a unified interface to runtime capabilities like sleep and
//! timestamp functions, abstracting away the specific runtime adapter
//! implementation.

use crate::time::{SleepCapable, TimestampProvider};
use core::future::Future;

/// Unified runtime context for framepipe services
///
/// Producer and consumer services receive this context and use it for
/// timing operations without needing to know about the underlying runtime.
///
/// # Example
///
/// ```rust,ignore
/// use framepipe_core::RuntimeContext;
/// use framepipe_tokio_adapter::TokioAdapter;
/// use std::time::Duration;
///
/// async fn paced_consumer(ctx: RuntimeContext<TokioAdapter>) {
///     let started = ctx.now();
///     ctx.sleep(Duration::from_millis(100)).await;
///     // ... drain the sequence ...
/// }
/// ```
#[derive(Clone)]
pub struct RuntimeContext<R>
where
    R: SleepCapable + TimestampProvider,
{
    runtime: R,
}

impl<R> RuntimeContext<R>
where
    R: SleepCapable + TimestampProvider,
{
    /// Creates a new RuntimeContext with the given runtime adapter
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    /// Sleeps for the specified duration
    ///
    /// Delegates to the underlying runtime's sleep implementation.
    pub fn sleep(&self, duration: R::Duration) -> impl Future<Output = ()> + '_ {
        self.runtime.sleep(duration)
    }

    /// Gets the current timestamp
    ///
    /// Delegates to the underlying runtime's timestamp implementation.
    pub fn now(&self) -> R::Instant {
        self.runtime.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct InstantRuntime;

    impl TimestampProvider for InstantRuntime {
        type Instant = u64;

        fn now(&self) -> Self::Instant {
            7
        }
    }

    impl SleepCapable for InstantRuntime {
        type Duration = u64;

        fn sleep(&self, _duration: Self::Duration) -> impl Future<Output = ()> + Send {
            core::future::ready(())
        }
    }

    #[tokio::test]
    async fn test_context_delegates_to_runtime() {
        let ctx = RuntimeContext::new(InstantRuntime);
        assert_eq!(ctx.now(), 7);
        ctx.sleep(5).await;
    }
}
