//! Tokio Runtime Adapter for framepipe
//!
//! Provides the Tokio-specific implementation of framepipe's runtime
//! traits, enabling the orchestrator to spawn its producer and consumer
//! loops on the Tokio executor.

#[cfg(feature = "tokio-runtime")]
use core::future::Future;

#[cfg(feature = "tokio-runtime")]
use framepipe_core::{PipeResult, RuntimeAdapter, SpawnDynamically};

#[cfg(all(feature = "tokio-runtime", feature = "tracing"))]
use tracing::debug;

/// Tokio runtime adapter for async task spawning in std environments
///
/// A zero-sized handle to the ambient Tokio executor. Spawning requires a
/// running Tokio runtime context.
///
/// # Example
/// ```rust,no_run
/// use framepipe_core::RuntimeAdapter;
/// use framepipe_tokio_adapter::TokioAdapter;
///
/// # #[tokio::main]
/// # async fn main() -> framepipe_core::PipeResult<()> {
/// let adapter = TokioAdapter::new()?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "tokio-runtime")]
#[derive(Debug, Clone, Copy)]
pub struct TokioAdapter;

#[cfg(feature = "tokio-runtime")]
impl TokioAdapter {
    /// Creates a new TokioAdapter
    ///
    /// # Returns
    /// `Ok(TokioAdapter)` — Tokio adapters are lightweight and cannot fail
    pub fn new() -> PipeResult<Self> {
        #[cfg(feature = "tracing")]
        debug!("creating TokioAdapter");

        Ok(Self)
    }
}

#[cfg(feature = "tokio-runtime")]
impl Default for TokioAdapter {
    fn default() -> Self {
        Self
    }
}

#[cfg(feature = "tokio-runtime")]
impl RuntimeAdapter for TokioAdapter {
    fn new() -> PipeResult<Self> {
        Self::new()
    }

    fn runtime_name() -> &'static str {
        "tokio"
    }
}

#[cfg(feature = "tokio-runtime")]
impl SpawnDynamically for TokioAdapter {
    /// Spawns a future on the Tokio executor
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime context, matching
    /// `tokio::task::spawn`.
    fn spawn<F, T>(&self, future: F) -> PipeResult<tokio::task::JoinHandle<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        Ok(tokio::task::spawn(future))
    }
}
