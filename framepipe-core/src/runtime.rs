//! Runtime adapter trait definitions for framepipe
//!
//! This module defines the traits that runtime-specific adapters must
//! implement to provide async execution capabilities across different
//! environments.

use crate::PipeResult;

/// Core trait for runtime adapters providing identity and initialization
///
/// This is the minimal interface every framepipe runtime adapter
/// implements. Spawning capability is provided separately by
/// [`SpawnDynamically`] for runtimes with a dynamic task scheduler.
///
/// # Design Philosophy
///
/// - **Runtime Agnostic**: the pipeline core doesn't depend on a specific
///   runtime
/// - **Platform Flexible**: works across std and no_std environments
/// - **Error Preserving**: initialization failures surface as `PipeError`
pub trait RuntimeAdapter: Send + Sync + 'static {
    /// Creates a new adapter instance with default configuration
    fn new() -> PipeResult<Self>
    where
        Self: Sized;

    /// Returns the runtime name for debugging and logging
    fn runtime_name() -> &'static str
    where
        Self: Sized;

    /// Returns descriptive metadata about this runtime
    fn runtime_info() -> RuntimeInfo
    where
        Self: Sized,
    {
        RuntimeInfo {
            name: Self::runtime_name(),
        }
    }
}

/// Trait for runtimes that support dynamic future spawning (like Tokio)
///
/// Implemented by adapters whose runtime can spawn arbitrary futures at
/// runtime; the orchestrator uses it to run the producer and consumer
/// loops on independent execution contexts.
#[cfg(feature = "tokio-runtime")]
pub trait SpawnDynamically: RuntimeAdapter {
    /// Spawns a future dynamically on the runtime
    ///
    /// # Returns
    /// A handle to the spawned task, or an error if spawning failed
    fn spawn<F, T>(&self, future: F) -> PipeResult<tokio::task::JoinHandle<T>>
    where
        F: core::future::Future<Output = T> + Send + 'static,
        T: Send + 'static;
}

/// Information about a runtime adapter
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    /// Name of the runtime (e.g., "tokio")
    pub name: &'static str,
}
