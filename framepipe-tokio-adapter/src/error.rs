//! Tokio-specific error handling support
//!
//! Adds Tokio runtime error conversions to framepipe's core error type
//! without requiring the core crate to depend on Tokio unconditionally.

use framepipe_core::PipeError;

/// Trait that provides Tokio-specific error constructors for PipeError
pub trait TokioErrorSupport {
    /// Converts a `tokio::task::JoinError` to a PipeError
    ///
    /// Distinguishes cancellation from a panic in the joined task.
    fn from_join_error(error: tokio::task::JoinError) -> Self;

    /// Converts a `tokio::time::error::Elapsed` to a PipeError
    fn from_elapsed_error(error: tokio::time::error::Elapsed) -> Self;
}

impl TokioErrorSupport for PipeError {
    fn from_join_error(error: tokio::task::JoinError) -> Self {
        if error.is_cancelled() {
            PipeError::task_join("task was cancelled")
        } else if error.is_panic() {
            PipeError::task_join("task panicked")
        } else {
            PipeError::task_join(&format!("task join error: {}", error))
        }
    }

    fn from_elapsed_error(_error: tokio::time::error::Elapsed) -> Self {
        PipeError::runtime("operation timed out")
    }
}
