//! Runtime-agnostic channel trait
//!
//! Defines the trait interface that channel implementations must satisfy.
//! Actual implementations are provided by adapter crates (tokio).

use core::future::Future;

use crate::PipeResult;

/// Backend-agnostic FIFO channel between one producer and one consumer
///
/// The channel is the only shared mutable state in the pipeline core.
/// Implementations guard the buffer and the closed flag with a single
/// mutual-exclusion mechanism, and a state change together with its wake
/// notification must be observed as one atomic transition — a waiter can
/// never miss the wake for a change it has not yet seen.
///
/// # Implementation Requirements
///
/// 1. FIFO order: items are read in the exact order written (the canonical
///    design assumes a single producer; multi-writer fairness is not
///    promised)
/// 2. `close()` is idempotent and monotonic: open → closed, never reopened
/// 3. Buffered items remain readable after close; `read` settles into a
///    sticky end-of-stream only once the buffer is drained
/// 4. All waits wake promptly on `write`, `close`, or gate-state change —
///    no fixed polling delay anywhere
/// 5. Handles are `Send + Sync` and shareable across tasks
pub trait FrameChannel<T: Send + 'static>: Send + Sync {
    /// Appends an item to the tail (non-blocking)
    ///
    /// Backpressure is applied separately via [`await_writable`]; `write`
    /// itself never waits.
    ///
    /// # Closed-write policy
    ///
    /// A write racing a concurrent `close` returns
    /// `Err(PipeError::ChannelClosed)` and the item is dropped. The
    /// orchestrator treats this as a benign stop condition, not a failure —
    /// the race is inherent to external shutdown. (The alternative policy,
    /// silently discarding, would hide the race from standalone callers.)
    ///
    /// [`await_writable`]: FrameChannel::await_writable
    fn write(&self, item: T) -> PipeResult<()>;

    /// Removes and returns the head item
    ///
    /// Suspends while the channel is empty and open. Once the channel is
    /// empty **and** closed, returns `None` — immediately, and on every
    /// subsequent call (sticky terminal state).
    fn read(&self) -> impl Future<Output = Option<T>> + Send + '_;

    /// Suspends until the configured write gate holds
    ///
    /// Returns `Ok(())` when the gate is open (e.g. fewer than `capacity`
    /// items buffered) and `Err(PipeError::ChannelClosed)` if the channel
    /// is closed — a closed channel will never accept the write the caller
    /// is preparing, so there is nothing to wait for.
    fn await_writable(&self) -> impl Future<Output = PipeResult<()>> + Send + '_;

    /// Marks the channel closed and wakes every suspended reader and writer
    ///
    /// Idempotent: closing an already-closed channel has no further effect.
    fn close(&self);

    /// Number of currently buffered items
    fn len(&self) -> usize;

    /// True if no items are currently buffered
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once `close()` has been called
    fn is_closed(&self) -> bool;
}
