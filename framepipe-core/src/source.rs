//! External producer contract
//!
//! Defines the interface framepipe consumes from the outside world: a
//! push-style, callback-driven producer (typically a hardware decoder or a
//! legacy C-style async API) that schedules one unit of work per fetch on
//! its own execution context and reports the result through a completion
//! callback.
//!
//! The correlation token of the C-style world is modeled as a one-shot
//! completion cell ([`FetchSlot`]) handed to the producer at initiation.
//! The cell carries the result across the execution-context boundary to
//! exactly one waiter, exactly once; concrete cells are provided by adapter
//! crates (see `framepipe-tokio-adapter`).

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;

#[cfg(feature = "std")]
use std::sync::Arc;

use crate::PipeResult;

/// One-shot completion cell for a single in-flight fetch
///
/// A `FetchSlot` is created per initiated fetch and remains valid for the
/// entire interval between initiation and callback invocation. The producer
/// completes it exactly once — with a frame or with an error — from
/// whichever execution context its work runs on.
///
/// # One-shot guarantee
///
/// The first `complete` call delivers the result to the single waiter and
/// returns `Ok(())`. Any further call is a programming error in the
/// producer integration: it returns [`PipeError::ProtocolViolation`]
/// (crate::PipeError::ProtocolViolation) and delivers nothing, so a
/// duplicated callback can never surface as a duplicated frame.
pub trait FetchSlot<T: Send>: Send + Sync {
    /// Delivers the fetch result to the waiting consumer
    ///
    /// # Returns
    /// - `Ok(())` — result handed off (or the waiter has gone away, which
    ///   is a benign cancellation, not an error)
    /// - `Err(PipeError::ProtocolViolation)` — the slot was already
    ///   completed
    fn complete(&self, result: PipeResult<T>) -> PipeResult<()>;
}

/// Push-style external frame producer
///
/// Implementations schedule one unit of work per `begin_fetch` call on
/// their own execution context and complete the slot exactly once,
/// possibly from a different context than the caller's.
///
/// # Lifecycle contract
///
/// The producer must outlive all of its outstanding initiated operations:
/// teardown waits for outstanding callbacks, and the pipeline never
/// initiates a fetch after the producer begins teardown. The simulated
/// decoder in `framepipe-tokio-adapter` shows the expected shape
/// (`SimDecoder::shutdown`).
///
/// # Example
///
/// ```rust,ignore
/// struct MyDecoder { /* handle to the hardware */ }
///
/// impl FrameSource<Frame> for MyDecoder {
///     fn begin_fetch(&self, slot: Arc<dyn FetchSlot<Frame>>) {
///         // hand `slot` to the driver; its completion ISR/thread calls
///         // slot.complete(Ok(frame)) when the frame is ready
///         self.driver.queue_decode(slot);
///     }
/// }
/// ```
pub trait FrameSource<T: Send + 'static>: Send + Sync {
    /// Initiates exactly one asynchronous fetch
    ///
    /// The slot is the correlation token: the producer stores it for the
    /// duration of the operation and completes it exactly once. Dropping
    /// the slot without completing it surfaces to the waiter as
    /// [`PipeError::SourceDropped`](crate::PipeError::SourceDropped).
    fn begin_fetch(&self, slot: Arc<dyn FetchSlot<T>>);
}

// Fetches are routinely issued through shared handles to the producer.
impl<T: Send + 'static, S: FrameSource<T> + ?Sized> FrameSource<T> for Arc<S> {
    fn begin_fetch(&self, slot: Arc<dyn FetchSlot<T>>) {
        (**self).begin_fetch(slot)
    }
}
