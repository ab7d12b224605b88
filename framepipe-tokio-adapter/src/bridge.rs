//! Callback-to-value bridge
//!
//! Adapts one push-style completion of the external producer into one
//! awaited result. The correlation token handed to the producer is a
//! [`OneshotFetchSlot`]: a single-assignment cell that carries the result
//! across the execution-context boundary to exactly one waiter, exactly
//! once.
//!
//! The bridge performs no locking beyond what the one-shot handoff needs
//! and burns no CPU while waiting — the caller suspends on the oneshot
//! receiver until the producer's context completes the slot.

use std::sync::{Arc, Mutex as StdMutex};

use framepipe_core::{FetchSlot, FrameSource, PipeError, PipeResult};
use tokio::sync::oneshot;

/// One-shot completion cell backed by `tokio::sync::oneshot`
///
/// The sender sits behind a mutex so the first `complete` call can take it
/// out; a second call finds the cell empty and reports
/// [`PipeError::ProtocolViolation`] instead of delivering a duplicate.
pub struct OneshotFetchSlot<T> {
    tx: StdMutex<Option<oneshot::Sender<PipeResult<T>>>>,
}

impl<T: Send + 'static> OneshotFetchSlot<T> {
    /// Creates a slot together with the receiver its completion resolves
    ///
    /// [`fetch_next`] wires this up internally; the constructor is public
    /// so producer integrations can be exercised against the one-shot
    /// contract directly.
    pub fn pair() -> (Arc<Self>, oneshot::Receiver<PipeResult<T>>) {
        let (tx, rx) = oneshot::channel();
        (
            Arc::new(Self {
                tx: StdMutex::new(Some(tx)),
            }),
            rx,
        )
    }
}

impl<T: Send + 'static> FetchSlot<T> for OneshotFetchSlot<T> {
    fn complete(&self, result: PipeResult<T>) -> PipeResult<()> {
        match self.tx.lock().unwrap().take() {
            Some(tx) => {
                // A receiver that has gone away is a cancelled fetch, not a
                // protocol breach; the result is simply discarded.
                let _ = tx.send(result);
                Ok(())
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::error!("fetch slot completed twice");
                Err(PipeError::protocol_violation("fetch slot completed twice"))
            }
        }
    }
}

/// Fetches the next item from a push-style producer
///
/// Initiates exactly one callback registration with `source`, suspends the
/// caller, and resumes it when the producer's context completes the slot.
///
/// # Errors
/// - [`PipeError::SourceFailed`] — the producer reported failure through
///   its callback; the bridge never synthesizes values on error
/// - [`PipeError::SourceDropped`] — the producer released the slot without
///   ever completing it (typically during teardown)
///
/// # Example
///
/// ```rust,no_run
/// use framepipe_core::Frame;
/// use framepipe_tokio_adapter::{fetch_next, SimDecoder, SimDecoderCfg};
///
/// # async fn example() -> framepipe_core::PipeResult<()> {
/// let decoder = SimDecoder::new(SimDecoderCfg::default());
/// let frame: Frame = fetch_next(&decoder).await?;
/// # Ok(())
/// # }
/// ```
pub async fn fetch_next<T, S>(source: &S) -> PipeResult<T>
where
    T: Send + 'static,
    S: FrameSource<T> + ?Sized,
{
    let (slot, rx) = OneshotFetchSlot::pair();
    source.begin_fetch(slot);

    match rx.await {
        Ok(result) => result,
        Err(_) => Err(PipeError::source_dropped(
            "completion callback never invoked",
        )),
    }
}
