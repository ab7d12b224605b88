//! Tokio frame channel
//!
//! The single point of handoff between producer and consumer: a closable
//! FIFO of move-only items guarded by one mutex, with `tokio::sync::Notify`
//! providing the wait/wake mechanism for readers and gate waiters.
//!
//! # No missed wakes
//!
//! Every wait uses the `Notified::enable()` idiom from the Tokio
//! documentation: register the waiter, re-check the guarded state, then
//! await. A state change that lands between the first check and the
//! registration is caught by the re-check, so a state transition and its
//! notification are observed as one atomic step — there is no window in
//! which a waiter can sleep through the wake it was waiting for, and no
//! polling delay anywhere.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use framepipe_core::{ChannelCfg, FrameChannel, PipeError, PipeResult};
use tokio::sync::Notify;

const CHANNEL_NAME: &str = "frame-channel";

/// Closable, gated FIFO channel between one producer and one consumer
///
/// Handles are cheap clones of a shared inner state; the producer and the
/// consumer each hold one. FIFO order is guaranteed for the canonical
/// single-producer/single-consumer arrangement.
///
/// # Example
///
/// ```rust
/// use framepipe_core::{ChannelCfg, FrameChannel};
/// use framepipe_tokio_adapter::TokioFrameChannel;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let channel = TokioFrameChannel::new(&ChannelCfg::Bounded { capacity: 4 });
/// channel.write(1u32).unwrap();
/// channel.close();
///
/// assert_eq!(channel.read().await, Some(1));
/// assert_eq!(channel.read().await, None); // drained + closed
/// # }
/// ```
pub struct TokioFrameChannel<T> {
    inner: Arc<ChannelInner<T>>,
}

struct ChannelInner<T> {
    state: StdMutex<ChannelState<T>>,
    cfg: ChannelCfg,
    /// Wakes readers blocked on an empty channel
    data_ready: Notify,
    /// Wakes producers blocked on the write gate
    gate_ready: Notify,
}

struct ChannelState<T> {
    queue: VecDeque<T>,
    closed: bool,
}

impl<T> Clone for TokioFrameChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> TokioFrameChannel<T> {
    /// Creates a new channel with the given backpressure policy
    ///
    /// Call `cfg.validate()` first; an invalid configuration (zero
    /// capacity) produces a channel whose gate never opens.
    pub fn new(cfg: &ChannelCfg) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                state: StdMutex::new(ChannelState {
                    queue: VecDeque::new(),
                    closed: false,
                }),
                cfg: cfg.clone(),
                data_ready: Notify::new(),
                gate_ready: Notify::new(),
            }),
        }
    }

    /// Returns the channel's configured backpressure policy
    pub fn cfg(&self) -> &ChannelCfg {
        &self.inner.cfg
    }

    /// Pops the head item, or reports the terminal state
    ///
    /// `Some(Some(item))` — item taken; `Some(None)` — drained and closed;
    /// `None` — empty but open, the caller must wait.
    fn try_read(&self) -> Option<Option<T>> {
        let mut state = self.inner.state.lock().unwrap();
        if let Some(item) = state.queue.pop_front() {
            drop(state);
            // The buffered length just dropped; the gate may have opened.
            self.inner.gate_ready.notify_one();
            Some(Some(item))
        } else if state.closed {
            Some(None)
        } else {
            None
        }
    }

    /// Checks the write gate, or reports the terminal state
    ///
    /// `Some(_)` — resolved (gate open, or channel closed); `None` — the
    /// caller must wait for a gate change.
    fn try_gate(&self) -> Option<PipeResult<()>> {
        let state = self.inner.state.lock().unwrap();
        if state.closed {
            Some(Err(PipeError::channel_closed(CHANNEL_NAME)))
        } else if self.inner.cfg.gate_open(state.queue.len()) {
            Some(Ok(()))
        } else {
            None
        }
    }
}

impl<T: Send + 'static> FrameChannel<T> for TokioFrameChannel<T> {
    fn write(&self, item: T) -> PipeResult<()> {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.closed {
                return Err(PipeError::channel_closed(CHANNEL_NAME));
            }
            state.queue.push_back(item);
        }
        self.inner.data_ready.notify_one();
        Ok(())
    }

    async fn read(&self) -> Option<T> {
        loop {
            if let Some(outcome) = self.try_read() {
                return outcome;
            }

            let notified = self.inner.data_ready.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            // A write or close may have landed between the check above and
            // the registration; the re-check catches it.
            if let Some(outcome) = self.try_read() {
                return outcome;
            }

            notified.await;
        }
    }

    async fn await_writable(&self) -> PipeResult<()> {
        loop {
            if let Some(outcome) = self.try_gate() {
                return outcome;
            }

            let notified = self.inner.gate_ready.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(outcome) = self.try_gate() {
                return outcome;
            }

            notified.await;
        }
    }

    fn close(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.closed {
                return;
            }
            state.closed = true;
        }
        // Wake every suspended reader and gate waiter; they re-check state
        // and observe the close.
        self.inner.data_ready.notify_waiters();
        self.inner.gate_ready.notify_waiters();

        #[cfg(feature = "tracing")]
        tracing::debug!("frame channel closed");
    }

    fn len(&self) -> usize {
        self.inner.state.lock().unwrap().queue.len()
    }

    fn is_closed(&self) -> bool {
        self.inner.state.lock().unwrap().closed
    }
}
