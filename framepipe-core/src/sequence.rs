//! Pull-based frame sequences
//!
//! Exposes "produce the next item or signal end" as a forward-only,
//! single-pass cursor that consumer loops drive with ordinary iteration
//! idioms:
//!
//! ```rust,ignore
//! while let Some(frame) = sequence.next().await? {
//!     process(frame).await;
//! }
//! ```
//!
//! Two variants share the one [`FrameStream`] contract, selected at
//! construction:
//!
//! - [`ChannelSequence`] — pulls from a [`FrameChannel`]; end-of-stream is
//!   the channel's drained-after-close state
//! - [`OnDemandSequence`] — initiates one fetch per pull, gated by a
//!   [`StopFlag`] checked before each fetch
//!
//! End is sticky in both variants: after the first `Ok(None)` (or a
//! terminal fetch error), every subsequent call returns `Ok(None)` without
//! touching the underlying source.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use core::future::Future;
use core::pin::Pin;

use crate::channel::FrameChannel;
use crate::stop::StopFlag;
use crate::PipeResult;

/// Boxed future produced by one on-demand fetch
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = PipeResult<T>> + Send>>;

/// Boxed fetch factory for the on-demand sequence variant
pub type FetchFn<T> = Box<dyn FnMut() -> FetchFuture<T> + Send>;

/// Forward-only pull cursor over a stream of items
///
/// Items are yielded by value to exactly one consumer and never revisited.
/// `Ok(None)` signals end-of-stream and is sticky.
pub trait FrameStream<T: Send + 'static>: Send {
    /// Pulls the next item
    ///
    /// # Returns
    /// - `Ok(Some(item))` — the next item, in stream order
    /// - `Ok(None)` — end-of-stream; repeats on every subsequent call
    /// - `Err(_)` — an on-demand fetch failed; terminal, subsequent calls
    ///   return `Ok(None)`
    fn next(&mut self) -> impl Future<Output = PipeResult<Option<T>>> + Send + '_;
}

/// Channel-backed pull sequence
///
/// Delegates each pull to [`FrameChannel::read`]. The cursor latches the
/// channel's terminal state so the underlying channel is not touched after
/// end-of-stream.
pub struct ChannelSequence<C> {
    channel: C,
    done: bool,
}

impl<C> ChannelSequence<C> {
    /// Creates a cursor over the given channel handle
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            done: false,
        }
    }
}

impl<T, C> FrameStream<T> for ChannelSequence<C>
where
    T: Send + 'static,
    C: FrameChannel<T>,
{
    async fn next(&mut self) -> PipeResult<Option<T>> {
        if self.done {
            return Ok(None);
        }
        match self.channel.read().await {
            Some(item) => Ok(Some(item)),
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

/// On-demand pull sequence
///
/// Initiates one fetch from the external producer per pull, checking the
/// stop predicate first: once a stop is observed, the sequence ends without
/// initiating further fetches.
pub struct OnDemandSequence<T: Send + 'static> {
    fetch: FetchFn<T>,
    stop: StopFlag,
    done: bool,
}

impl<T: Send + 'static> OnDemandSequence<T> {
    /// Creates a cursor over repeated invocations of `fetch`
    ///
    /// `fetch` typically wraps a bridge call such as
    /// `fetch_next(&decoder)` from the adapter crate.
    pub fn new<F, Fut>(mut fetch: F, stop: StopFlag) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = PipeResult<T>> + Send + 'static,
    {
        Self {
            fetch: Box::new(move || -> FetchFuture<T> { Box::pin(fetch()) }),
            stop,
            done: false,
        }
    }
}

impl<T: Send + 'static> FrameStream<T> for OnDemandSequence<T> {
    async fn next(&mut self) -> PipeResult<Option<T>> {
        if self.done {
            return Ok(None);
        }
        if self.stop.is_raised() {
            self.done = true;
            return Ok(None);
        }
        match (self.fetch)().await {
            Ok(item) => Ok(Some(item)),
            Err(e) => {
                // A failed fetch ends the sequence; the error surfaces once.
                self.done = true;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipeError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // Pre-filled, already-closed channel: enough to drive the cursor
    // without a real runtime primitive underneath.
    struct DrainedChannel {
        items: Mutex<VecDeque<u32>>,
    }

    impl DrainedChannel {
        fn with_items(items: &[u32]) -> Self {
            Self {
                items: Mutex::new(items.iter().copied().collect()),
            }
        }
    }

    impl FrameChannel<u32> for DrainedChannel {
        fn write(&self, _item: u32) -> PipeResult<()> {
            Err(PipeError::channel_closed("drained"))
        }

        async fn read(&self) -> Option<u32> {
            self.items.lock().unwrap().pop_front()
        }

        async fn await_writable(&self) -> PipeResult<()> {
            Err(PipeError::channel_closed("drained"))
        }

        fn close(&self) {}

        fn len(&self) -> usize {
            self.items.lock().unwrap().len()
        }

        fn is_closed(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_channel_sequence_drains_then_sticky_end() {
        let mut seq = ChannelSequence::new(DrainedChannel::with_items(&[7, 8, 9]));

        assert_eq!(seq.next().await.unwrap(), Some(7));
        assert_eq!(seq.next().await.unwrap(), Some(8));
        assert_eq!(seq.next().await.unwrap(), Some(9));

        // End is sticky
        assert_eq!(seq.next().await.unwrap(), None);
        assert_eq!(seq.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_on_demand_sequence_counts_up() {
        let counter = std::sync::Arc::new(portable_atomic::AtomicU32::new(0));
        let fetch_counter = counter.clone();

        let mut seq = OnDemandSequence::new(
            move || {
                let n = fetch_counter.fetch_add(1, portable_atomic::Ordering::Relaxed);
                async move { Ok(n) }
            },
            StopFlag::new(),
        );

        assert_eq!(seq.next().await.unwrap(), Some(0));
        assert_eq!(seq.next().await.unwrap(), Some(1));
        assert_eq!(seq.next().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_on_demand_sequence_stops_before_fetch() {
        let fetches = std::sync::Arc::new(portable_atomic::AtomicU32::new(0));
        let fetch_count = fetches.clone();
        let stop = StopFlag::new();

        let mut seq = OnDemandSequence::new(
            move || {
                let n = fetch_count.fetch_add(1, portable_atomic::Ordering::Relaxed);
                async move { Ok(n) }
            },
            stop.clone(),
        );

        assert_eq!(seq.next().await.unwrap(), Some(0));
        stop.raise();

        // Stop observed before initiating a fetch; End is sticky
        assert_eq!(seq.next().await.unwrap(), None);
        assert_eq!(seq.next().await.unwrap(), None);
        assert_eq!(fetches.load(portable_atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_on_demand_sequence_error_is_terminal() {
        let mut calls = 0u32;
        let mut seq = OnDemandSequence::new(
            move || {
                calls += 1;
                let attempt = calls;
                async move {
                    if attempt == 1 {
                        Ok(10u32)
                    } else {
                        Err(PipeError::source_failed("injected"))
                    }
                }
            },
            StopFlag::new(),
        );

        assert_eq!(seq.next().await.unwrap(), Some(10));
        assert!(seq.next().await.unwrap_err().is_source_error());

        // After the error the cursor is at End, and stays there
        assert_eq!(seq.next().await.unwrap(), None);
    }
}
