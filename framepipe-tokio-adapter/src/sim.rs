//! Simulated hardware decoder
//!
//! A mock push-style frame producer for tests and demos. Each fetch
//! schedules one unit of work on its own execution context (a spawned
//! task), optionally sleeps to simulate decode latency, and then invokes
//! the completion callback with a frame whose samples are derived from its
//! index — or with an injected failure.
//!
//! The decoder honors the producer lifecycle contract: [`SimDecoder::shutdown`]
//! waits for every outstanding callback before returning, so the decoder
//! can be torn down only after its in-flight work has drained.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use framepipe_core::{FetchSlot, Frame, FrameSource, PipeError};
use tokio::sync::Notify;

/// Simulated decoder configuration
#[derive(Debug, Clone)]
pub struct SimDecoderCfg {
    /// Simulated decode latency per frame
    pub frame_latency: Duration,
    /// Samples carried by each frame
    pub samples_per_frame: usize,
    /// If set, the fetch for this frame index completes with an error
    pub fail_at_index: Option<u32>,
}

impl Default for SimDecoderCfg {
    /// Returns the default configuration: 5 ms latency, 4 samples per
    /// frame, no injected failure
    fn default() -> Self {
        Self {
            frame_latency: Duration::from_millis(5),
            samples_per_frame: 4,
            fail_at_index: None,
        }
    }
}

/// Mock hardware decoder with a C-style asynchronous callback interface
///
/// Frame indices increase monotonically across fetches; sample data is
/// `index * samples_per_frame + offset` so tests can verify both ordering
/// and payload integrity.
///
/// # Example
///
/// ```rust,no_run
/// use framepipe_tokio_adapter::{fetch_next, SimDecoder, SimDecoderCfg};
///
/// # #[tokio::main]
/// # async fn main() -> framepipe_core::PipeResult<()> {
/// let decoder = SimDecoder::new(SimDecoderCfg::default());
///
/// let frame = fetch_next(&decoder).await?;
/// assert_eq!(frame.index, 0);
///
/// decoder.shutdown().await; // waits for outstanding callbacks
/// # Ok(())
/// # }
/// ```
pub struct SimDecoder {
    cfg: SimDecoderCfg,
    next_index: AtomicU32,
    outstanding: Arc<OutstandingOps>,
}

/// Tracks in-flight decode operations for scoped teardown
struct OutstandingOps {
    count: AtomicUsize,
    drained: Notify,
}

impl SimDecoder {
    /// Creates a decoder with the given configuration
    pub fn new(cfg: SimDecoderCfg) -> Self {
        Self {
            cfg,
            next_index: AtomicU32::new(0),
            outstanding: Arc::new(OutstandingOps {
                count: AtomicUsize::new(0),
                drained: Notify::new(),
            }),
        }
    }

    /// Number of fetches initiated so far
    pub fn frames_started(&self) -> u32 {
        self.next_index.load(Ordering::Relaxed)
    }

    /// Number of fetches whose callback has not yet fired
    pub fn outstanding_ops(&self) -> usize {
        self.outstanding.count.load(Ordering::Acquire)
    }

    /// Waits until every outstanding callback has fired
    ///
    /// The decoder must outlive its in-flight operations; callers run this
    /// after the pipeline has finished and before dropping the decoder.
    /// No fetch may be initiated once teardown begins.
    pub async fn shutdown(&self) {
        loop {
            if self.outstanding.count.load(Ordering::Acquire) == 0 {
                return;
            }

            let notified = self.outstanding.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.outstanding.count.load(Ordering::Acquire) == 0 {
                return;
            }

            notified.await;
        }
    }
}

impl FrameSource<Frame> for SimDecoder {
    /// Schedules one decode on the decoder's own execution context
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime context, matching
    /// `tokio::task::spawn`.
    fn begin_fetch(&self, slot: Arc<dyn FetchSlot<Frame>>) {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        let cfg = self.cfg.clone();
        let ops = Arc::clone(&self.outstanding);
        ops.count.fetch_add(1, Ordering::AcqRel);

        tokio::spawn(async move {
            if !cfg.frame_latency.is_zero() {
                tokio::time::sleep(cfg.frame_latency).await;
            }

            let result = if cfg.fail_at_index == Some(index) {
                Err(PipeError::source_failed("simulated decode fault"))
            } else {
                let offset = index.wrapping_mul(cfg.samples_per_frame as u32) as i32;
                let data = (0..cfg.samples_per_frame as i32)
                    .map(|sample| offset + sample)
                    .collect();
                Ok(Frame::new(index, data))
            };

            if let Err(_violation) = slot.complete(result) {
                #[cfg(feature = "tracing")]
                tracing::error!("simulated decoder completed a slot twice: {}", _violation);
            }

            if ops.count.fetch_sub(1, Ordering::AcqRel) == 1 {
                ops.drained.notify_waiters();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fetch_next;

    #[tokio::test]
    async fn test_frames_count_up_with_derived_samples() {
        let decoder = SimDecoder::new(SimDecoderCfg {
            frame_latency: Duration::ZERO,
            ..SimDecoderCfg::default()
        });

        let first = fetch_next(&decoder).await.unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.data, vec![0, 1, 2, 3]);

        let second = fetch_next(&decoder).await.unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.data, vec![4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_injected_failure_at_index() {
        let decoder = SimDecoder::new(SimDecoderCfg {
            frame_latency: Duration::ZERO,
            fail_at_index: Some(1),
            ..SimDecoderCfg::default()
        });

        assert!(fetch_next(&decoder).await.is_ok());
        let error = fetch_next(&decoder).await.unwrap_err();
        assert!(error.is_source_error());
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_outstanding_callbacks() {
        let decoder = SimDecoder::new(SimDecoderCfg {
            frame_latency: Duration::from_millis(20),
            ..SimDecoderCfg::default()
        });

        // Start fetches without awaiting their results yet
        let (slot_a, rx_a) = crate::bridge::OneshotFetchSlot::pair();
        let (slot_b, rx_b) = crate::bridge::OneshotFetchSlot::pair();
        decoder.begin_fetch(slot_a);
        decoder.begin_fetch(slot_b);
        assert_eq!(decoder.outstanding_ops(), 2);

        decoder.shutdown().await;
        assert_eq!(decoder.outstanding_ops(), 0);

        // Both callbacks fired before shutdown returned
        assert!(rx_a.await.unwrap().is_ok());
        assert!(rx_b.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_with_no_outstanding_work_returns_immediately() {
        let decoder = SimDecoder::new(SimDecoderCfg::default());
        decoder.shutdown().await;
    }
}
