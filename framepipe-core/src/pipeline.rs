//! Pipeline orchestration
//!
//! Runs the producer loop (fetch from the external source, honor
//! backpressure, write to the channel) concurrently with the consumer loop
//! (drain a pull sequence into a sink) and brings both to a clean stop.
//!
//! # Shutdown protocol
//!
//! Either side may finish first:
//!
//! - **Producer-driven**: the producer exhausts its iteration limit, closes
//!   the channel, and the consumer drains the remaining buffered items
//!   before observing end-of-stream.
//! - **External**: a [`StopFlag`] is raised; the producer stops after its
//!   current iteration and still closes the channel, so the consumer is
//!   never left waiting.
//! - **Failure**: a fetch failure unwinds the producer loop, which closes
//!   the channel *before* surfacing the error — the failure path must not
//!   orphan the consumer.
//!
//! In every case close follows the producer's last write, so the consumer
//! never observes end-of-stream while unread items remain buffered.

use core::future::Future;

use crate::channel::{ChannelCfg, FrameChannel};
use crate::sequence::FrameStream;
use crate::stop::StopFlag;
use crate::{PipeError, PipeResult};

/// Pipeline configuration
///
/// # Examples
/// ```rust
/// use framepipe_core::{ChannelCfg, PipelineCfg};
///
/// let cfg = PipelineCfg {
///     iteration_limit: 128,
///     channel: ChannelCfg::Bounded { capacity: 8 },
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineCfg {
    /// The producer stops after this many successful fetches
    ///
    /// The counter is consumed strictly inside the single producer loop;
    /// it is never shared across tasks.
    pub iteration_limit: u64,

    /// Backpressure policy of the handoff channel
    pub channel: ChannelCfg,
}

impl PipelineCfg {
    /// Validates the pipeline configuration
    pub fn validate(&self) -> Result<(), &'static str> {
        self.channel.validate()
    }
}

impl Default for PipelineCfg {
    /// Returns the default configuration: 64 frames through a
    /// `Bounded { capacity: 16 }` channel
    fn default() -> Self {
        Self {
            iteration_limit: 64,
            channel: ChannelCfg::default(),
        }
    }
}

/// Outcome of one pipeline run
///
/// Partial success is observable: a late producer failure still reports how
/// many frames were produced and consumed before it.
#[derive(Debug)]
pub struct PipelineReport {
    /// Frames successfully written to the channel
    pub frames_produced: u64,
    /// Frames pulled from the sequence by the consumer
    pub frames_consumed: u64,
    /// Failure that ended the producer loop early, if any
    pub producer_error: Option<PipeError>,
}

impl PipelineReport {
    /// True if the producer ran to its configured end without failure
    pub fn is_complete(&self) -> bool {
        self.producer_error.is_none()
    }
}

/// Runs the producer side of a pipeline to completion
///
/// Repeats { observe stop; await the write gate; fetch one item; write }
/// until `iteration_limit` successful fetches, a raised stop, or a closed
/// channel. The channel is closed on **every** exit path.
///
/// # Returns
/// The number of frames written, or the fetch error that ended the loop
/// (after the channel was closed).
pub async fn producer_loop<T, C, F, Fut>(
    channel: &C,
    mut fetch: F,
    iteration_limit: u64,
    stop: &StopFlag,
) -> PipeResult<u64>
where
    T: Send + 'static,
    C: FrameChannel<T>,
    F: FnMut() -> Fut,
    Fut: Future<Output = PipeResult<T>>,
{
    let mut written = 0u64;
    let mut failure = None;

    for _ in 0..iteration_limit {
        if stop.is_raised() {
            break;
        }

        match channel.await_writable().await {
            Ok(()) => {}
            Err(e) if e.is_closed_race() => break,
            Err(e) => {
                failure = Some(e);
                break;
            }
        }

        match fetch().await {
            Ok(item) => match channel.write(item) {
                Ok(()) => written += 1,
                // The consumer side shut the pipeline down between the gate
                // check and the write; the item is dropped with it.
                Err(e) if e.is_closed_race() => break,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            },
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    // Close before surfacing any failure so the consumer can drain and
    // observe end-of-stream instead of waiting forever.
    channel.close();

    #[cfg(feature = "tracing")]
    tracing::debug!(written, "producer loop finished");

    match failure {
        Some(e) => Err(e),
        None => Ok(written),
    }
}

/// Runs the consumer side of a pipeline to completion
///
/// Drains the sequence until end-of-stream, feeding each item to `sink`.
/// Sink failures are the consumer's own concern: they are logged and do
/// not stop the pipeline. A sequence error (on-demand fetch failure) is
/// terminal and propagates.
///
/// # Returns
/// The number of items pulled from the sequence.
pub async fn consumer_loop<T, S, F, Fut>(mut sequence: S, mut sink: F) -> PipeResult<u64>
where
    T: Send + 'static,
    S: FrameStream<T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = PipeResult<()>>,
{
    let mut consumed = 0u64;

    loop {
        match sequence.next().await? {
            Some(item) => {
                consumed += 1;
                if let Err(_sink_error) = sink(item).await {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("consumer sink failed: {}", _sink_error);
                }
            }
            None => break,
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(consumed, "consumer loop finished");

    Ok(consumed)
}

/// Runs a complete pipeline: producer and consumer concurrently, then a
/// deterministic join
///
/// Spawns both loops on the runtime adapter, wires the consumer to the
/// channel through a [`ChannelSequence`](crate::ChannelSequence), and
/// reports the outcome. A producer fetch failure does not fail the run —
/// the channel was closed first, the consumer drained everything written,
/// and the failure is reported in [`PipelineReport::producer_error`]. The
/// run itself fails only if a loop task is lost (join failure) or the
/// configuration is invalid.
#[cfg(feature = "tokio-runtime")]
pub async fn run_pipeline<T, R, C, F, Fut, S, SFut>(
    runtime: &R,
    channel: C,
    fetch: F,
    sink: S,
    cfg: &PipelineCfg,
    stop: StopFlag,
) -> PipeResult<PipelineReport>
where
    T: Send + 'static,
    R: crate::runtime::SpawnDynamically,
    C: FrameChannel<T> + Clone + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = PipeResult<T>> + Send,
    S: FnMut(T) -> SFut + Send + 'static,
    SFut: Future<Output = PipeResult<()>> + Send,
{
    cfg.validate().map_err(PipeError::invalid_config)?;

    let producer = {
        let channel = channel.clone();
        let stop = stop.clone();
        let limit = cfg.iteration_limit;
        runtime.spawn(async move { producer_loop(&channel, fetch, limit, &stop).await })?
    };

    let consumer = {
        let sequence = crate::sequence::ChannelSequence::new(channel);
        runtime.spawn(async move { consumer_loop(sequence, sink).await })?
    };

    let producer_outcome = producer
        .await
        .map_err(|e| PipeError::task_join(&format!("producer task: {}", e)))?;
    let frames_consumed = consumer
        .await
        .map_err(|e| PipeError::task_join(&format!("consumer task: {}", e)))??;

    // Every frame written before the close is drained by the consumer, so
    // on a producer failure the consumed count equals the produced count.
    let (frames_produced, producer_error) = match producer_outcome {
        Ok(written) => (written, None),
        Err(e) => (frames_consumed, Some(e)),
    };

    Ok(PipelineReport {
        frames_produced,
        frames_consumed,
        producer_error,
    })
}
