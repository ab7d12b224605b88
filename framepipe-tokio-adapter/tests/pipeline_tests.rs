//! End-to-end pipeline tests
//!
//! Exercises the full producer/consumer orchestration over the Tokio
//! adapter: the simulated decoder pushes frames through the bridge into
//! the bounded channel, and the consumer drains them through a pull
//! sequence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use framepipe_core::{
    consumer_loop, producer_loop, run_pipeline, ChannelCfg, ChannelSequence, FrameChannel,
    FrameStream, OnDemandSequence, PipeError, PipeResult, PipelineCfg, StopFlag,
};
use framepipe_core::{FetchSlot, Frame, FrameSource};
use framepipe_tokio_adapter::{fetch_next, SimDecoder, SimDecoderCfg, TokioAdapter, TokioFrameChannel};

fn fast_decoder() -> Arc<SimDecoder> {
    Arc::new(SimDecoder::new(SimDecoderCfg {
        frame_latency: Duration::ZERO,
        ..SimDecoderCfg::default()
    }))
}

fn decoder_fetch(
    decoder: &Arc<SimDecoder>,
) -> impl FnMut() -> std::pin::Pin<Box<dyn std::future::Future<Output = PipeResult<Frame>> + Send>>
       + Send
       + 'static {
    let decoder = Arc::clone(decoder);
    move || {
        let decoder = Arc::clone(&decoder);
        Box::pin(async move { fetch_next(&*decoder).await })
    }
}

fn collecting_sink(
    collected: &Arc<Mutex<Vec<Frame>>>,
) -> impl FnMut(Frame) -> std::pin::Pin<Box<dyn std::future::Future<Output = PipeResult<()>> + Send>>
       + Send
       + 'static {
    let collected = Arc::clone(collected);
    move |frame| {
        let collected = Arc::clone(&collected);
        Box::pin(async move {
            collected.lock().unwrap().push(frame);
            Ok(())
        })
    }
}

#[tokio::test]
async fn end_to_end_three_frames() {
    let decoder = Arc::new(SimDecoder::new(SimDecoderCfg {
        frame_latency: Duration::from_millis(1),
        ..SimDecoderCfg::default()
    }));
    let collected = Arc::new(Mutex::new(Vec::new()));

    let cfg = PipelineCfg {
        iteration_limit: 3,
        channel: ChannelCfg::Bounded { capacity: 2 },
    };

    let report = run_pipeline(
        &TokioAdapter::new().unwrap(),
        TokioFrameChannel::new(&cfg.channel),
        decoder_fetch(&decoder),
        collecting_sink(&collected),
        &cfg,
        StopFlag::new(),
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.frames_produced, 3);
    assert_eq!(report.frames_consumed, 3);

    let frames = collected.lock().unwrap();
    let indices: Vec<u32> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(frames[1].data, vec![4, 5, 6, 7]);
    drop(frames);

    decoder.shutdown().await;
}

#[tokio::test]
async fn consumer_observes_sticky_end_after_drain() {
    let decoder = fast_decoder();
    let channel = TokioFrameChannel::new(&ChannelCfg::Bounded { capacity: 4 });

    let written = producer_loop(&channel, decoder_fetch(&decoder), 3, &StopFlag::new())
        .await
        .unwrap();
    assert_eq!(written, 3);

    let mut sequence = ChannelSequence::new(channel);
    for expected in 0..3u32 {
        let frame = sequence.next().await.unwrap().unwrap();
        assert_eq!(frame.index, expected);
    }

    // The 4th read observes End, and End repeats
    assert!(sequence.next().await.unwrap().is_none());
    assert!(sequence.next().await.unwrap().is_none());

    decoder.shutdown().await;
}

/// Channel wrapper that raises an external stop after a fixed number of
/// successful writes, modeling a shutdown signal that lands exactly
/// between two producer iterations.
#[derive(Clone)]
struct StopAfterWrites<C> {
    inner: C,
    stop: StopFlag,
    remaining: Arc<AtomicU64>,
}

impl<T: Send + 'static, C: FrameChannel<T>> FrameChannel<T> for StopAfterWrites<C> {
    fn write(&self, item: T) -> PipeResult<()> {
        self.inner.write(item)?;
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.stop.raise();
        }
        Ok(())
    }

    fn read(&self) -> impl std::future::Future<Output = Option<T>> + Send + '_ {
        self.inner.read()
    }

    fn await_writable(&self) -> impl std::future::Future<Output = PipeResult<()>> + Send + '_ {
        self.inner.await_writable()
    }

    fn close(&self) {
        self.inner.close()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

#[tokio::test]
async fn external_stop_after_two_frames() {
    let decoder = fast_decoder();
    let collected = Arc::new(Mutex::new(Vec::new()));
    let stop = StopFlag::new();

    let cfg = PipelineCfg {
        iteration_limit: 100,
        channel: ChannelCfg::Bounded { capacity: 4 },
    };
    let channel = StopAfterWrites {
        inner: TokioFrameChannel::new(&cfg.channel),
        stop: stop.clone(),
        remaining: Arc::new(AtomicU64::new(2)),
    };

    let report = run_pipeline(
        &TokioAdapter::new().unwrap(),
        channel,
        decoder_fetch(&decoder),
        collecting_sink(&collected),
        &cfg,
        stop,
    )
    .await
    .unwrap();

    // The producer observed the stop at the next iteration boundary and
    // closed; nothing written after the signal reaches the consumer.
    assert!(report.is_complete());
    assert_eq!(report.frames_produced, 2);
    assert_eq!(report.frames_consumed, 2);

    let indices: Vec<u32> = collected.lock().unwrap().iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 1]);

    decoder.shutdown().await;
}

#[tokio::test]
async fn backpressure_bounds_buffered_length() {
    const CAPACITY: usize = 2;

    let decoder = fast_decoder();
    let channel = TokioFrameChannel::new(&ChannelCfg::Bounded { capacity: CAPACITY });
    let cfg = PipelineCfg {
        iteration_limit: 30,
        channel: ChannelCfg::Bounded { capacity: CAPACITY },
    };

    // Sample the buffered length continuously while the pipeline runs
    let sampler_channel = channel.clone();
    let sampler = tokio::spawn(async move {
        let mut max_seen = 0;
        while !(sampler_channel.is_closed() && sampler_channel.is_empty()) {
            max_seen = max_seen.max(sampler_channel.len());
            tokio::time::sleep(Duration::from_micros(200)).await;
        }
        max_seen
    });

    let report = run_pipeline(
        &TokioAdapter::new().unwrap(),
        channel,
        decoder_fetch(&decoder),
        |frame: Frame| async move {
            // A deliberately slow consumer forces the gate shut
            tokio::time::sleep(Duration::from_millis(1)).await;
            drop(frame);
            Ok(())
        },
        &cfg,
        StopFlag::new(),
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.frames_consumed, 30);

    let max_seen = sampler.await.unwrap();
    assert!(
        max_seen <= CAPACITY,
        "buffered length {} exceeded capacity {}",
        max_seen,
        CAPACITY
    );

    decoder.shutdown().await;
}

#[tokio::test]
async fn interleaved_production_loses_nothing() {
    const TOTAL: u64 = 100;

    let decoder = fast_decoder();
    let collected = Arc::new(Mutex::new(Vec::new()));
    let cfg = PipelineCfg {
        iteration_limit: TOTAL,
        channel: ChannelCfg::Bounded { capacity: 3 },
    };

    let report = run_pipeline(
        &TokioAdapter::new().unwrap(),
        TokioFrameChannel::new(&cfg.channel),
        decoder_fetch(&decoder),
        collecting_sink(&collected),
        &cfg,
        StopFlag::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.frames_consumed, TOTAL);

    let indices: Vec<u32> = collected.lock().unwrap().iter().map(|f| f.index).collect();
    assert_eq!(indices, (0..TOTAL as u32).collect::<Vec<_>>());

    decoder.shutdown().await;
}

#[tokio::test]
async fn producer_failure_still_releases_consumer() {
    let decoder = Arc::new(SimDecoder::new(SimDecoderCfg {
        frame_latency: Duration::ZERO,
        fail_at_index: Some(1),
        ..SimDecoderCfg::default()
    }));
    let collected = Arc::new(Mutex::new(Vec::new()));

    let cfg = PipelineCfg {
        iteration_limit: 5,
        channel: ChannelCfg::Bounded { capacity: 4 },
    };

    // Must terminate: the failing producer closes the channel on its way out
    let report = run_pipeline(
        &TokioAdapter::new().unwrap(),
        TokioFrameChannel::new(&cfg.channel),
        decoder_fetch(&decoder),
        collecting_sink(&collected),
        &cfg,
        StopFlag::new(),
    )
    .await
    .unwrap();

    assert!(!report.is_complete());
    assert!(report.producer_error.as_ref().unwrap().is_source_error());
    assert_eq!(report.frames_produced, 1);
    assert_eq!(report.frames_consumed, 1);

    let indices: Vec<u32> = collected.lock().unwrap().iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0]);

    decoder.shutdown().await;
}

#[tokio::test]
async fn rogue_source_double_completion_is_contained() {
    struct RogueSource {
        second_outcome: Arc<Mutex<Option<PipeResult<()>>>>,
    }

    impl FrameSource<Frame> for RogueSource {
        fn begin_fetch(&self, slot: Arc<dyn FetchSlot<Frame>>) {
            slot.complete(Ok(Frame::new(0, vec![0, 1, 2, 3]))).unwrap();
            // A buggy legacy integration fires the callback again
            let second = slot.complete(Ok(Frame::new(99, vec![9])));
            *self.second_outcome.lock().unwrap() = Some(second);
        }
    }

    let second_outcome = Arc::new(Mutex::new(None));
    let source = RogueSource {
        second_outcome: Arc::clone(&second_outcome),
    };

    // The waiter sees exactly one frame, never the duplicate
    let frame = fetch_next(&source).await.unwrap();
    assert_eq!(frame.index, 0);

    let second = second_outcome.lock().unwrap().take().unwrap();
    assert!(second.unwrap_err().is_protocol_violation());
}

#[tokio::test]
async fn on_demand_sequence_over_live_decoder() {
    let decoder = fast_decoder();
    let stop = StopFlag::new();

    let fetch = decoder_fetch(&decoder);
    let mut sequence = OnDemandSequence::new(fetch, stop.clone());

    for expected in 0..3u32 {
        let frame = sequence.next().await.unwrap().unwrap();
        assert_eq!(frame.index, expected);
    }

    stop.raise();
    assert!(sequence.next().await.unwrap().is_none());
    assert!(sequence.next().await.unwrap().is_none());

    // No fetch was initiated after the stop was observed
    assert_eq!(decoder.frames_started(), 3);

    decoder.shutdown().await;
}

#[tokio::test]
async fn consumer_loop_isolates_sink_failures() {
    let decoder = fast_decoder();
    let channel = TokioFrameChannel::new(&ChannelCfg::Ungated);

    producer_loop(&channel, decoder_fetch(&decoder), 4, &StopFlag::new())
        .await
        .unwrap();

    let processed = Arc::new(AtomicU64::new(0));
    let sink_processed = Arc::clone(&processed);
    let consumed = consumer_loop(ChannelSequence::new(channel), move |frame: Frame| {
        let processed = Arc::clone(&sink_processed);
        async move {
            processed.fetch_add(1, Ordering::Relaxed);
            if frame.index % 2 == 0 {
                Err(PipeError::runtime("sink rejected even frame"))
            } else {
                Ok(())
            }
        }
    })
    .await
    .unwrap();

    // Sink failures never stop the drain
    assert_eq!(consumed, 4);
    assert_eq!(processed.load(Ordering::Relaxed), 4);

    decoder.shutdown().await;
}
