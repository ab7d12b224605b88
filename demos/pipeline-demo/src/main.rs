//! framepipe Pipeline Demo
//!
//! Demonstrates the full pipeline over the Tokio adapter:
//! - A simulated hardware decoder pushing frames through C-style callbacks
//! - The one-shot bridge turning each push into an awaited fetch
//! - A bounded channel decoupling producer and consumer pacing
//! - Pull sequences draining frames with ordinary loop idioms
//! - Producer-driven and externally-signalled shutdown
//!
//! # Architecture
//!
//! ```text
//! SimDecoder ──callback──▶ bridge ──▶ producer loop ──▶ bounded channel
//!                                                             │
//!                                       consumer loop ◀── pull sequence
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use framepipe_core::{
    run_pipeline, ChannelCfg, FrameStream, OnDemandSequence, PipelineCfg, RuntimeContext, StopFlag,
};
use framepipe_tokio_adapter::{
    fetch_next, SimDecoder, SimDecoderCfg, TokioAdapter, TokioFrameChannel,
};
use tracing::info;

fn decoder_fetch(
    decoder: &Arc<SimDecoder>,
) -> impl FnMut() -> std::pin::Pin<
    Box<dyn std::future::Future<Output = framepipe_core::PipeResult<framepipe_core::Frame>> + Send>,
> + Send
       + 'static {
    let decoder = Arc::clone(decoder);
    move || {
        let decoder = Arc::clone(&decoder);
        Box::pin(async move { fetch_next(&*decoder).await })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("framepipe pipeline demo (tokio)\n");

    let adapter = TokioAdapter::new()?;
    let ctx = RuntimeContext::new(adapter);

    /* ============ Stage 1: producer-driven shutdown ============ */

    println!("--- stage 1: decode 8 frames through a bounded channel ---");

    let decoder = Arc::new(SimDecoder::new(SimDecoderCfg::default()));
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink_collected = Arc::clone(&collected);

    let cfg = PipelineCfg {
        iteration_limit: 8,
        channel: ChannelCfg::Bounded { capacity: 4 },
    };

    let started = ctx.now();
    let report = run_pipeline(
        &adapter,
        TokioFrameChannel::new(&cfg.channel),
        decoder_fetch(&decoder),
        move |frame| {
            let collected = Arc::clone(&sink_collected);
            async move {
                info!(index = frame.index, samples = frame.len(), "processed frame");
                collected.lock().unwrap().push(frame.index);
                Ok(())
            }
        },
        &cfg,
        StopFlag::new(),
    )
    .await?;
    let elapsed = ctx.now() - started;

    decoder.shutdown().await;
    println!(
        "produced {} / consumed {} frames in {:?}: {:?}\n",
        report.frames_produced,
        report.frames_consumed,
        elapsed,
        collected.lock().unwrap()
    );

    /* ============ Stage 2: external stop signal ============ */

    println!("--- stage 2: unlimited decode, stopped externally after 25 ms ---");

    let decoder = Arc::new(SimDecoder::new(SimDecoderCfg::default()));
    let stop = StopFlag::new();
    let trigger = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(25)).await;
        trigger.raise();
    });

    let cfg = PipelineCfg {
        iteration_limit: u64::MAX,
        channel: ChannelCfg::Bounded { capacity: 4 },
    };
    let report = run_pipeline(
        &adapter,
        TokioFrameChannel::new(&cfg.channel),
        decoder_fetch(&decoder),
        |frame| async move {
            info!(index = frame.index, "processed frame");
            Ok(())
        },
        &cfg,
        stop,
    )
    .await?;

    decoder.shutdown().await;
    println!(
        "stop signal honored after {} frames; consumer drained {}\n",
        report.frames_produced, report.frames_consumed
    );

    /* ============ Stage 3: on-demand pull sequence ============ */

    println!("--- stage 3: on-demand sequence, one fetch per pull ---");

    let decoder = Arc::new(SimDecoder::new(SimDecoderCfg::default()));
    let stop = StopFlag::new();
    let mut sequence = OnDemandSequence::new(decoder_fetch(&decoder), stop.clone());

    while let Some(frame) = sequence.next().await? {
        println!("pulled frame {} -> {:?}", frame.index, frame.data);
        if frame.index == 2 {
            stop.raise();
        }
    }
    println!("sequence ended after stop");

    decoder.shutdown().await;
    ctx.sleep(Duration::from_millis(5)).await;

    Ok(())
}
