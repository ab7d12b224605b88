//! framepipe Core Pipeline Engine
//!
//! This crate provides the core abstractions for framepipe: adapting
//! push-based, callback-driven frame producers (hardware decoders, legacy
//! C-style async APIs) into pull-based async pipelines with bounded
//! buffering, backpressure and deterministic shutdown.
//!
//! The crate is runtime-agnostic: it defines the trait layer and the
//! orchestration logic, while concrete synchronization primitives are
//! provided by adapter crates (see `framepipe-tokio-adapter`).

#![cfg_attr(not(feature = "std"), no_std)]

pub mod channel;
pub mod context;
mod error;
pub mod frame;
pub mod pipeline;
pub mod runtime;
pub mod sequence;
pub mod source;
pub mod stop;
pub mod time;

// Public API exports
pub use channel::{ChannelCfg, FrameChannel};
pub use context::RuntimeContext;
pub use error::{PipeError, PipeResult};
pub use frame::Frame;
pub use pipeline::{consumer_loop, producer_loop, PipelineCfg, PipelineReport};
pub use runtime::{RuntimeAdapter, RuntimeInfo};
pub use sequence::{ChannelSequence, FrameStream, OnDemandSequence};
pub use source::{FetchSlot, FrameSource};
pub use stop::StopFlag;

#[cfg(feature = "tokio-runtime")]
pub use pipeline::run_pipeline;
#[cfg(feature = "tokio-runtime")]
pub use runtime::SpawnDynamically;
