//! Tokio Adapter for framepipe
//!
//! This crate provides the Tokio-specific implementations of the framepipe
//! core traits, enabling the pipeline to run on standard library
//! environments using the Tokio async runtime.
//!
//! # Features
//!
//! - **Bridge**: one-shot callback-to-value handoff built on
//!   `tokio::sync::oneshot`
//! - **Channel**: closable, gated FIFO built on a mutex plus
//!   `tokio::sync::Notify`
//! - **Runtime**: task spawning through `TokioAdapter`
//! - **Simulation**: a mock hardware decoder (`SimDecoder`) for tests and
//!   demos
//!
//! # Architecture
//!
//! Tokio is a std async runtime, so this adapter is designed for standard
//! environments and works with the std configuration of framepipe-core.
//! The core crate stays free of concrete synchronization primitives; every
//! wait/wake mechanism of the pipeline lives here.

pub mod bridge;
pub mod channel;
pub mod error;
pub mod runtime;
pub mod sim;
pub mod time;

pub use bridge::{fetch_next, OneshotFetchSlot};
pub use channel::TokioFrameChannel;
pub use error::TokioErrorSupport;
pub use sim::{SimDecoder, SimDecoderCfg};

#[cfg(feature = "tokio-runtime")]
pub use runtime::TokioAdapter;
