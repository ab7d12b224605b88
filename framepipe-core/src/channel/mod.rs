//! Runtime-agnostic channel traits and configuration
//!
//! The channel is the single point of handoff between the producer and the
//! consumer: a thread-safe, closable FIFO of move-only items with a
//! configurable backpressure gate. This module defines the abstraction;
//! concrete implementations live in adapter crates:
//! - `framepipe-tokio-adapter` — Tokio-based channel (std environments)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          framepipe-core (trait layer)        │
//! │        FrameChannel<T> + ChannelCfg          │
//! └───────────────────┬──────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │   tokio impl    │
//!            │   (std)         │
//!            └─────────────────┘
//! ```
//!
//! # Shutdown model
//!
//! Termination is an explicit `close()`, never a read timeout: a slow
//! producer is indistinguishable from a finished one under timeout-based
//! end-of-stream detection, so that variant is not offered. Once closed,
//! buffered items remain readable until drained; then reads settle into a
//! sticky end-of-stream.

// Module structure
mod cfg;
mod traits;

// Public API exports
pub use cfg::ChannelCfg;
pub use traits::FrameChannel;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, crate::PipeError>;
