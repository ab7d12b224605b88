//! Error handling for framepipe core operations
//!
//! This module provides a unified error type that works across all framepipe
//! target platforms, from embedded acquisition frontends (no_std) to desktop
//! and server environments.
//!
//! # Platform Compatibility
//!
//! The error system uses conditional compilation to optimize per target:
//!
//! - **Embedded**: minimal footprint with `no_std` compatibility and numeric
//!   error codes instead of formatted strings
//! - **Desktop/Server**: rich error context with thiserror-derived messages
//!   and `with_context()` chaining
//!
//! # Error Categories
//!
//! Each error carries a numeric code, organized by category:
//!
//! - **Producer** (0x1000-0x1FFF): the external frame source failed or
//!   abandoned a pending fetch
//! - **Channel** (0x2000-0x2FFF): channel lifecycle races (write/read after
//!   close)
//! - **Protocol** (0x3000-0x3FFF): contract breaches such as a fetch slot
//!   completed twice
//! - **Configuration** (0x4000-0x4FFF): invalid pipeline/channel config
//! - **Runtime** (0x5000-0x5FFF): task spawn/join failures from adapters
//! - **Internal** (0x7000-0x7FFF): unexpected conditions inside framepipe
//!
//! ## Platform-Specific Display Behavior
//!
//! - **std mode**: rich messages with context, e.g.
//!   "External producer failed: decode timeout"
//! - **no_std mode**: compact format, e.g. "Error 0x1001: producer failed"
//!
//! # Error Chaining Example
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # {
//! use framepipe_core::PipeError;
//!
//! let error = PipeError::source_failed("decoder reported CRC mismatch")
//!     .with_context("fetching frame 17");
//!
//! assert!(error.to_string().contains("fetching frame 17"));
//! # }
//! ```

// Rich error messages in std mode are derived from thiserror::Error using
// the #[cfg_attr(feature = "std", error("..."))] format strings below.
#[cfg(feature = "std")]
use thiserror::Error;

#[cfg(not(feature = "std"))]
extern crate alloc;

/// Result type used throughout framepipe
pub type PipeResult<T> = Result<T, PipeError>;

/// Unified error type for all framepipe operations across platforms
///
/// Covers every failure scenario of the pipeline core, with conditional
/// compilation keeping the embedded footprint small while std builds get
/// full error context.
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum PipeError {
    /// The external producer reported failure through its completion callback
    ///
    /// Raised by the bridge when a fetch completes with an error instead of
    /// a frame. The producer loop closes the channel before surfacing this,
    /// so the consumer is never left waiting.
    #[cfg_attr(feature = "std", error("External producer failed: {reason}"))]
    SourceFailed {
        #[cfg(feature = "std")]
        reason: String,
        #[cfg(not(feature = "std"))]
        _reason: (),
    },

    /// A pending fetch was destroyed without ever being completed
    ///
    /// The external producer dropped the correlation token (fetch slot)
    /// without invoking the completion callback, typically during producer
    /// teardown.
    #[cfg_attr(feature = "std", error("Pending fetch abandoned: {reason}"))]
    SourceDropped {
        #[cfg(feature = "std")]
        reason: String,
        #[cfg(not(feature = "std"))]
        _reason: (),
    },

    /// A write or wait raced a concurrent close of the channel
    ///
    /// This is a benign outcome of graceful shutdown, not a hard failure:
    /// the producer loop treats it as a stop condition. See
    /// [`FrameChannel::write`](crate::channel::FrameChannel::write) for the
    /// documented closed-write policy.
    #[cfg_attr(feature = "std", error("Channel closed: {channel_name}"))]
    ChannelClosed {
        #[cfg(feature = "std")]
        channel_name: String,
        #[cfg(not(feature = "std"))]
        _channel_name: (),
    },

    /// A component broke the pipeline contract
    ///
    /// The only producer-visible instance is a fetch slot completed more
    /// than once. This indicates a programming error in the external
    /// producer integration, not an operational condition.
    #[cfg_attr(feature = "std", error("Protocol violation: {detail}"))]
    ProtocolViolation {
        #[cfg(feature = "std")]
        detail: String,
        #[cfg(not(feature = "std"))]
        _detail: (),
    },

    /// Pipeline or channel configuration failed validation
    #[cfg_attr(feature = "std", error("Invalid configuration: {parameter}"))]
    InvalidConfig {
        #[cfg(feature = "std")]
        parameter: String,
        #[cfg(not(feature = "std"))]
        _parameter: (),
    },

    /// Runtime execution errors (task spawning, scheduling, etc.)
    #[cfg_attr(feature = "std", error("Runtime error: {message}"))]
    Runtime {
        #[cfg(feature = "std")]
        message: String,
        #[cfg(not(feature = "std"))]
        _message: (),
    },

    /// A spawned pipeline task could not be joined
    ///
    /// The task was cancelled or panicked; produced by adapter conversions
    /// from the runtime's join error type.
    #[cfg_attr(feature = "std", error("Task join failed: {message}"))]
    TaskJoin {
        #[cfg(feature = "std")]
        message: String,
        #[cfg(not(feature = "std"))]
        _message: (),
    },

    /// Unexpected internal condition
    ///
    /// Use only for invariant breaches inside framepipe itself, never for
    /// conditions the caller is expected to handle.
    #[cfg_attr(feature = "std", error("Internal error: {message}"))]
    Internal {
        code: u32,
        #[cfg(feature = "std")]
        message: String,
        #[cfg(not(feature = "std"))]
        _message: (),
    },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for PipeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Embedded environments display the error code plus a brief label,
        // e.g. "Error 0x1001: producer failed".
        let (code, message) = match self {
            PipeError::SourceFailed { .. } => (0x1001, "producer failed"),
            PipeError::SourceDropped { .. } => (0x1002, "pending fetch abandoned"),
            PipeError::ChannelClosed { .. } => (0x2001, "channel closed"),
            PipeError::ProtocolViolation { .. } => (0x3001, "protocol violation"),
            PipeError::InvalidConfig { .. } => (0x4001, "invalid configuration"),
            PipeError::Runtime { .. } => (0x5001, "runtime error"),
            PipeError::TaskJoin { .. } => (0x5002, "task join failed"),
            PipeError::Internal { .. } => (0x7001, "internal error"),
        };
        write!(f, "Error 0x{:04X}: {}", code, message)
    }
}

impl PipeError {
    /// Creates a [`PipeError::SourceFailed`] from a reason string
    ///
    /// The reason is carried verbatim in std builds and discarded in no_std
    /// builds, keeping call sites identical on both targets.
    pub fn source_failed(reason: &str) -> Self {
        #[cfg(feature = "std")]
        {
            PipeError::SourceFailed {
                reason: reason.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = reason;
            PipeError::SourceFailed { _reason: () }
        }
    }

    /// Creates a [`PipeError::SourceDropped`] from a reason string
    pub fn source_dropped(reason: &str) -> Self {
        #[cfg(feature = "std")]
        {
            PipeError::SourceDropped {
                reason: reason.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = reason;
            PipeError::SourceDropped { _reason: () }
        }
    }

    /// Creates a [`PipeError::ChannelClosed`] naming the channel
    pub fn channel_closed(channel_name: &str) -> Self {
        #[cfg(feature = "std")]
        {
            PipeError::ChannelClosed {
                channel_name: channel_name.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = channel_name;
            PipeError::ChannelClosed { _channel_name: () }
        }
    }

    /// Creates a [`PipeError::ProtocolViolation`] from a detail string
    pub fn protocol_violation(detail: &str) -> Self {
        #[cfg(feature = "std")]
        {
            PipeError::ProtocolViolation {
                detail: detail.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = detail;
            PipeError::ProtocolViolation { _detail: () }
        }
    }

    /// Creates a [`PipeError::InvalidConfig`] naming the offending parameter
    pub fn invalid_config(parameter: &str) -> Self {
        #[cfg(feature = "std")]
        {
            PipeError::InvalidConfig {
                parameter: parameter.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = parameter;
            PipeError::InvalidConfig { _parameter: () }
        }
    }

    /// Creates a [`PipeError::Runtime`] from a message
    pub fn runtime(message: &str) -> Self {
        #[cfg(feature = "std")]
        {
            PipeError::Runtime {
                message: message.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = message;
            PipeError::Runtime { _message: () }
        }
    }

    /// Creates a [`PipeError::TaskJoin`] from a message
    pub fn task_join(message: &str) -> Self {
        #[cfg(feature = "std")]
        {
            PipeError::TaskJoin {
                message: message.to_string(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            let _ = message;
            PipeError::TaskJoin { _message: () }
        }
    }

    /// Creates an internal error with a specific error code
    pub fn internal(code: u32) -> Self {
        PipeError::Internal {
            code,
            #[cfg(feature = "std")]
            message: String::new(),
            #[cfg(not(feature = "std"))]
            _message: (),
        }
    }

    /// Returns true if this error is the benign closed-channel race
    ///
    /// The producer loop uses this to distinguish "the consumer side shut
    /// the pipeline down under us" from genuine failures.
    pub fn is_closed_race(&self) -> bool {
        matches!(self, PipeError::ChannelClosed { .. })
    }

    /// Returns true if this error originated in the external producer
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            PipeError::SourceFailed { .. } | PipeError::SourceDropped { .. }
        )
    }

    /// Returns true if this error is a pipeline contract breach
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, PipeError::ProtocolViolation { .. })
    }

    /// Returns a numeric error code for embedded environments
    ///
    /// Codes are stable and organized by category range:
    ///
    /// - **Producer**: 0x1000-0x1FFF
    /// - **Channel**: 0x2000-0x2FFF
    /// - **Protocol**: 0x3000-0x3FFF
    /// - **Configuration**: 0x4000-0x4FFF
    /// - **Runtime**: 0x5000-0x5FFF
    /// - **Internal**: 0x7000-0x7FFF
    pub const fn error_code(&self) -> u16 {
        match self {
            PipeError::SourceFailed { .. } => 0x1001,
            PipeError::SourceDropped { .. } => 0x1002,
            PipeError::ChannelClosed { .. } => 0x2001,
            PipeError::ProtocolViolation { .. } => 0x3001,
            PipeError::InvalidConfig { .. } => 0x4001,
            PipeError::Runtime { .. } => 0x5001,
            PipeError::TaskJoin { .. } => 0x5002,
            PipeError::Internal { .. } => 0x7001,
        }
    }

    /// Returns the error category (the upper nibble of the error code)
    pub const fn error_category(&self) -> u16 {
        self.error_code() & 0xF000
    }
}

#[cfg(feature = "std")]
impl PipeError {
    /// Adds context to this error, preserving the original cause
    ///
    /// The context is prepended to the variant's descriptive field, so
    /// repeated calls build an outermost-first chain:
    ///
    /// ```rust
    /// use framepipe_core::PipeError;
    ///
    /// let error = PipeError::source_failed("CRC mismatch")
    ///     .with_context("frame 17")
    ///     .with_context("startup probe");
    ///
    /// assert_eq!(
    ///     error.to_string(),
    ///     "External producer failed: startup probe: frame 17: CRC mismatch"
    /// );
    /// ```
    pub fn with_context(self, context: &str) -> Self {
        fn chain(context: &str, detail: &str) -> String {
            if detail.is_empty() {
                context.to_string()
            } else {
                format!("{}: {}", context, detail)
            }
        }

        match self {
            PipeError::SourceFailed { reason } => PipeError::SourceFailed {
                reason: chain(context, &reason),
            },
            PipeError::SourceDropped { reason } => PipeError::SourceDropped {
                reason: chain(context, &reason),
            },
            PipeError::ChannelClosed { channel_name } => PipeError::ChannelClosed {
                channel_name: chain(context, &channel_name),
            },
            PipeError::ProtocolViolation { detail } => PipeError::ProtocolViolation {
                detail: chain(context, &detail),
            },
            PipeError::InvalidConfig { parameter } => PipeError::InvalidConfig {
                parameter: chain(context, &parameter),
            },
            PipeError::Runtime { message } => PipeError::Runtime {
                message: chain(context, &message),
            },
            PipeError::TaskJoin { message } => PipeError::TaskJoin {
                message: chain(context, &message),
            },
            PipeError::Internal { code, message } => PipeError::Internal {
                code,
                message: chain(context, &message),
            },
        }
    }
}
