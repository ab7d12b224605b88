//! Channel configuration types
//!
//! Defines the configuration enum selecting the channel's backpressure
//! policy.

use core::fmt;

/// Backpressure policy for a frame channel
///
/// Selects when a producer's `await_writable` gate opens. The gate controls
/// the backpressure *decision*; the wait/wake *mechanism* belongs to the
/// channel implementation.
///
/// # Quick Selection Guide
/// - **Decoupled producer/consumer pacing**: `Bounded` with a capacity
///   matched to the burstiness of the producer
/// - **Producer already externally paced**: `Ungated`
///
/// # Examples
/// ```rust
/// use framepipe_core::ChannelCfg;
///
/// let paced = ChannelCfg::Bounded { capacity: 8 }; // gate: len < 8
/// let free_running = ChannelCfg::Ungated;          // writes never wait
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelCfg {
    /// Bounded FIFO with a capacity gate
    ///
    /// `await_writable` suspends while the buffered length is at or above
    /// `capacity`, so the buffered length never exceeds `capacity` from the
    /// producer's perspective.
    Bounded {
        /// Gate opens while fewer than this many items are buffered
        capacity: usize,
    },

    /// Ungated writes
    ///
    /// `await_writable` returns immediately; the buffer grows with the
    /// producer's pace. Memory is bounded only by the producer's iteration
    /// limit.
    Ungated,
}

impl ChannelCfg {
    /// Validates the channel configuration
    ///
    /// Returns `Err` if a bounded capacity is 0 (the gate could never open).
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            ChannelCfg::Bounded { capacity } => {
                if *capacity == 0 {
                    return Err("bounded channel capacity must be > 0");
                }
                Ok(())
            }
            ChannelCfg::Ungated => Ok(()),
        }
    }

    /// Returns whether the write gate is open at the given buffered length
    pub fn gate_open(&self, buffered_len: usize) -> bool {
        match self {
            ChannelCfg::Bounded { capacity } => buffered_len < *capacity,
            ChannelCfg::Ungated => true,
        }
    }

    /// Returns a human-readable name for this policy
    pub fn name(&self) -> &'static str {
        match self {
            ChannelCfg::Bounded { .. } => "bounded",
            ChannelCfg::Ungated => "ungated",
        }
    }
}

impl Default for ChannelCfg {
    /// Returns the default channel configuration: `Bounded { capacity: 16 }`
    fn default() -> Self {
        ChannelCfg::Bounded { capacity: 16 }
    }
}

impl fmt::Display for ChannelCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelCfg::Bounded { capacity } => write!(f, "Bounded(capacity={})", capacity),
            ChannelCfg::Ungated => write!(f, "Ungated"),
        }
    }
}
