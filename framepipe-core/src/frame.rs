//! Frame payload type
//!
//! Defines the move-only unit of payload the pipeline carries. The channel,
//! sequence and orchestration layers are generic over any `T: Send +
//! 'static`; [`Frame`] is the concrete payload used by the simulated
//! decoder, the demos and the test suites.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A decoded frame: a monotonically increasing index plus its sample data.
///
/// Frames are deliberately **move-only** (no `Clone`): a frame is owned by
/// exactly one location at a time — decoder, fetch slot, channel slot, or
/// consumer — and ownership transfers at each handoff. `PartialEq`/`Eq`
/// exist for test assertions only.
#[derive(Debug, PartialEq, Eq)]
pub struct Frame {
    /// Position of this frame in the decode order
    pub index: u32,
    /// Decoded sample data
    pub data: Vec<i32>,
}

impl Frame {
    /// Creates a frame from its index and sample data
    pub fn new(index: u32, data: Vec<i32>) -> Self {
        Self { index, data }
    }

    /// Number of samples in this frame
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the frame carries no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the frame, yielding its sample data
    pub fn into_data(self) -> Vec<i32> {
        self.data
    }
}
