//! Frame acquisition module
//!
//! Single-slot handoff between the driver and the capture loop: one frame
//! set out at a time, released on scope exit.

mod acquirer;
mod cancel;
mod frame_set;

#[cfg(test)]
mod tests;

pub use acquirer::{AcquisitionStats, DEFAULT_ACQUIRE_TIMEOUT, FrameAcquirer};
pub use cancel::CancellationToken;
pub use frame_set::{FrameSet, RawFrame, SyncedFrames};
