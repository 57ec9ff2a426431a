//! Frame normalization module
//!
//! Rescales native infrared and depth samples into [0, 1] or [0, 255] and
//! turns packed color into RGB, plus the per-frame statistics and color
//! post-processing the preview shows.

pub mod color;
mod normalizer;
mod stats;
pub mod types;


pub use normalizer::{DEPTH_EMPIRICAL_MAX, FrameNormalizer, INFRARED_FULL_SCALE, normalize_sample, sqrt_compress};
pub use stats::FrameStats;
pub use types::{NormalizedData, NormalizedFrame, SampleRange};
