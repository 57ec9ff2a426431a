//! Common utilities module
//!
//! Error type and the data types passed between pipeline stages.

pub mod error;
pub mod types;

pub use error::{PipelineError, Result};
pub use types::{CameraIntrinsics, FrameKind, PixelFormat, Point3D, PointCloud};
