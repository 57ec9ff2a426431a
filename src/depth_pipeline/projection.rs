//! Depth map to point cloud projection

mod projector;


pub use projector::{PointCloudProjector, project};
