use tracing::{debug, instrument};

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::{CameraIntrinsics, FrameKind, Point3D, PointCloud};
use crate::depth_pipeline::normalize::NormalizedFrame;

/// Inverse pinhole projection of a normalized depth map.
///
/// Depth is negated before back-projection so points land along the
/// negative Y axis the viewer looks down:
///
/// ```text
/// X = (x - cx) * -d / fx
/// Y = -d
/// Z = (y - cy) * -d / fy
/// ```
///
/// No distortion correction and no filtering: every pixel yields a point,
/// zero-depth pixels collapse onto the origin.
#[derive(Debug, Clone, Copy)]
pub struct PointCloudProjector {
    intrinsics: CameraIntrinsics,
}

impl PointCloudProjector {
    pub fn new(intrinsics: CameraIntrinsics) -> Self {
        Self { intrinsics }
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    #[instrument(skip_all, fields(width = depth.width, height = depth.height))]
    pub fn project(&self, depth: &NormalizedFrame) -> Result<PointCloud> {
        if depth.kind != FrameKind::Depth {
            return Err(PipelineError::UnsupportedFormat(format!(
                "cannot project a {} frame",
                depth.kind.name()
            )));
        }
        if depth.width == 0 || depth.height == 0 {
            return Err(PipelineError::InvalidDimensions(depth.width, depth.height));
        }
        let samples = depth.samples().ok_or_else(|| {
            PipelineError::UnsupportedFormat("depth frame carries no scalar samples".to_string())
        })?;
        if samples.len() != depth.width * depth.height {
            return Err(PipelineError::BufferSize {
                expected: depth.width * depth.height,
                actual: samples.len(),
            });
        }

        let CameraIntrinsics { fx, fy, cx, cy } = self.intrinsics;
        let mut points = Vec::with_capacity(samples.len());

        for (y, row) in samples.chunks_exact(depth.width).enumerate() {
            let dy = y as f32 - cy;
            for (x, &d) in row.iter().enumerate() {
                let depth = -d;
                points.push(Point3D {
                    x: (x as f32 - cx) * depth / fx,
                    y: depth,
                    z: dy * depth / fy,
                });
            }
        }

        debug!(points = points.len(), "Depth map projected");
        Ok(PointCloud {
            width: depth.width,
            height: depth.height,
            points,
        })
    }
}

pub fn project(depth: &NormalizedFrame, intrinsics: &CameraIntrinsics) -> Result<PointCloud> {
    PointCloudProjector::new(*intrinsics).project(depth)
}
