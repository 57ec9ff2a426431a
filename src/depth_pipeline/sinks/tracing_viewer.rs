use tracing::debug;

use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::PointCloud;
use crate::depth_pipeline::sinks::display::{CameraPose, PointCloudViewer};

/// Stands in for a 3D viewer by logging what it would have drawn.
#[derive(Debug, Default)]
pub struct TracingViewer {
    rendered: u64,
}

impl TracingViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl PointCloudViewer for TracingViewer {
    fn render(&mut self, cloud: &PointCloud, pose: &CameraPose) -> Result<()> {
        self.rendered += 1;
        if let Some((min, max)) = cloud.bounds() {
            debug!(
                points = cloud.len(),
                min = ?(min.x, min.y, min.z),
                max = ?(max.x, max.y, max.z),
                eye = ?pose.eye,
                "Point cloud frame"
            );
        }
        Ok(())
    }
}
