use std::io::Write;

use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::PointCloud;

pub trait PointCloudWriter {
    fn write_cloud(&self, cloud: &PointCloud, output: &mut dyn Write) -> Result<()>;

    /// File extension, without the dot, for files this writer produces
    fn extension(&self) -> &'static str;
}
