use std::io::Write;

use tracing::debug;

use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::PointCloud;
use crate::depth_pipeline::export::writer::PointCloudWriter;

/// Vertex-only ASCII PLY.
///
/// ```text
/// ply
/// format ascii 1.0
/// element vertex <N>
/// property float x
/// property float y
/// property float z
/// end_header
/// <x> <y> <z>      (N lines)
/// ```
///
/// NaN and infinite components are written as `0` so the file stays
/// readable by standard PLY loaders.
pub struct AsciiPlyWriter;

/// Lines written before the first vertex.
pub const PLY_HEADER_LINES: usize = 7;

impl PointCloudWriter for AsciiPlyWriter {
    fn write_cloud(&self, cloud: &PointCloud, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding PLY with {} vertices", cloud.len());

        writeln!(output, "ply")?;
        writeln!(output, "format ascii 1.0")?;
        writeln!(output, "element vertex {}", cloud.len())?;
        writeln!(output, "property float x")?;
        writeln!(output, "property float y")?;
        writeln!(output, "property float z")?;
        writeln!(output, "end_header")?;

        for point in &cloud.points {
            writeln!(
                output,
                "{} {} {}",
                finite_or_zero(point.x),
                finite_or_zero(point.y),
                finite_or_zero(point.z)
            )?;
        }

        output.flush()?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "ply"
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
