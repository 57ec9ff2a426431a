use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, instrument};

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::PointCloud;
use crate::depth_pipeline::export::ascii_ply_writer::AsciiPlyWriter;
use crate::depth_pipeline::export::writer::PointCloudWriter;

/// File name for a cloud exported at `now`, e.g.
/// `pointcloud-2024-03-01-14-05-09.ply`.
pub fn timestamped_file_name(now: DateTime<Local>, extension: &str) -> String {
    format!("pointcloud-{}.{}", now.format("%Y-%m-%d-%H-%M-%S"), extension)
}

/// Writes point clouds to files. Failures come back as errors for the
/// caller to report; nothing here aborts acquisition.
pub struct PointCloudExporter<W: PointCloudWriter> {
    writer: W,
}

impl PointCloudExporter<AsciiPlyWriter> {
    pub fn new() -> Self {
        Self {
            writer: AsciiPlyWriter,
        }
    }
}

impl Default for PointCloudExporter<AsciiPlyWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: PointCloudWriter> PointCloudExporter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    #[instrument(skip(self, cloud), fields(points = cloud.len()))]
    pub fn export<P: AsRef<Path> + std::fmt::Debug>(&self, cloud: &PointCloud, path: P) -> Result<()> {
        let path = path.as_ref();

        let file = File::create(path)
            .map_err(|e| PipelineError::ExportError(format!("{}: {}", path.display(), e)))?;
        let mut output = BufWriter::new(file);

        self.writer.write_cloud(cloud, &mut output)?;

        info!(path = %path.display(), points = cloud.len(), "Point cloud exported");
        Ok(())
    }

    /// Exports into `dir` under a name derived from the current local time.
    pub fn export_timestamped(&self, cloud: &PointCloud, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(timestamped_file_name(Local::now(), self.writer.extension()));
        self.export(cloud, &path)?;
        Ok(path)
    }
}
