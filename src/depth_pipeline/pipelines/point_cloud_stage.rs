//! Point cloud stage: unit-range depth, projection, viewer and on-demand
//! export.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::depth_pipeline::acquisition::SyncedFrames;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::{FrameKind, PointCloud};
use crate::depth_pipeline::export::{AsciiPlyWriter, PointCloudExporter, PointCloudWriter};
use crate::depth_pipeline::normalize::{FrameNormalizer, color, sqrt_compress};
use crate::depth_pipeline::pipelines::config::PipelineConfig;
use crate::depth_pipeline::pipelines::stage::{FrameStage, StageAction, StageContext, show_or_warn};
use crate::depth_pipeline::pipelines::timing::PipelineTimings;
use crate::depth_pipeline::projection::PointCloudProjector;
use crate::depth_pipeline::sinks::{DisplayImage, DisplaySink, Key, PointCloudViewer};

/// Key that exports the current point cloud.
pub const EXPORT_KEY: char = 'p';

pub struct PointCloudStage<S: DisplaySink, V: PointCloudViewer, W: PointCloudWriter = AsciiPlyWriter> {
    sink: S,
    viewer: V,
    exporter: PointCloudExporter<W>,
    normalizer: FrameNormalizer,
    config: PipelineConfig,
    exported: Vec<PathBuf>,
    last_cloud: Option<PointCloud>,
}

impl<S: DisplaySink, V: PointCloudViewer> PointCloudStage<S, V, AsciiPlyWriter> {
    pub fn new(sink: S, viewer: V, config: PipelineConfig) -> Self {
        Self::with_exporter(sink, viewer, PointCloudExporter::new(), config)
    }
}

impl<S: DisplaySink, V: PointCloudViewer, W: PointCloudWriter> PointCloudStage<S, V, W> {
    pub fn with_exporter(sink: S, viewer: V, exporter: PointCloudExporter<W>, config: PipelineConfig) -> Self {
        Self {
            sink,
            viewer,
            exporter,
            normalizer: FrameNormalizer::new(config.infrared_range, config.depth_range),
            config,
            exported: Vec::new(),
            last_cloud: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Files written by successful exports, oldest first
    pub fn exported(&self) -> &[PathBuf] {
        &self.exported
    }

    /// Cloud projected from the most recent frame set
    pub fn last_cloud(&self) -> Option<&PointCloud> {
        self.last_cloud.as_ref()
    }

    fn export_current(&mut self) {
        let Some(cloud) = &self.last_cloud else {
            return;
        };
        match self.exporter.export_timestamped(cloud, &self.config.export_dir) {
            Ok(path) => {
                info!(path = %path.display(), "Saved point cloud");
                self.exported.push(path);
            }
            Err(e) => warn!("Point cloud export failed: {}", e),
        }
    }
}

impl<S: DisplaySink, V: PointCloudViewer, W: PointCloudWriter> FrameStage for PointCloudStage<S, V, W> {
    fn process(
        &mut self,
        frames: &SyncedFrames<'_>,
        ctx: &StageContext,
        timings: &mut PipelineTimings,
    ) -> Result<StageAction> {
        let depth_raw = frames.get(FrameKind::Depth)?;
        let mut views: Vec<(&str, DisplayImage)> = Vec::new();

        let depth = timings.time("normalize", || -> Result<_> {
            if let Some(infrared) = &frames.infrared {
                let mut normalized = self.normalizer.normalize(infrared)?;
                if self.config.infrared_sqrt {
                    normalized = sqrt_compress(&normalized);
                }
                views.push(("IR", normalized.to_display()));
            }

            if let Some(raw_color) = &frames.color {
                let mut rgb = color::drop_padding(raw_color)?;
                if let Some((width, height)) = self.config.color_size {
                    rgb = color::resize(&rgb, width, height);
                }
                views.push(("RGB", DisplayImage::Rgb(rgb)));
            }

            let depth = self.normalizer.normalize(depth_raw)?;
            views.push(("Depth", depth.to_display()));
            Ok(depth)
        })?;

        let projector = PointCloudProjector::new(ctx.intrinsics);
        let cloud = timings.time("project", || projector.project(&depth))?;

        let key = timings.time("display", || -> Result<Option<Key>> {
            for (window, image) in &views {
                show_or_warn(&mut self.sink, window, image);
            }
            if let Err(e) = self.viewer.render(&cloud, &self.config.pose) {
                warn!("Point cloud viewer failed: {}", e);
            }
            self.sink.wait_key(self.config.key_delay_ms)
        })?;

        self.last_cloud = Some(cloud);

        Ok(match key {
            Some(Key::Escape) => StageAction::Quit,
            Some(Key::Char(c)) if c.eq_ignore_ascii_case(&EXPORT_KEY) => {
                timings.time("export", || self.export_current());
                StageAction::Continue
            }
            _ => StageAction::Continue,
        })
    }
}
