//! Viewer stage: statistics, 8-bit normalization and the color views.

use tracing::info;

use crate::depth_pipeline::acquisition::SyncedFrames;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::normalize::{FrameNormalizer, FrameStats, color, sqrt_compress};
use crate::depth_pipeline::pipelines::config::PipelineConfig;
use crate::depth_pipeline::pipelines::stage::{FrameStage, StageAction, StageContext, show_or_warn};
use crate::depth_pipeline::pipelines::timing::PipelineTimings;
use crate::depth_pipeline::sinks::{DisplayImage, DisplaySink, Key};

pub struct PreviewStage<S: DisplaySink> {
    sink: S,
    normalizer: FrameNormalizer,
    config: PipelineConfig,
}

impl<S: DisplaySink> PreviewStage<S> {
    pub fn new(sink: S, config: PipelineConfig) -> Self {
        Self {
            sink,
            normalizer: FrameNormalizer::new(config.infrared_range, config.depth_range),
            config,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: DisplaySink> FrameStage for PreviewStage<S> {
    fn process(
        &mut self,
        frames: &SyncedFrames<'_>,
        _ctx: &StageContext,
        timings: &mut PipelineTimings,
    ) -> Result<StageAction> {
        let mut views: Vec<(&str, DisplayImage)> = Vec::new();

        timings.time("normalize", || -> Result<()> {
            if let Some(depth) = &frames.depth {
                let stats = FrameStats::of(depth)?;
                info!(min = stats.min, max = stats.max, avg = stats.mean, "Depth");
                views.push(("Depth", self.normalizer.normalize(depth)?.to_display()));
            }

            if let Some(infrared) = &frames.infrared {
                let stats = FrameStats::of(infrared)?;
                info!(min = stats.min, max = stats.max, avg = stats.mean, "IR");
                let mut normalized = self.normalizer.normalize(infrared)?;
                if self.config.infrared_sqrt {
                    normalized = sqrt_compress(&normalized);
                }
                views.push(("IR", normalized.to_display()));
            }

            if let Some(raw_color) = &frames.color {
                let rgb = color::drop_padding(raw_color)?;
                if let Some((width, height)) = self.config.color_size {
                    let resized = color::resize(&rgb, width, height);
                    if let Some(sigma) = self.config.color_blur_sigma {
                        views.push(("Filtered RGB", DisplayImage::Rgb(color::gaussian_blur(&resized, sigma))));
                    }
                    views.push(("Resized RGB", DisplayImage::Rgb(resized)));
                }
                views.push(("RGB", DisplayImage::Rgb(rgb)));
            }
            Ok(())
        })?;

        let key = timings.time("display", || -> Result<Option<Key>> {
            for (window, image) in &views {
                show_or_warn(&mut self.sink, window, image);
            }
            self.sink.wait_key(self.config.key_delay_ms)
        })?;

        Ok(match key {
            Some(Key::Escape) => StageAction::Quit,
            _ => StageAction::Continue,
        })
    }
}
