//! Capture pipeline configuration types

use std::path::PathBuf;
use std::time::Duration;

use crate::depth_pipeline::acquisition::DEFAULT_ACQUIRE_TIMEOUT;
use crate::depth_pipeline::common::types::FrameKind;
use crate::depth_pipeline::normalize::SampleRange;
use crate::depth_pipeline::normalize::color::{DISPLAY_HEIGHT, DISPLAY_WIDTH, GAUSSIAN_5X5_SIGMA};
use crate::depth_pipeline::sinks::{CameraPose, SnapshotCompression};

/// What the loop does when no frame set arrives within the timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Stop the loop and report the timeout (default)
    Abort,
    /// Log it and try again
    Skip,
}

/// Configuration for the capture loop and its stages
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bound on each blocking acquisition
    pub timeout: Duration,
    pub timeout_policy: TimeoutPolicy,
    /// Streams the frame listener is registered for
    pub frame_kinds: Vec<FrameKind>,
    pub infrared_range: SampleRange,
    pub depth_range: SampleRange,
    /// Square-root the normalized infrared before display
    pub infrared_sqrt: bool,
    /// Resize color to this size before display; `None` keeps the native size
    pub color_size: Option<(u32, u32)>,
    /// Gaussian blur of the resized color; `None` skips the filtered view
    pub color_blur_sigma: Option<f32>,
    /// How long each iteration waits for a key press
    pub key_delay_ms: u64,
    /// Where on-demand point cloud exports go
    pub export_dir: PathBuf,
    pub pose: CameraPose,
    /// Write display snapshots every this many frames
    pub snapshot_every: u64,
    pub snapshot_compression: SnapshotCompression,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ACQUIRE_TIMEOUT,
            timeout_policy: TimeoutPolicy::Abort,
            frame_kinds: FrameKind::ALL.to_vec(),
            infrared_range: SampleRange::Unit,
            depth_range: SampleRange::Unit,
            infrared_sqrt: false,
            color_size: Some((DISPLAY_WIDTH, DISPLAY_HEIGHT)),
            color_blur_sigma: None,
            key_delay_ms: 1,
            export_dir: PathBuf::from("."),
            pose: CameraPose::default(),
            snapshot_every: 30,
            snapshot_compression: SnapshotCompression::None,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// 8-bit infrared / depth with resized and filtered color views
    pub fn viewer() -> Self {
        Self::builder()
            .infrared_range(SampleRange::Byte)
            .depth_range(SampleRange::Byte)
            .color_blur_sigma(Some(GAUSSIAN_5X5_SIGMA))
            .build()
    }

    /// Unit-range depth for projection, square-rooted infrared
    pub fn point_cloud() -> Self {
        Self::builder()
            .infrared_range(SampleRange::Unit)
            .depth_range(SampleRange::Unit)
            .infrared_sqrt(true)
            .build()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    timeout: Option<Duration>,
    timeout_policy: Option<TimeoutPolicy>,
    frame_kinds: Option<Vec<FrameKind>>,
    infrared_range: Option<SampleRange>,
    depth_range: Option<SampleRange>,
    infrared_sqrt: Option<bool>,
    color_size: Option<Option<(u32, u32)>>,
    color_blur_sigma: Option<Option<f32>>,
    key_delay_ms: Option<u64>,
    export_dir: Option<PathBuf>,
    pose: Option<CameraPose>,
    snapshot_every: Option<u64>,
    snapshot_compression: Option<SnapshotCompression>,
}

impl PipelineConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = Some(policy);
        self
    }

    pub fn frame_kinds(mut self, kinds: &[FrameKind]) -> Self {
        self.frame_kinds = Some(kinds.to_vec());
        self
    }

    pub fn infrared_range(mut self, range: SampleRange) -> Self {
        self.infrared_range = Some(range);
        self
    }

    pub fn depth_range(mut self, range: SampleRange) -> Self {
        self.depth_range = Some(range);
        self
    }

    pub fn infrared_sqrt(mut self, enable: bool) -> Self {
        self.infrared_sqrt = Some(enable);
        self
    }

    pub fn color_size(mut self, size: Option<(u32, u32)>) -> Self {
        self.color_size = Some(size);
        self
    }

    pub fn color_blur_sigma(mut self, sigma: Option<f32>) -> Self {
        self.color_blur_sigma = Some(sigma);
        self
    }

    pub fn key_delay_ms(mut self, delay: u64) -> Self {
        self.key_delay_ms = Some(delay);
        self
    }

    pub fn export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn pose(mut self, pose: CameraPose) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn snapshot_every(mut self, frames: u64) -> Self {
        self.snapshot_every = Some(frames);
        self
    }

    pub fn snapshot_compression(mut self, compression: SnapshotCompression) -> Self {
        self.snapshot_compression = Some(compression);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            timeout: self.timeout.unwrap_or(default.timeout),
            timeout_policy: self.timeout_policy.unwrap_or(default.timeout_policy),
            frame_kinds: self.frame_kinds.unwrap_or(default.frame_kinds),
            infrared_range: self.infrared_range.unwrap_or(default.infrared_range),
            depth_range: self.depth_range.unwrap_or(default.depth_range),
            infrared_sqrt: self.infrared_sqrt.unwrap_or(default.infrared_sqrt),
            color_size: self.color_size.unwrap_or(default.color_size),
            color_blur_sigma: self.color_blur_sigma.unwrap_or(default.color_blur_sigma),
            key_delay_ms: self.key_delay_ms.unwrap_or(default.key_delay_ms),
            export_dir: self.export_dir.unwrap_or(default.export_dir),
            pose: self.pose.unwrap_or(default.pose),
            snapshot_every: self.snapshot_every.unwrap_or(default.snapshot_every),
            snapshot_compression: self.snapshot_compression.unwrap_or(default.snapshot_compression),
        }
    }
}
