//! Capture pipelines module
//!
//! Orchestrates acquisition, normalization, projection and display. The
//! loop is generic over the device and over the stage that does the
//! per-frame work, so the viewer and point cloud variants share it.

mod capture_loop;
pub mod config;
mod point_cloud_stage;
mod preview_stage;
mod stage;
mod timing;


pub use capture_loop::{CaptureLoop, ExitReason, LoopSummary};
pub use config::{PipelineConfig, PipelineConfigBuilder, TimeoutPolicy};
pub use point_cloud_stage::{EXPORT_KEY, PointCloudStage};
pub use preview_stage::PreviewStage;
pub use stage::{FrameStage, StageAction, StageContext};
pub use timing::{PipelineTimings, StepTiming, Timer};
