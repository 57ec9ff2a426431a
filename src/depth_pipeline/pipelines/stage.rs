use tracing::warn;

use crate::depth_pipeline::acquisition::SyncedFrames;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::CameraIntrinsics;
use crate::depth_pipeline::pipelines::timing::PipelineTimings;
use crate::depth_pipeline::sinks::{DisplayImage, DisplaySink};

/// Per-iteration facts the loop passes to its stage
#[derive(Debug, Clone, Copy)]
pub struct StageContext {
    pub intrinsics: CameraIntrinsics,
    /// Frame sets processed before this one
    pub frame_index: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    Continue,
    Quit,
}

/// Work done on each frame set while its buffers are held.
pub trait FrameStage {
    fn process(
        &mut self,
        frames: &SyncedFrames<'_>,
        ctx: &StageContext,
        timings: &mut PipelineTimings,
    ) -> Result<StageAction>;
}

/// Display failures are reported and skipped; they never stop the loop.
pub(crate) fn show_or_warn<S: DisplaySink>(sink: &mut S, window: &str, image: &DisplayImage) {
    if let Err(e) = sink.show(window, image) {
        warn!(window, "Failed to display frame: {}", e);
    }
}
