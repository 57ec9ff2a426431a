use tracing::{error, info, info_span, warn};

use crate::depth_pipeline::acquisition::{AcquisitionStats, CancellationToken, FrameAcquirer};
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::device::SensorDevice;
use crate::depth_pipeline::pipelines::config::{PipelineConfig, TimeoutPolicy};
use crate::depth_pipeline::pipelines::stage::{FrameStage, StageAction, StageContext};
use crate::depth_pipeline::pipelines::timing::{PipelineTimings, Timer};

/// Why the loop stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Cancelled,
    UserQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub skipped_timeouts: u64,
    pub reason: ExitReason,
    pub acquisition: AcquisitionStats,
}

/// Sequential acquire, process, release loop on the calling thread.
///
/// Iteration n finishes and releases its frame set before iteration n + 1
/// acquires. The cancellation token is checked before each acquire and
/// again once the blocking wait returns.
pub struct CaptureLoop<D: SensorDevice, P: FrameStage> {
    acquirer: FrameAcquirer<D>,
    stage: P,
    config: PipelineConfig,
}

impl<D: SensorDevice, P: FrameStage> CaptureLoop<D, P> {
    pub fn new(acquirer: FrameAcquirer<D>, stage: P, config: PipelineConfig) -> Self {
        Self {
            acquirer,
            stage,
            config,
        }
    }

    pub fn acquirer(&self) -> &FrameAcquirer<D> {
        &self.acquirer
    }

    pub fn stage(&self) -> &P {
        &self.stage
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&mut self, cancel: &CancellationToken) -> Result<LoopSummary> {
        let intrinsics = self.acquirer.intrinsics();
        let mut frames = 0u64;
        let mut skipped_timeouts = 0u64;

        info!(
            timeout_ms = self.config.timeout.as_millis() as u64,
            policy = ?self.config.timeout_policy,
            "Capture loop started"
        );

        let reason = loop {
            if cancel.is_cancelled() {
                break ExitReason::Cancelled;
            }

            let _span = info_span!("frame", index = frames).entered();
            let mut timings = PipelineTimings::new();

            let timer = Timer::start("acquire");
            let set = match self.acquirer.acquire(self.config.timeout) {
                Ok(set) => set,
                Err(PipelineError::FrameTimeout(ms)) => match self.config.timeout_policy {
                    TimeoutPolicy::Abort => {
                        error!(timeout_ms = ms, "Timeout!");
                        return Err(PipelineError::FrameTimeout(ms));
                    }
                    TimeoutPolicy::Skip => {
                        warn!(timeout_ms = ms, "Timeout, skipping iteration");
                        skipped_timeouts += 1;
                        continue;
                    }
                },
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Dropping frame set: {}", e);
                    continue;
                }
            };
            timings.record(timer);

            if cancel.is_cancelled() {
                break ExitReason::Cancelled;
            }

            let ctx = StageContext {
                intrinsics,
                frame_index: frames,
            };
            let outcome = set
                .frames()
                .and_then(|synced| self.stage.process(&synced, &ctx, &mut timings));
            set.release();

            match outcome {
                Ok(action) => {
                    frames += 1;
                    timings.log_summary(ctx.frame_index);
                    if action == StageAction::Quit {
                        break ExitReason::UserQuit;
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!("Frame processing failed: {}", e),
            }
        };

        let summary = LoopSummary {
            frames,
            skipped_timeouts,
            reason,
            acquisition: self.acquirer.stats(),
        };
        info!(
            frames = summary.frames,
            skipped_timeouts = summary.skipped_timeouts,
            reason = ?summary.reason,
            "Capture loop finished"
        );
        Ok(summary)
    }

    /// Stops and closes the device. Also happens on drop.
    pub fn shutdown(&mut self) {
        self.acquirer.shutdown();
    }
}
