use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::depth_pipeline::acquisition::frame_set::FrameSet;
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::{CameraIntrinsics, FrameKind};
use crate::depth_pipeline::device::{DeviceSession, FrameMap, SensorDevice};

/// Default bound on a single acquisition.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Acquire / release bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionStats {
    pub acquired: u64,
    pub released: u64,
    pub timeouts: u64,
}

/// Blocking retrieval of synchronized frame sets from a started device.
pub struct FrameAcquirer<D: SensorDevice> {
    session: DeviceSession<D>,
    kinds: Vec<FrameKind>,
    outstanding: usize,
    stats: AcquisitionStats,
}

impl<D: SensorDevice> FrameAcquirer<D> {
    /// `kinds` must match the streams the session's listener was registered for.
    pub fn new(session: DeviceSession<D>, kinds: &[FrameKind]) -> Self {
        Self {
            session,
            kinds: kinds.to_vec(),
            outstanding: 0,
            stats: AcquisitionStats::default(),
        }
    }

    /// Blocks until a complete frame set arrives or `timeout` elapses.
    ///
    /// The returned set releases its buffers when dropped. A set that was
    /// leaked instead of dropped is reported as
    /// [`PipelineError::UnreleasedFrameSet`] rather than waiting on a pool
    /// that can never refill.
    #[instrument(skip(self), fields(timeout_ms = timeout.as_millis() as u64))]
    pub fn acquire(&mut self, timeout: Duration) -> Result<FrameSet<'_, D>> {
        if self.outstanding > 0 {
            warn!(outstanding = self.outstanding, "Acquire called with an unreleased frame set");
            return Err(PipelineError::UnreleasedFrameSet);
        }

        let frames = match self.session.device_mut()?.wait_for_new_frame(timeout)? {
            Some(frames) => frames,
            None => {
                self.stats.timeouts += 1;
                return Err(PipelineError::FrameTimeout(timeout.as_millis() as u64));
            }
        };

        self.outstanding += 1;
        self.stats.acquired += 1;

        let kinds = self.kinds.clone();
        let set = FrameSet::new(self, frames);
        set.validate(&kinds)?;

        debug!(sequence = set.sequence(), timestamp = set.timestamp(), "Frame set acquired");
        Ok(set)
    }

    pub(crate) fn release_frames(&mut self, frames: FrameMap) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.stats.released += 1;
        match self.session.device_mut() {
            Ok(device) => device.release(frames),
            Err(_) => debug!("Device already shut down, dropping frame buffers"),
        }
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.session.intrinsics()
    }

    pub fn session(&self) -> &DeviceSession<D> {
        &self.session
    }

    pub fn kinds(&self) -> &[FrameKind] {
        &self.kinds
    }

    /// Frame sets acquired but not yet released
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn stats(&self) -> AcquisitionStats {
        self.stats
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}
