use tracing::trace;

use crate::depth_pipeline::acquisition::acquirer::FrameAcquirer;
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::{FrameKind, PixelFormat};
use crate::depth_pipeline::device::{DriverFrame, FrameMap, SensorDevice};

/// A frame borrowed from a driver buffer. Valid only while the
/// [`FrameSet`] it came from is alive.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    pub kind: FrameKind,
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    pub timestamp: u32,
    data: &'a [u8],
}

impl<'a> RawFrame<'a> {
    /// Wraps `data` after checking it covers `width * height` pixels.
    pub fn new(kind: FrameKind, width: usize, height: usize, format: PixelFormat, data: &'a [u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        let expected = width * height * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(PipelineError::BufferSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            kind,
            width,
            height,
            format,
            timestamp: 0,
            data,
        })
    }

    pub fn from_driver(kind: FrameKind, frame: &'a DriverFrame) -> Result<Self> {
        let mut raw = Self::new(kind, frame.width, frame.height, frame.format, &frame.data)?;
        raw.timestamp = frame.timestamp;
        Ok(raw)
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Samples of a single-channel float frame in row-major order
    pub fn float_samples(&self) -> Result<impl Iterator<Item = f32> + 'a> {
        if self.format != PixelFormat::Float32 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{} frame is {:?}, expected 32-bit float",
                self.kind.name(),
                self.format
            )));
        }
        Ok(self
            .data
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]])))
    }
}

/// The frames of one synchronized capture
#[derive(Debug, Clone, Default)]
pub struct SyncedFrames<'a> {
    pub color: Option<RawFrame<'a>>,
    pub infrared: Option<RawFrame<'a>>,
    pub depth: Option<RawFrame<'a>>,
}

impl<'a> SyncedFrames<'a> {
    pub fn insert(&mut self, frame: RawFrame<'a>) {
        match frame.kind {
            FrameKind::Color => self.color = Some(frame),
            FrameKind::Infrared => self.infrared = Some(frame),
            FrameKind::Depth => self.depth = Some(frame),
        }
    }

    pub fn get(&self, kind: FrameKind) -> Result<&RawFrame<'a>> {
        let frame = match kind {
            FrameKind::Color => self.color.as_ref(),
            FrameKind::Infrared => self.infrared.as_ref(),
            FrameKind::Depth => self.depth.as_ref(),
        };
        frame.ok_or(PipelineError::MissingFrame(kind))
    }

    pub fn timestamp(&self) -> Option<u32> {
        [&self.color, &self.infrared, &self.depth]
            .into_iter()
            .flatten()
            .map(|frame| frame.timestamp)
            .next()
    }
}

/// Frames handed out by [`FrameAcquirer::acquire`].
///
/// The driver buffers go back to the pool when this is dropped, so every
/// exit path releases. Holding it borrows the acquirer mutably, which rules
/// out a second outstanding set at compile time.
pub struct FrameSet<'a, D: SensorDevice> {
    acquirer: &'a mut FrameAcquirer<D>,
    frames: Option<FrameMap>,
}

impl<'a, D: SensorDevice> FrameSet<'a, D> {
    pub(crate) fn new(acquirer: &'a mut FrameAcquirer<D>, frames: FrameMap) -> Self {
        Self {
            acquirer,
            frames: Some(frames),
        }
    }

    fn map(&self) -> Result<&FrameMap> {
        self.frames.as_ref().ok_or(PipelineError::UnreleasedFrameSet)
    }

    pub fn frame(&self, kind: FrameKind) -> Result<RawFrame<'_>> {
        let frame = self.map()?.get(kind).ok_or(PipelineError::MissingFrame(kind))?;
        RawFrame::from_driver(kind, frame)
    }

    pub fn frames(&self) -> Result<SyncedFrames<'_>> {
        let mut synced = SyncedFrames::default();
        for (kind, frame) in self.map()?.iter() {
            synced.insert(RawFrame::from_driver(kind, frame)?);
        }
        Ok(synced)
    }

    pub fn timestamp(&self) -> Option<u32> {
        self.frames.as_ref()?.iter().map(|(_, frame)| frame.timestamp).next()
    }

    pub fn sequence(&self) -> Option<u32> {
        self.frames.as_ref()?.iter().map(|(_, frame)| frame.sequence).next()
    }

    /// Every requested stream is present and all share one capture instant.
    pub(crate) fn validate(&self, requested: &[FrameKind]) -> Result<()> {
        let map = self.map()?;
        if let Some(&missing) = requested.iter().find(|kind| !map.contains(**kind)) {
            return Err(PipelineError::MissingFrame(missing));
        }

        let mut stamps = map.iter().map(|(kind, frame)| (kind, frame.timestamp));
        if let Some((first_kind, first)) = stamps.next() {
            if let Some((kind, stamp)) = stamps.find(|(_, stamp)| *stamp != first) {
                return Err(PipelineError::InconsistentFrameSet(format!(
                    "{} at {} but {} at {}",
                    first_kind.name(),
                    first,
                    kind.name(),
                    stamp
                )));
            }
        }
        Ok(())
    }

    /// Returns the buffers to the driver now instead of at scope exit.
    pub fn release(self) {}
}

impl<D: SensorDevice> Drop for FrameSet<'_, D> {
    fn drop(&mut self) {
        if let Some(frames) = self.frames.take() {
            trace!(frames = frames.len(), "Releasing frame set");
            self.acquirer.release_frames(frames);
        }
    }
}
