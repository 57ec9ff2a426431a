use tracing::instrument;

use crate::depth_pipeline::acquisition::RawFrame;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::FrameKind;
use crate::depth_pipeline::normalize::color;
use crate::depth_pipeline::normalize::types::{NormalizedData, NormalizedFrame, SampleRange};

/// Native full scale of the infrared sensor.
pub const INFRARED_FULL_SCALE: f32 = 65535.0;

/// Empirical maximum of the depth stream in native units (mm).
pub const DEPTH_EMPIRICAL_MAX: f32 = 4499.92;

/// Maps `value` so that `full_scale` lands on `range.upper()`. No clamping:
/// values past full scale normalize past the upper bound.
pub fn normalize_sample(value: f32, full_scale: f32, range: SampleRange) -> f32 {
    match range {
        SampleRange::Unit => value / full_scale,
        SampleRange::Byte => value * (255.0 / full_scale),
    }
}

/// Rescales raw frames into bounded analysis / display ranges.
#[derive(Debug, Clone, Copy)]
pub struct FrameNormalizer {
    pub infrared_range: SampleRange,
    pub depth_range: SampleRange,
}

impl Default for FrameNormalizer {
    fn default() -> Self {
        Self::new(SampleRange::Unit, SampleRange::Unit)
    }
}

impl FrameNormalizer {
    pub fn new(infrared_range: SampleRange, depth_range: SampleRange) -> Self {
        Self {
            infrared_range,
            depth_range,
        }
    }

    /// Same width and height as `frame`; the color padding channel is dropped.
    #[instrument(skip_all, fields(kind = frame.kind.name(), width = frame.width, height = frame.height))]
    pub fn normalize(&self, frame: &RawFrame<'_>) -> Result<NormalizedFrame> {
        let data = match frame.kind {
            FrameKind::Color => NormalizedData::Rgb(color::drop_padding(frame)?),
            FrameKind::Infrared => self.scalar(frame, INFRARED_FULL_SCALE, self.infrared_range)?,
            FrameKind::Depth => self.scalar(frame, DEPTH_EMPIRICAL_MAX, self.depth_range)?,
        };

        Ok(NormalizedFrame {
            kind: frame.kind,
            width: frame.width,
            height: frame.height,
            timestamp: frame.timestamp,
            data,
        })
    }

    fn scalar(&self, frame: &RawFrame<'_>, full_scale: f32, range: SampleRange) -> Result<NormalizedData> {
        let samples = frame
            .float_samples()?
            .map(|v| normalize_sample(v, full_scale, range))
            .collect();
        Ok(NormalizedData::Scalar { range, samples })
    }
}

/// Square-root transform of a normalized scalar frame, compressing the
/// dynamic range for display. Negative samples map to zero.
pub fn sqrt_compress(frame: &NormalizedFrame) -> NormalizedFrame {
    let mut out = frame.clone();
    if let NormalizedData::Scalar { range, samples } = &mut out.data {
        let upper = range.upper();
        for v in samples.iter_mut() {
            *v = upper * (v.max(0.0) / upper).sqrt();
        }
    }
    out
}
