use crate::depth_pipeline::acquisition::RawFrame;
use crate::depth_pipeline::common::error::Result;

/// Min, max and mean of a float frame in native units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
}

impl FrameStats {
    pub fn of(frame: &RawFrame<'_>) -> Result<Self> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for v in frame.float_samples()? {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
            count += 1;
        }

        // RawFrame guarantees at least one pixel
        Ok(Self {
            min,
            max,
            mean: sum / count.max(1) as f64,
        })
    }
}
