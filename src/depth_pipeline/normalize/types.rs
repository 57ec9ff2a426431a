//! Normalized frame types

use image::{GrayImage, RgbImage};

use crate::depth_pipeline::common::types::FrameKind;
use crate::depth_pipeline::sinks::DisplayImage;

/// Target range of a normalized scalar frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRange {
    /// Full scale maps to 1.0
    Unit,
    /// Full scale maps to 255.0
    Byte,
}

impl SampleRange {
    /// Value a sample at the native full scale normalizes to
    pub fn upper(&self) -> f32 {
        match self {
            SampleRange::Unit => 1.0,
            SampleRange::Byte => 255.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedData {
    /// Infrared or depth samples, row-major, unclamped
    Scalar { range: SampleRange, samples: Vec<f32> },
    /// Color with the padding channel dropped
    Rgb(RgbImage),
}

/// An owned, rescaled copy of a raw frame. Outlives the frame set it was
/// made from.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFrame {
    pub kind: FrameKind,
    pub width: usize,
    pub height: usize,
    pub timestamp: u32,
    pub data: NormalizedData,
}

impl NormalizedFrame {
    pub fn scalar(kind: FrameKind, width: usize, height: usize, range: SampleRange, samples: Vec<f32>) -> Self {
        Self {
            kind,
            width,
            height,
            timestamp: 0,
            data: NormalizedData::Scalar { range, samples },
        }
    }

    pub fn samples(&self) -> Option<&[f32]> {
        match &self.data {
            NormalizedData::Scalar { samples, .. } => Some(samples),
            NormalizedData::Rgb(_) => None,
        }
    }

    pub fn range(&self) -> Option<SampleRange> {
        match &self.data {
            NormalizedData::Scalar { range, .. } => Some(*range),
            NormalizedData::Rgb(_) => None,
        }
    }

    pub fn rgb(&self) -> Option<&RgbImage> {
        match &self.data {
            NormalizedData::Rgb(image) => Some(image),
            NormalizedData::Scalar { .. } => None,
        }
    }

    pub fn sample(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples()?.get(y * self.width + x).copied()
    }

    /// 8-bit rendering for display. This is the only place samples are
    /// saturated to the displayable range.
    pub fn to_display(&self) -> DisplayImage {
        match &self.data {
            NormalizedData::Rgb(image) => DisplayImage::Rgb(image.clone()),
            NormalizedData::Scalar { range, samples } => {
                let scale = 255.0 / range.upper();
                let pixels = samples
                    .iter()
                    .map(|&v| (v * scale).round().clamp(0.0, 255.0) as u8)
                    .collect();
                // Buffer length equals width * height by construction
                let image = GrayImage::from_raw(self.width as u32, self.height as u32, pixels)
                    .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32));
                DisplayImage::Gray(image)
            }
        }
    }
}
