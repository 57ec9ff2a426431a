//! Color frame conversion: padding drop, display resize, smoothing.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::depth_pipeline::acquisition::RawFrame;
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::PixelFormat;

/// Output resolution of the resized color view.
pub const DISPLAY_WIDTH: u32 = 640;
pub const DISPLAY_HEIGHT: u32 = 480;

/// Sigma a 5x5 Gaussian kernel implies when none is given.
pub const GAUSSIAN_5X5_SIGMA: f32 = 1.1;

/// 4-channel packed color to 3-channel RGB.
pub fn drop_padding(frame: &RawFrame<'_>) -> Result<RgbImage> {
    let (r, g, b) = match frame.format {
        PixelFormat::Bgrx8 => (2, 1, 0),
        PixelFormat::Rgbx8 => (0, 1, 2),
        PixelFormat::Float32 => {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{} frame is not a packed color format",
                frame.kind.name()
            )));
        }
    };

    let rgb: Vec<u8> = frame
        .bytes()
        .chunks_exact(4)
        .flat_map(|px| [px[r], px[g], px[b]])
        .collect();

    RgbImage::from_raw(frame.width as u32, frame.height as u32, rgb)
        .ok_or(PipelineError::InvalidDimensions(frame.width, frame.height))
}

/// Bilinear resize; a no-op copy when the size already matches.
pub fn resize(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

pub fn gaussian_blur(image: &RgbImage, sigma: f32) -> RgbImage {
    imageops::blur(image, sigma)
}
