use image::{GrayImage, RgbImage};

use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::PointCloud;

/// An 8-bit image ready to be shown
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayImage {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl DisplayImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            DisplayImage::Gray(image) => image.dimensions(),
            DisplayImage::Rgb(image) => image.dimensions(),
        }
    }
}

/// A key press reported by a display sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
}

impl Key {
    pub const ESCAPE_CODE: i32 = 27;

    pub fn code(&self) -> i32 {
        match self {
            Key::Escape => Self::ESCAPE_CODE,
            Key::Char(c) => *c as i32,
        }
    }
}

/// Named windows of 2D images plus keyboard input
pub trait DisplaySink {
    fn show(&mut self, window: &str, image: &DisplayImage) -> Result<()>;

    /// Waits up to `delay_ms` for a key press.
    fn wait_key(&mut self, delay_ms: u64) -> Result<Option<Key>>;
}

/// Where a 3D viewer places its camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraPose {
    /// At the sensor, looking down -Y where projected points land, with
    /// image rows above the principal point towards +Z.
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 0.0],
            target: [0.0, -1.0, 0.0],
            up: [0.0, 0.0, 1.0],
        }
    }
}

pub trait PointCloudViewer {
    fn render(&mut self, cloud: &PointCloud, pose: &CameraPose) -> Result<()>;
}
