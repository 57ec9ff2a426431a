//! Sensor driver capability.
//!
//! The pipeline never talks to hardware directly. A driver enumerates and
//! opens devices; an opened device delivers synchronized frame maps through
//! its registered listener and takes the buffers back on release.

use std::collections::HashMap;
use std::time::Duration;

use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::common::types::{CameraIntrinsics, FrameKind, PixelFormat};

/// A frame buffer owned by the driver's pool
#[derive(Debug, Clone)]
pub struct DriverFrame {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    /// Capture instant in driver ticks
    pub timestamp: u32,
    pub sequence: u32,
    pub data: Vec<u8>,
}

impl DriverFrame {
    pub fn new(width: usize, height: usize, format: PixelFormat, timestamp: u32, sequence: u32) -> Self {
        Self {
            width,
            height,
            format,
            timestamp,
            sequence,
            data: vec![0u8; width * height * format.bytes_per_pixel()],
        }
    }
}

/// One synchronized delivery from the listener, keyed by stream
#[derive(Debug, Default)]
pub struct FrameMap {
    frames: HashMap<FrameKind, DriverFrame>,
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: FrameKind, frame: DriverFrame) {
        self.frames.insert(kind, frame);
    }

    pub fn get(&self, kind: FrameKind) -> Option<&DriverFrame> {
        self.frames.get(&kind)
    }

    pub fn remove(&mut self, kind: FrameKind) -> Option<DriverFrame> {
        self.frames.remove(&kind)
    }

    pub fn contains(&self, kind: FrameKind) -> bool {
        self.frames.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrameKind, &DriverFrame)> {
        self.frames.iter().map(|(kind, frame)| (*kind, frame))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FrameKind, &mut DriverFrame)> {
        self.frames.iter_mut().map(|(kind, frame)| (*kind, frame))
    }
}

pub trait SensorDriver {
    type Device: SensorDevice;

    /// Number of devices currently attached
    fn enumerate_devices(&mut self) -> usize;

    fn default_device_serial(&mut self) -> Option<String>;

    /// `None` when the device exists but could not be opened
    fn open_device(&mut self, serial: &str) -> Option<Self::Device>;
}

pub trait SensorDevice {
    fn serial_number(&self) -> String;

    fn firmware_version(&self) -> String;

    fn intrinsics(&self) -> CameraIntrinsics;

    /// Registers a synchronized listener for the given streams. Must happen
    /// before `start`.
    fn set_frame_listener(&mut self, kinds: &[FrameKind]) -> Result<()>;

    fn start(&mut self) -> bool;

    fn stop(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;

    /// Blocks until a complete frame map is available. `Ok(None)` means the
    /// timeout elapsed first.
    fn wait_for_new_frame(&mut self, timeout: Duration) -> Result<Option<FrameMap>>;

    /// Returns the buffers of a delivered frame map to the pool.
    fn release(&mut self, frames: FrameMap);
}
