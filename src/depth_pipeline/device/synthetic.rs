//! In-process sensor driver.
//!
//! Produces Kinect-v2-shaped frame maps (BGRX color, float infrared and
//! depth) from a simple scene description. The buffer pool holds a single
//! frame map, so a consumer that never releases starves every later wait
//! exactly like the hardware listener does.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::{CameraIntrinsics, FrameKind, PixelFormat};
use crate::depth_pipeline::device::driver::{DriverFrame, FrameMap, SensorDevice, SensorDriver};
use crate::depth_pipeline::normalize::INFRARED_FULL_SCALE;

/// Frame maps the driver can have outstanding at once.
const POOL_SIZE: usize = 1;

/// Driver ticks per second (0.1 ms resolution).
const TICKS_PER_SECOND: u128 = 10_000;

/// Distance at which the synthetic infrared return fades to zero.
const INFRARED_FALLOFF_MM: f32 = 4500.0;

/// What the synthetic depth camera sees
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticScene {
    /// Every depth pixel at the same native depth
    ConstantDepth(f32),
    /// Depth grows left to right from `near` to `far`
    Ramp { near: f32, far: f32 },
}

impl SyntheticScene {
    fn depth_at(&self, x: usize, width: usize) -> f32 {
        match *self {
            SyntheticScene::ConstantDepth(depth) => depth,
            SyntheticScene::Ramp { near, far } => {
                let t = if width > 1 {
                    x as f32 / (width - 1) as f32
                } else {
                    0.0
                };
                near + (far - near) * t
            }
        }
    }
}

/// Calls made against a synthetic device, shared with whoever built it.
#[derive(Debug, Default)]
pub struct DeviceActivity {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub closes: AtomicUsize,
    pub delivered: AtomicUsize,
    pub released: AtomicUsize,
}

impl DeviceActivity {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticDeviceConfig {
    pub serial: String,
    pub firmware: String,
    pub intrinsics: CameraIntrinsics,
    pub depth_width: usize,
    pub depth_height: usize,
    pub color_width: usize,
    pub color_height: usize,
    pub color_format: PixelFormat,
    /// Time between frames; zero delivers immediately
    pub frame_interval: Duration,
    pub scene: SyntheticScene,
    /// `open_device` returns `None`
    pub fail_open: bool,
    /// `start` returns `false`
    pub fail_start: bool,
    /// Never delivers a frame, every wait times out
    pub stall: bool,
    pub activity: Arc<DeviceActivity>,
}

impl Default for SyntheticDeviceConfig {
    fn default() -> Self {
        Self {
            serial: "000000000001".to_string(),
            firmware: "synthetic-1.0".to_string(),
            // Typical factory values of a Kinect v2 IR camera
            intrinsics: CameraIntrinsics::new(365.456, 365.456, 254.878, 205.395),
            depth_width: 512,
            depth_height: 424,
            color_width: 1920,
            color_height: 1080,
            color_format: PixelFormat::Bgrx8,
            frame_interval: Duration::from_millis(33),
            scene: SyntheticScene::Ramp {
                near: 500.0,
                far: 4500.0,
            },
            fail_open: false,
            fail_start: false,
            stall: false,
            activity: Arc::new(DeviceActivity::default()),
        }
    }
}

impl SyntheticDeviceConfig {
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = serial.into();
        self
    }

    pub fn with_depth_size(mut self, width: usize, height: usize) -> Self {
        self.depth_width = width;
        self.depth_height = height;
        self
    }

    pub fn with_color_size(mut self, width: usize, height: usize) -> Self {
        self.color_width = width;
        self.color_height = height;
        self
    }

    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = intrinsics;
        self
    }

    pub fn with_scene(mut self, scene: SyntheticScene) -> Self {
        self.scene = scene;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }
}

/// Driver over a fixed list of synthetic devices
#[derive(Debug, Default)]
pub struct SyntheticDriver {
    devices: Vec<SyntheticDeviceConfig>,
}

impl SyntheticDriver {
    pub fn new(devices: Vec<SyntheticDeviceConfig>) -> Self {
        Self { devices }
    }

    pub fn single(config: SyntheticDeviceConfig) -> Self {
        Self::new(vec![config])
    }
}

impl SensorDriver for SyntheticDriver {
    type Device = SyntheticDevice;

    fn enumerate_devices(&mut self) -> usize {
        self.devices.len()
    }

    fn default_device_serial(&mut self) -> Option<String> {
        self.devices.first().map(|config| config.serial.clone())
    }

    fn open_device(&mut self, serial: &str) -> Option<SyntheticDevice> {
        let config = self.devices.iter().find(|config| config.serial == serial)?;
        if config.fail_open {
            debug!(serial, "Synthetic device refuses to open");
            return None;
        }
        Some(SyntheticDevice::new(config.clone()))
    }
}

pub struct SyntheticDevice {
    config: SyntheticDeviceConfig,
    listener: Option<Vec<FrameKind>>,
    running: bool,
    free_sets: usize,
    recycled: Option<FrameMap>,
    sequence: u32,
    epoch: Instant,
}

impl SyntheticDevice {
    pub fn new(config: SyntheticDeviceConfig) -> Self {
        Self {
            config,
            listener: None,
            running: false,
            free_sets: POOL_SIZE,
            recycled: None,
            sequence: 0,
            epoch: Instant::now(),
        }
    }

    pub fn activity(&self) -> Arc<DeviceActivity> {
        Arc::clone(&self.config.activity)
    }

    fn take_buffer(&mut self, kind: FrameKind, width: usize, height: usize, format: PixelFormat) -> DriverFrame {
        let timestamp = (self.epoch.elapsed().as_micros() * TICKS_PER_SECOND / 1_000_000) as u32;
        let reusable = self
            .recycled
            .as_mut()
            .and_then(|map| map.remove(kind))
            .filter(|frame| frame.width == width && frame.height == height && frame.format == format);

        match reusable {
            Some(mut frame) => {
                frame.timestamp = timestamp;
                frame.sequence = self.sequence;
                frame
            }
            None => DriverFrame::new(width, height, format, timestamp, self.sequence),
        }
    }

    fn render(&mut self, kinds: &[FrameKind]) -> FrameMap {
        let mut map = FrameMap::new();
        let (depth_width, depth_height) = (self.config.depth_width, self.config.depth_height);
        let scene = self.config.scene;

        for &kind in kinds {
            let frame = match kind {
                FrameKind::Depth => {
                    let mut frame = self.take_buffer(kind, depth_width, depth_height, PixelFormat::Float32);
                    fill_float(&mut frame, |x, _| scene.depth_at(x, depth_width));
                    frame
                }
                FrameKind::Infrared => {
                    let mut frame = self.take_buffer(kind, depth_width, depth_height, PixelFormat::Float32);
                    fill_float(&mut frame, |x, _| {
                        let falloff = 1.0 - scene.depth_at(x, depth_width) / INFRARED_FALLOFF_MM;
                        INFRARED_FULL_SCALE * falloff.clamp(0.0, 1.0)
                    });
                    frame
                }
                FrameKind::Color => {
                    let (width, height, format) = (
                        self.config.color_width,
                        self.config.color_height,
                        self.config.color_format,
                    );
                    let mut frame = self.take_buffer(kind, width, height, format);
                    fill_color(&mut frame, self.sequence);
                    frame
                }
            };
            map.insert(kind, frame);
        }

        // Hardware stamps a synchronized set with one capture instant
        let timestamp = map.iter().map(|(_, frame)| frame.timestamp).min().unwrap_or(0);
        for (_, frame) in map.iter_mut() {
            frame.timestamp = timestamp;
        }
        map
    }
}

fn fill_float(frame: &mut DriverFrame, value: impl Fn(usize, usize) -> f32) {
    let width = frame.width;
    for (i, chunk) in frame.data.chunks_exact_mut(4).enumerate() {
        chunk.copy_from_slice(&value(i % width, i / width).to_ne_bytes());
    }
}

fn fill_color(frame: &mut DriverFrame, sequence: u32) {
    let (width, height) = (frame.width.max(1), frame.height.max(1));
    let swap = frame.format == PixelFormat::Rgbx8;
    for (i, pixel) in frame.data.chunks_exact_mut(4).enumerate() {
        let (x, y) = (i % width, i / width);
        let blue = (x * 255 / width) as u8;
        let green = (y * 255 / height) as u8;
        let red = (sequence % 256) as u8;
        if swap {
            pixel.copy_from_slice(&[red, green, blue, 0xff]);
        } else {
            pixel.copy_from_slice(&[blue, green, red, 0xff]);
        }
    }
}

impl SensorDevice for SyntheticDevice {
    fn serial_number(&self) -> String {
        self.config.serial.clone()
    }

    fn firmware_version(&self) -> String {
        self.config.firmware.clone()
    }

    fn intrinsics(&self) -> CameraIntrinsics {
        self.config.intrinsics
    }

    fn set_frame_listener(&mut self, kinds: &[FrameKind]) -> Result<()> {
        if kinds.is_empty() {
            return Err(PipelineError::DeviceError("listener needs at least one frame kind".to_string()));
        }
        self.listener = Some(kinds.to_vec());
        Ok(())
    }

    fn start(&mut self) -> bool {
        self.config.activity.starts.fetch_add(1, Ordering::SeqCst);
        if self.config.fail_start || self.listener.is_none() {
            return false;
        }
        self.running = true;
        self.epoch = Instant::now();
        true
    }

    fn stop(&mut self) -> Result<()> {
        self.config.activity.stops.fetch_add(1, Ordering::SeqCst);
        self.running = false;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.config.activity.closes.fetch_add(1, Ordering::SeqCst);
        self.running = false;
        self.listener = None;
        Ok(())
    }

    fn wait_for_new_frame(&mut self, timeout: Duration) -> Result<Option<FrameMap>> {
        let kinds = self
            .listener
            .clone()
            .ok_or_else(|| PipelineError::DeviceError("no frame listener registered".to_string()))?;
        if !self.running {
            return Err(PipelineError::DeviceError("device is not streaming".to_string()));
        }

        if self.config.stall || self.free_sets == 0 {
            trace!(free_sets = self.free_sets, "No frame map available, waiting out the timeout");
            thread::sleep(timeout);
            return Ok(None);
        }

        if !self.config.frame_interval.is_zero() {
            if self.config.frame_interval > timeout {
                thread::sleep(timeout);
                return Ok(None);
            }
            thread::sleep(self.config.frame_interval);
        }

        self.free_sets -= 1;
        self.sequence = self.sequence.wrapping_add(1);
        let map = self.render(&kinds);
        self.config.activity.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(Some(map))
    }

    fn release(&mut self, frames: FrameMap) {
        self.config.activity.released.fetch_add(1, Ordering::SeqCst);
        self.free_sets = (self.free_sets + 1).min(POOL_SIZE);
        self.recycled = Some(frames);
    }
}
