use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::depth_pipeline::acquisition::{CancellationToken, FrameAcquirer, RawFrame};
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::{CameraIntrinsics, FrameKind, PixelFormat};
use crate::depth_pipeline::device::{
    DeviceSession, DriverFrame, FrameMap, SensorDevice, SensorDriver, SyntheticDeviceConfig, SyntheticDriver,
    SyntheticScene,
};

/// Device that hands out prepared frame maps in order
struct ScriptedDevice {
    script: VecDeque<FrameMap>,
    released: usize,
}

impl SensorDevice for ScriptedDevice {
    fn serial_number(&self) -> String {
        "scripted".to_string()
    }

    fn firmware_version(&self) -> String {
        "0".to_string()
    }

    fn intrinsics(&self) -> CameraIntrinsics {
        CameraIntrinsics::new(1.0, 1.0, 0.0, 0.0)
    }

    fn set_frame_listener(&mut self, _kinds: &[FrameKind]) -> Result<()> {
        Ok(())
    }

    fn start(&mut self) -> bool {
        true
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn wait_for_new_frame(&mut self, _timeout: Duration) -> Result<Option<FrameMap>> {
        Ok(self.script.pop_front())
    }

    fn release(&mut self, _frames: FrameMap) {
        self.released += 1;
    }
}

struct ScriptedDriver {
    device: Option<ScriptedDevice>,
}

impl SensorDriver for ScriptedDriver {
    type Device = ScriptedDevice;

    fn enumerate_devices(&mut self) -> usize {
        1
    }

    fn default_device_serial(&mut self) -> Option<String> {
        Some("scripted".to_string())
    }

    fn open_device(&mut self, _serial: &str) -> Option<ScriptedDevice> {
        self.device.take()
    }
}

fn frame_map(stamps: &[(FrameKind, u32)]) -> FrameMap {
    let mut map = FrameMap::new();
    for &(kind, timestamp) in stamps {
        map.insert(kind, DriverFrame::new(2, 2, PixelFormat::Float32, timestamp, 1));
    }
    map
}

fn scripted_acquirer(script: Vec<FrameMap>, kinds: &[FrameKind]) -> FrameAcquirer<ScriptedDevice> {
    let mut driver = ScriptedDriver {
        device: Some(ScriptedDevice {
            script: script.into(),
            released: 0,
        }),
    };
    let session = DeviceSession::open(&mut driver, None, kinds).unwrap();
    FrameAcquirer::new(session, kinds)
}

fn synthetic_acquirer() -> FrameAcquirer<crate::depth_pipeline::device::SyntheticDevice> {
    let config = SyntheticDeviceConfig::default()
        .with_depth_size(4, 4)
        .with_color_size(4, 4)
        .with_frame_interval(Duration::ZERO)
        .with_scene(SyntheticScene::ConstantDepth(1000.0));
    let mut driver = SyntheticDriver::single(config);
    let session = DeviceSession::open(&mut driver, None, &FrameKind::ALL).unwrap();
    FrameAcquirer::new(session, &FrameKind::ALL)
}

#[test]
fn test_every_acquire_is_released_once() {
    let mut acquirer = synthetic_acquirer();

    for _ in 0..3 {
        let set = acquirer.acquire(Duration::from_millis(50)).unwrap();
        let depth = set.frame(FrameKind::Depth).unwrap();
        assert_eq!(depth.pixel_count(), 16);
        set.release();
    }

    let stats = acquirer.stats();
    assert_eq!(stats.acquired, 3);
    assert_eq!(stats.released, 3);
    assert_eq!(acquirer.outstanding(), 0);
}

#[test]
fn test_scope_exit_releases_frame_set() {
    let mut acquirer = synthetic_acquirer();
    {
        let set = acquirer.acquire(Duration::from_millis(50)).unwrap();
        assert!(set.sequence().is_some());
    }
    assert_eq!(acquirer.outstanding(), 0);
    assert!(acquirer.acquire(Duration::from_millis(50)).is_ok());
}

#[test]
fn test_leaked_frame_set_is_detected_without_waiting() {
    let mut acquirer = synthetic_acquirer();
    let timeout = Duration::from_millis(500);

    let set = acquirer.acquire(timeout).unwrap();
    std::mem::forget(set);
    assert_eq!(acquirer.outstanding(), 1);

    let started = Instant::now();
    let result = acquirer.acquire(timeout);
    assert!(matches!(result, Err(PipelineError::UnreleasedFrameSet)));
    assert!(started.elapsed() < timeout);
}

#[test]
fn test_timeout_is_reported() {
    let config = SyntheticDeviceConfig {
        stall: true,
        ..SyntheticDeviceConfig::default().with_depth_size(2, 2).with_color_size(2, 2)
    };
    let mut driver = SyntheticDriver::single(config);
    let session = DeviceSession::open(&mut driver, None, &FrameKind::ALL).unwrap();
    let mut acquirer = FrameAcquirer::new(session, &FrameKind::ALL);

    let result = acquirer.acquire(Duration::from_millis(10)).map(|_| ());

    assert!(matches!(result, Err(PipelineError::FrameTimeout(10))));
    assert_eq!(acquirer.stats().timeouts, 1);
    assert_eq!(acquirer.outstanding(), 0);
}

#[test]
fn test_missing_frame_is_rejected_and_released() {
    let kinds = [FrameKind::Depth, FrameKind::Infrared];
    let mut acquirer = scripted_acquirer(vec![frame_map(&[(FrameKind::Depth, 7)])], &kinds);

    let result = acquirer.acquire(Duration::from_millis(10)).map(|_| ());

    assert!(matches!(result, Err(PipelineError::MissingFrame(FrameKind::Infrared))));
    assert_eq!(acquirer.outstanding(), 0);
    assert_eq!(acquirer.session().device().unwrap().released, 1);
}

#[test]
fn test_mismatched_timestamps_are_rejected() {
    let kinds = [FrameKind::Depth, FrameKind::Infrared];
    let map = frame_map(&[(FrameKind::Depth, 7), (FrameKind::Infrared, 9)]);
    let mut acquirer = scripted_acquirer(vec![map], &kinds);

    let result = acquirer.acquire(Duration::from_millis(10)).map(|_| ());

    assert!(matches!(result, Err(PipelineError::InconsistentFrameSet(_))));
    assert_eq!(acquirer.stats().released, 1);
}

#[test]
fn test_synced_frames_expose_each_kind() {
    let mut acquirer = synthetic_acquirer();
    let set = acquirer.acquire(Duration::from_millis(50)).unwrap();
    let frames = set.frames().unwrap();

    assert_eq!(frames.get(FrameKind::Color).unwrap().format, PixelFormat::Bgrx8);
    assert_eq!(frames.get(FrameKind::Infrared).unwrap().format, PixelFormat::Float32);
    let depth: Vec<f32> = frames.get(FrameKind::Depth).unwrap().float_samples().unwrap().collect();
    assert!(depth.iter().all(|&d| d == 1000.0));
    assert_eq!(frames.timestamp(), set.timestamp());
}

#[test]
fn test_raw_frame_rejects_short_buffer() {
    let data = vec![0u8; 15];
    let result = RawFrame::new(FrameKind::Depth, 2, 2, PixelFormat::Float32, &data);
    assert!(matches!(
        result,
        Err(PipelineError::BufferSize {
            expected: 16,
            actual: 15
        })
    ));
}

#[test]
fn test_raw_frame_rejects_empty_dimensions() {
    let result = RawFrame::new(FrameKind::Depth, 0, 4, PixelFormat::Float32, &[]);
    assert!(matches!(result, Err(PipelineError::InvalidDimensions(0, 4))));
}

#[test]
fn test_float_samples_need_float_format() {
    let data = vec![0u8; 16];
    let frame = RawFrame::new(FrameKind::Color, 2, 2, PixelFormat::Bgrx8, &data).unwrap();
    assert!(matches!(frame.float_samples(), Err(PipelineError::UnsupportedFormat(_))));
}

#[test]
fn test_cancellation_is_shared_between_clones() {
    let token = CancellationToken::new();
    let observer = token.clone();
    assert!(!observer.is_cancelled());
    token.cancel();
    assert!(observer.is_cancelled());
}
