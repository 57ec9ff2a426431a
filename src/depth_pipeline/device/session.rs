use tracing::{debug, info, instrument, warn};

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::common::types::{CameraIntrinsics, FrameKind};
use crate::depth_pipeline::device::driver::{SensorDevice, SensorDriver};

/// Exclusive owner of an opened, listening and started sensor device.
///
/// Teardown runs on drop and through [`DeviceSession::shutdown`]; both are
/// idempotent and safe after a partially failed open.
pub struct DeviceSession<D: SensorDevice> {
    device: Option<D>,
    started: bool,
    serial: String,
    firmware: String,
    intrinsics: CameraIntrinsics,
}

impl<D: SensorDevice> DeviceSession<D> {
    /// Opens `serial` (or the driver's default device), registers a
    /// synchronized listener for `kinds` and starts streaming.
    #[instrument(skip(driver, kinds))]
    pub fn open<Drv>(driver: &mut Drv, serial: Option<&str>, kinds: &[FrameKind]) -> Result<Self>
    where
        Drv: SensorDriver<Device = D>,
    {
        if driver.enumerate_devices() == 0 {
            return Err(PipelineError::DeviceUnavailable);
        }

        let serial = match serial {
            Some(serial) => serial.to_string(),
            None => driver
                .default_device_serial()
                .ok_or(PipelineError::DeviceUnavailable)?,
        };

        let device = driver
            .open_device(&serial)
            .ok_or_else(|| PipelineError::DeviceOpenFailure(serial.clone()))?;

        let intrinsics = device.intrinsics();
        let mut session = Self {
            device: Some(device),
            started: false,
            serial: serial.clone(),
            firmware: String::new(),
            intrinsics,
        };

        session.device_mut()?.set_frame_listener(kinds)?;

        if !session.device_mut()?.start() {
            session.shutdown();
            return Err(PipelineError::DeviceStartFailure(serial));
        }
        session.started = true;

        let (serial, firmware) = {
            let device = session.device()?;
            (device.serial_number(), device.firmware_version())
        };
        session.serial = serial;
        session.firmware = firmware;

        info!(serial = %session.serial, firmware = %session.firmware, "Device started");
        debug!(
            fx = intrinsics.fx,
            fy = intrinsics.fy,
            cx = intrinsics.cx,
            cy = intrinsics.cy,
            "Depth intrinsics"
        );

        Ok(session)
    }

    pub fn serial_number(&self) -> &str {
        &self.serial
    }

    pub fn firmware_version(&self) -> &str {
        &self.firmware
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.intrinsics
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn device(&self) -> Result<&D> {
        self.device
            .as_ref()
            .ok_or_else(|| PipelineError::DeviceError("device session already shut down".to_string()))
    }

    pub fn device_mut(&mut self) -> Result<&mut D> {
        self.device
            .as_mut()
            .ok_or_else(|| PipelineError::DeviceError("device session already shut down".to_string()))
    }

    /// Stops and closes the device. Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        let Some(mut device) = self.device.take() else {
            return;
        };

        if self.started {
            if let Err(e) = device.stop() {
                warn!(serial = %self.serial, "Failed to stop device: {}", e);
            }
            self.started = false;
        }

        if let Err(e) = device.close() {
            warn!(serial = %self.serial, "Failed to close device: {}", e);
        }

        info!(serial = %self.serial, "Device closed");
    }
}

impl<D: SensorDevice> Drop for DeviceSession<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
