//! Sensor device module
//!
//! Capability traits a sensor driver implements, the RAII session that owns
//! an opened device, and the bundled synthetic driver.

mod driver;
mod session;
mod synthetic;


pub use driver::{DriverFrame, FrameMap, SensorDevice, SensorDriver};
pub use session::DeviceSession;
pub use synthetic::{DeviceActivity, SyntheticDevice, SyntheticDeviceConfig, SyntheticDriver, SyntheticScene};
