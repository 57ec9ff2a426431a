//! Depth sensor processing pipeline
//!
//! Acquires synchronized color / infrared / depth frames from a sensor
//! driver, normalizes them, back-projects depth into a point cloud and
//! exports clouds as ASCII PLY.

pub mod acquisition;
pub mod common;
pub mod device;
pub mod export;
pub mod normalize;
pub mod pipelines;
pub mod projection;
pub mod sinks;

pub use common::{CameraIntrinsics, FrameKind, PipelineError, PixelFormat, Point3D, PointCloud, Result};

pub use device::{
    DeviceSession,
    SensorDevice,
    SensorDriver,
    SyntheticDeviceConfig,
    SyntheticDriver,
    SyntheticScene,
};

pub use acquisition::{CancellationToken, FrameAcquirer, FrameSet, RawFrame, SyncedFrames};

pub use normalize::{FrameNormalizer, NormalizedFrame, SampleRange};

pub use projection::PointCloudProjector;

pub use export::{AsciiPlyWriter, PointCloudExporter, PointCloudWriter};

pub use sinks::{CameraPose, DisplayImage, DisplaySink, Key, PointCloudViewer, SnapshotSink, TracingViewer};

pub use pipelines::{
    CaptureLoop,
    ExitReason,
    PipelineConfig,
    PointCloudStage,
    PreviewStage,
    TimeoutPolicy,
};
