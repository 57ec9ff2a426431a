use thiserror::Error;

use crate::depth_pipeline::common::types::FrameKind;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No sensor device connected")]
    DeviceUnavailable,

    #[error("Failure opening device: {0}")]
    DeviceOpenFailure(String),

    #[error("Failure starting device: {0}")]
    DeviceStartFailure(String),

    #[error("Device error: {0}")]
    DeviceError(String),

    #[error("Timeout waiting for frames after {0} ms")]
    FrameTimeout(u64),

    #[error("Frame set is missing the {0:?} frame")]
    MissingFrame(FrameKind),

    #[error("Frame set is not synchronized: {0}")]
    InconsistentFrameSet(String),

    #[error("Previous frame set was never released")]
    UnreleasedFrameSet,

    #[error("Invalid frame dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to export point cloud: {0}")]
    ExportError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Device-level failures end the acquisition loop. Everything else is
    /// reported and the loop carries on; timeouts are decided by the
    /// configured policy before they ever get here.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::DeviceUnavailable
                | PipelineError::DeviceOpenFailure(_)
                | PipelineError::DeviceStartFailure(_)
                | PipelineError::DeviceError(_)
                | PipelineError::FrameTimeout(_)
                | PipelineError::UnreleasedFrameSet
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
