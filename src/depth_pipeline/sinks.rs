//! Display and visualization sinks
//!
//! The capture loop shows 2D frames through a [`DisplaySink`] and hands
//! point clouds to a [`PointCloudViewer`]. Window toolkits plug in behind
//! these traits; the crate ships a TIFF snapshot sink and a logging viewer.

mod display;
mod snapshot_sink;
mod terminal_keys;
mod tiff_encoder;
mod tracing_viewer;

#[cfg(test)]
mod tests;

pub use display::{CameraPose, DisplayImage, DisplaySink, Key, PointCloudViewer};
pub use snapshot_sink::SnapshotSink;
pub use terminal_keys::TerminalKeys;
pub use tiff_encoder::{SnapshotCompression, encode_tiff};
pub use tracing_viewer::TracingViewer;
