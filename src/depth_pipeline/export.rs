//! Point cloud export module
//!
//! Serializes point clouds to portable ASCII PLY files.

mod ascii_ply_writer;
mod exporter;
mod writer;


pub use ascii_ply_writer::{AsciiPlyWriter, PLY_HEADER_LINES};
pub use exporter::{PointCloudExporter, timestamped_file_name};
pub use writer::PointCloudWriter;
