use std::io::Write;

use tiff::encoder::{Compression, TiffEncoder, colortype, compression::DeflateLevel};
use tracing::debug;

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::sinks::display::DisplayImage;

/// TIFF compression used for snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate, fast level
    Deflate,
}

impl SnapshotCompression {
    fn to_tiff(self) -> Compression {
        match self {
            SnapshotCompression::None => Compression::Uncompressed,
            SnapshotCompression::Lzw => Compression::Lzw,
            SnapshotCompression::Deflate => Compression::Deflate(DeflateLevel::Fast),
        }
    }
}

pub fn encode_tiff(image: &DisplayImage, output: &mut dyn Write, compression: SnapshotCompression) -> Result<()> {
    let (width, height) = image.dimensions();
    debug!("Encoding TIFF snapshot: {}x{}", width, height);

    // The encoder needs Seek, so encode into memory first
    let mut buffer = Vec::new();
    {
        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(compression.to_tiff());

        let written = match image {
            DisplayImage::Gray(gray) => encoder.write_image::<colortype::Gray8>(width, height, gray.as_raw()),
            DisplayImage::Rgb(rgb) => encoder.write_image::<colortype::RGB8>(width, height, rgb.as_raw()),
        };
        written.map_err(|e| PipelineError::EncodeError(e.to_string()))?;
    }

    output.write_all(&buffer)?;
    Ok(())
}
