//! Display sink that writes the shown windows to disk.
//!
//! Each window keeps one file, `<dir>/<window-name>.tiff`, overwritten every
//! `every` frames. Frames are counted by `wait_key`, which the capture loop
//! calls once per iteration.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, instrument};

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::sinks::display::{DisplayImage, DisplaySink, Key};
use crate::depth_pipeline::sinks::terminal_keys::TerminalKeys;
use crate::depth_pipeline::sinks::tiff_encoder::{SnapshotCompression, encode_tiff};

pub struct SnapshotSink {
    dir: PathBuf,
    every: u64,
    compression: SnapshotCompression,
    frame: u64,
    keys: TerminalKeys,
}

impl SnapshotSink {
    pub fn new(dir: impl Into<PathBuf>, every: u64, compression: SnapshotCompression) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self {
            dir,
            every: every.max(1),
            compression,
            frame: 0,
            keys: TerminalKeys::new(),
        })
    }

    pub fn with_keys(mut self, keys: TerminalKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<window name, lowercased, spaces as dashes>.tiff`
    pub fn path_for(&self, window: &str) -> PathBuf {
        let name: String = window
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        self.dir.join(format!("{}.tiff", name))
    }
}

impl DisplaySink for SnapshotSink {
    #[instrument(skip(self, image), fields(frame = self.frame))]
    fn show(&mut self, window: &str, image: &DisplayImage) -> Result<()> {
        if self.frame % self.every != 0 {
            return Ok(());
        }

        let path = self.path_for(window);
        let file = File::create(&path)
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        let mut output = BufWriter::new(file);
        encode_tiff(image, &mut output, self.compression)?;
        output.flush()?;

        debug!(path = %path.display(), "Snapshot written");
        Ok(())
    }

    fn wait_key(&mut self, delay_ms: u64) -> Result<Option<Key>> {
        self.frame += 1;
        Ok(self.keys.poll(Duration::from_millis(delay_ms)))
    }
}
