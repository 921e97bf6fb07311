//! SMF file writer

use super::header;
use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SMF file writer
pub struct SmfWriter {
    file: File,
}

impl SmfWriter {
    /// Create a new SMF writer
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Write the header chunk (call before any track)
    pub fn write_header(&mut self, track_count: u16) -> Result<()> {
        self.file.write_all(&header::build_header(track_count))?;
        Ok(())
    }

    /// Write one framed track chunk
    pub fn write_track(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk)?;
        Ok(())
    }

    /// Flush pending bytes to disk
    pub fn finalize(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
