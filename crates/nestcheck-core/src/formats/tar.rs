//! Tar entry reader, optionally gzip-compressed.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::Result;
use crate::VerifyError;

use super::traits::ArchiveEntry;
use super::traits::EntryReader;
use super::traits::EntryVisitor;

/// Compression wrapped around the tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarCompression {
    /// Plain tar.
    None,
    /// Gzip-compressed tar.
    Gzip,
}

/// Tar entry reader.
#[derive(Debug, Clone, Copy)]
pub struct TarReader {
    compression: TarCompression,
}

impl TarReader {
    /// Creates a reader for the given compression.
    #[must_use]
    pub fn new(compression: TarCompression) -> Self {
        Self { compression }
    }

    fn open(&self, archive_path: &Path) -> Result<Box<dyn Read>> {
        let reader = BufReader::new(File::open(archive_path)?);
        Ok(match self.compression {
            TarCompression::None => Box::new(reader),
            TarCompression::Gzip => Box::new(GzDecoder::new(reader)),
        })
    }
}

impl EntryReader for TarReader {
    fn read_entries(&self, archive_path: &Path, visit: &mut EntryVisitor<'_>) -> Result<()> {
        let mut archive = tar::Archive::new(self.open(archive_path)?);

        let entries = archive
            .entries()
            .map_err(|e| VerifyError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

        for entry_result in entries {
            let mut entry = entry_result.map_err(|e| {
                VerifyError::InvalidArchive(format!("failed to read TAR entry: {e}"))
            })?;

            if !entry.header().entry_type().is_file() {
                continue;
            }

            let relative_path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let size = entry.size();

            visit(ArchiveEntry {
                relative_path,
                content: &mut entry,
                size,
            })?;
        }

        Ok(())
    }

    fn format_name(&self) -> &str {
        match self.compression {
            TarCompression::None => "tar",
            TarCompression::Gzip => "tar.gz",
        }
    }
}
