//! Streamed materialization of entry content.
//!
//! Entry content is never buffered whole in memory: it is pumped through a
//! fixed 64 KiB buffer that is reused for every entry of an extraction pass.

use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use crate::Result;
use crate::VerifyError;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable heap buffer for streaming entry content to disk.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies everything from `reader` into `writer`, retrying interrupted reads.
pub fn copy_stream<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut total: u64 = 0;

    loop {
        let n = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer.buf[..n])?;
        total = total.saturating_add(n as u64);
    }

    Ok(total)
}

/// Creates (or truncates) `target` and streams `reader` into it.
///
/// Any failure is reported as [`VerifyError::Extraction`] naming `target`.
///
/// # Examples
///
/// ```no_run
/// use nestcheck_core::copy::{CopyBuffer, write_entry};
/// use std::path::Path;
///
/// # fn main() -> Result<(), nestcheck_core::VerifyError> {
/// let mut buffer = CopyBuffer::new();
/// let mut content: &[u8] = b"payload";
/// let written = write_entry(&mut content, Path::new("/tmp/out.bin"), &mut buffer)?;
/// assert_eq!(written, 7);
/// # Ok(())
/// # }
/// ```
pub fn write_entry<R: Read + ?Sized>(
    reader: &mut R,
    target: &Path,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let wrap = |source: io::Error| VerifyError::Extraction {
        path: target.to_path_buf(),
        source,
    };

    let file = File::create(target).map_err(wrap)?;
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, file);
    let written = copy_stream(reader, &mut writer, buffer).map_err(wrap)?;
    writer.flush().map_err(wrap)?;
    Ok(written)
}
