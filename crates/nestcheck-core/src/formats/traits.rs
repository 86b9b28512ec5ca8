//! Capability trait implemented by every container format.

use std::io::Read;
use std::path::Path;

use crate::Result;

/// One member of a container, borrowed from its reader.
///
/// The content stream is only valid inside the visitor call that receives the
/// entry; it is consumed at most once and released when the call returns.
pub struct ArchiveEntry<'a> {
    /// Path of the member inside the archive, exactly as stored. Untrusted.
    pub relative_path: String,
    /// Member content.
    pub content: &'a mut dyn Read,
    /// Declared uncompressed size. Informational only.
    pub size: u64,
}

impl std::fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("relative_path", &self.relative_path)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Visitor invoked once per entry, in the reader's natural order.
pub type EntryVisitor<'v> = dyn FnMut(ArchiveEntry<'_>) -> Result<()> + 'v;

/// Trait for format-specific entry readers.
///
/// Readers enumerate regular file members only; directories and links are
/// skipped. An error returned by the visitor stops enumeration and is
/// propagated unchanged.
pub trait EntryReader {
    /// Opens `archive_path` and feeds each entry to `visit`.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::InvalidArchive` if the archive cannot be decoded,
    /// or the first error returned by `visit`.
    fn read_entries(&self, archive_path: &Path, visit: &mut EntryVisitor<'_>) -> Result<()>;

    /// Returns the container format name.
    fn format_name(&self) -> &str;
}
