//! Progress reporting during recursive verification.

use std::path::Path;

/// Callback trait for progress updates while containers are processed.
///
/// Calls nest: a container started inside another container's verify phase
/// reports its own start/complete pair before the outer container completes.
///
/// # Examples
///
/// ```
/// use nestcheck_core::ProgressCallback;
/// use std::path::Path;
///
/// struct Counter(usize);
///
/// impl ProgressCallback for Counter {
///     fn on_container_start(&mut self, _virtual_path: &str) {}
///
///     fn on_entry_extracted(&mut self, _relative_path: &str, _alias: &Path, _bytes: u64) {
///         self.0 += 1;
///     }
///
///     fn on_entry_verified(&mut self, _virtual_path: &str) {}
///
///     fn on_container_complete(&mut self, _virtual_path: &str) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before a container's entries are extracted.
    fn on_container_start(&mut self, virtual_path: &str);

    /// Called after an entry has been written to its alias path.
    fn on_entry_extracted(&mut self, relative_path: &str, alias: &Path, bytes: u64);

    /// Called after an extracted entry has been verified.
    fn on_entry_verified(&mut self, virtual_path: &str);

    /// Called after a container's extraction root has been released.
    fn on_container_complete(&mut self, virtual_path: &str);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_container_start(&mut self, _virtual_path: &str) {}

    fn on_entry_extracted(&mut self, _relative_path: &str, _alias: &Path, _bytes: u64) {}

    fn on_entry_verified(&mut self, _virtual_path: &str) {}

    fn on_container_complete(&mut self, _virtual_path: &str) {}
}
