//! Hierarchical verification results.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// Detail key under [`DetailCategory::File`] holding an entry's original
/// path inside its container.
pub const DETAIL_FULL_NAME: &str = "FullName";

/// Detail key under [`DetailCategory::Error`] holding a failure reason.
pub const DETAIL_REASON: &str = "Reason";

/// Outcome of verifying one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationStatus {
    /// The file passed verification.
    Pass,
    /// The file failed verification.
    Fail,
    /// The file was not checked.
    #[default]
    Skipped,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.pad("PASS"),
            Self::Fail => f.pad("FAIL"),
            Self::Skipped => f.pad("SKIPPED"),
        }
    }
}

/// Grouping for result details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetailCategory {
    /// Facts about the file itself (location, size).
    File,
    /// Facts produced by a signature or digest check.
    Signature,
    /// Failure reasons.
    Error,
}

impl fmt::Display for DetailCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Signature => write!(f, "signature"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single key/value fact attached to a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    /// Detail category.
    pub category: DetailCategory,
    /// Detail key.
    pub key: String,
    /// Detail value.
    pub value: String,
}

/// Verification outcome for one file, with the results of any files
/// extracted from it.
///
/// # Examples
///
/// ```
/// use nestcheck_core::{DetailCategory, VerificationResult, VerificationStatus};
/// use std::path::Path;
///
/// let mut root = VerificationResult::for_path(Path::new("/pkgs/tool.nupkg"));
/// root.status = VerificationStatus::Pass;
///
/// let mut child = VerificationResult::new("tool.dll", "tool.nupkg/lib/tool.dll", "/tmp/a/b.dll");
/// child.set_failure("no signature");
/// root.add_nested(child);
///
/// assert!(!root.is_success());
/// assert_eq!(root.total_results(), 2);
/// assert_eq!(root.failures().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// File name used for display.
    pub filename: String,
    /// Display name of the container this file was extracted from.
    pub parent: Option<String>,
    /// Position of the file within the logical container hierarchy.
    pub virtual_path: String,
    /// Physical path the verification operated on.
    pub full_path: PathBuf,
    /// Verification outcome.
    pub status: VerificationStatus,
    /// Additional facts recorded during verification.
    pub details: Vec<Detail>,
    /// Results for files extracted from this one, in verification order.
    /// Empty when the container itself failed.
    pub nested_results: Vec<Self>,
}

impl VerificationResult {
    /// Creates a skipped result with no details.
    pub fn new(
        filename: impl Into<String>,
        virtual_path: impl Into<String>,
        full_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            filename: filename.into(),
            parent: None,
            virtual_path: virtual_path.into(),
            full_path: full_path.into(),
            status: VerificationStatus::Skipped,
            details: Vec::new(),
            nested_results: Vec::new(),
        }
    }

    /// Creates a result for a top-level file; its virtual path is its name.
    pub fn for_path(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self::new(filename.clone(), filename, path)
    }

    /// Creates a result for a file extracted from a container.
    ///
    /// The display name is the last segment of `original_relative_path`,
    /// since the physical alias carries a hashed name.
    pub fn for_entry(
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
    ) -> Self {
        let filename = original_relative_path
            .rsplit(['/', '\\'])
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| physical_path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default();

        let mut result = Self::new(filename, virtual_path, physical_path);
        if !parent_name.is_empty() {
            result.parent = Some(parent_name.to_string());
        }
        result
    }

    /// Records a detail.
    pub fn add_detail(
        &mut self,
        category: DetailCategory,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.details.push(Detail {
            category,
            key: key.into(),
            value: value.into(),
        });
    }

    /// Returns the first detail value matching `category` and `key`.
    pub fn detail(&self, category: DetailCategory, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|d| d.category == category && d.key == key)
            .map(|d| d.value.as_str())
    }

    /// Returns the original in-archive path recorded for this result.
    pub fn full_name(&self) -> Option<&str> {
        self.detail(DetailCategory::File, DETAIL_FULL_NAME)
    }

    /// Marks the result failed and records the reason.
    pub fn set_failure(&mut self, reason: impl Into<String>) {
        self.status = VerificationStatus::Fail;
        self.add_detail(DetailCategory::Error, DETAIL_REASON, reason);
    }

    /// Appends a nested result.
    pub fn add_nested(&mut self, child: Self) {
        self.nested_results.push(child);
    }

    /// Returns `true` if neither this result nor any descendant failed.
    pub fn is_success(&self) -> bool {
        self.status != VerificationStatus::Fail
            && self.nested_results.iter().all(Self::is_success)
    }

    /// Counts this result and all descendants.
    pub fn total_results(&self) -> usize {
        1 + self
            .nested_results
            .iter()
            .map(Self::total_results)
            .sum::<usize>()
    }

    /// Collects every failing result in depth-first order.
    pub fn failures(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        self.collect_failures(&mut out);
        out
    }

    fn collect_failures<'a>(&'a self, out: &mut Vec<&'a Self>) {
        if self.status == VerificationStatus::Fail {
            out.push(self);
        }
        for child in &self.nested_results {
            child.collect_failures(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, status: VerificationStatus) -> VerificationResult {
        let mut r = VerificationResult::new(name, format!("root.zip/{name}"), format!("/tmp/{name}"));
        r.status = status;
        r.add_detail(DetailCategory::File, DETAIL_FULL_NAME, name);
        r
    }

    #[test]
    fn test_for_path_uses_file_name() {
        let r = VerificationResult::for_path(Path::new("/drop/setup.zip"));
        assert_eq!(r.filename, "setup.zip");
        assert_eq!(r.virtual_path, "setup.zip");
        assert_eq!(r.full_path, PathBuf::from("/drop/setup.zip"));
        assert_eq!(r.status, VerificationStatus::Skipped);
        assert!(r.parent.is_none());
    }

    #[test]
    fn test_for_entry_uses_original_name() {
        let r = VerificationResult::for_entry(
            Path::new("/scratch/r/abc/def.dll"),
            "pkg.zip",
            "pkg.zip/lib/net8.0/tool.dll",
            "lib/net8.0/tool.dll",
        );
        assert_eq!(r.filename, "tool.dll");
        assert_eq!(r.parent.as_deref(), Some("pkg.zip"));
        assert_eq!(r.full_path, PathBuf::from("/scratch/r/abc/def.dll"));

        let r = VerificationResult::for_entry(Path::new("/s/x.bin"), "", "x", "dir\\");
        assert_eq!(r.filename, "dir");
        assert!(r.parent.is_none());
    }

    #[test]
    fn test_details() {
        let mut r = leaf("a.txt", VerificationStatus::Pass);
        r.add_detail(DetailCategory::Signature, "Digest", "abc");
        assert_eq!(r.full_name(), Some("a.txt"));
        assert_eq!(r.detail(DetailCategory::Signature, "Digest"), Some("abc"));
        assert_eq!(r.detail(DetailCategory::Error, "Digest"), None);
    }

    #[test]
    fn test_set_failure() {
        let mut r = leaf("a.txt", VerificationStatus::Pass);
        r.set_failure("bad digest");
        assert_eq!(r.status, VerificationStatus::Fail);
        assert_eq!(r.detail(DetailCategory::Error, DETAIL_REASON), Some("bad digest"));
    }

    #[test]
    fn test_success_propagates_from_descendants() {
        let mut root = leaf("root.zip", VerificationStatus::Pass);
        let mut inner = leaf("inner.zip", VerificationStatus::Pass);
        inner.add_nested(leaf("x.txt", VerificationStatus::Skipped));
        root.add_nested(inner.clone());
        assert!(root.is_success());

        inner.add_nested(leaf("y.txt", VerificationStatus::Fail));
        root.add_nested(inner);
        assert!(!root.is_success());
        assert_eq!(root.total_results(), 6);
        let failed: Vec<_> = root.failures().iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(failed, vec!["y.txt"]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(VerificationStatus::Pass.to_string(), "PASS");
        assert_eq!(VerificationStatus::Fail.to_string(), "FAIL");
        assert_eq!(DetailCategory::Signature.to_string(), "signature");
    }
}
