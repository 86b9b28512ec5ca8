//! Container format detection.

use super::tar::TarCompression;
use super::tar::TarReader;
use super::traits::EntryReader;
use super::zip::ZipReader;

/// Extensions (without dot) of formats that use the ZIP container.
pub const ZIP_EXTENSIONS: &[&str] = &[
    "zip", "nupkg", "snupkg", "vsix", "jar", "war", "whl", "appx", "msix", "crx", "xap",
];

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// ZIP and ZIP-based packages.
    Zip,
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
}

/// Detects the container format from a file name or entry path.
///
/// Detection is by extension and case-insensitive. Returns `None` for files
/// that are not containers.
///
/// # Examples
///
/// ```
/// use nestcheck_core::formats::{ContainerFormat, detect_container};
///
/// assert_eq!(detect_container("pkg/Tool.1.0.NUPKG"), Some(ContainerFormat::Zip));
/// assert_eq!(detect_container("dist/app.tar.gz"), Some(ContainerFormat::TarGz));
/// assert_eq!(detect_container("bin/app.dll"), None);
/// ```
pub fn detect_container(name: &str) -> Option<ContainerFormat> {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let lower = file_name.to_ascii_lowercase();

    if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        return Some(ContainerFormat::TarGz);
    }
    if lower.ends_with(".tar") {
        return Some(ContainerFormat::Tar);
    }

    let (_, extension) = lower.rsplit_once('.')?;
    ZIP_EXTENSIONS
        .contains(&extension)
        .then_some(ContainerFormat::Zip)
}

/// Returns the entry reader for a container format.
pub fn reader_for(format: ContainerFormat) -> Box<dyn EntryReader> {
    match format {
        ContainerFormat::Zip => Box::new(ZipReader::new()),
        ContainerFormat::Tar => Box::new(TarReader::new(TarCompression::None)),
        ContainerFormat::TarGz => Box::new(TarReader::new(TarCompression::Gzip)),
    }
}
