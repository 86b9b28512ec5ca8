//! ZIP-family entry reader.
//!
//! Handles plain `.zip` files and the package formats built on top of the
//! ZIP container (NuGet packages, VSIX extensions, Java archives, wheels,
//! app packages).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::Result;
use crate::VerifyError;

use super::traits::ArchiveEntry;
use super::traits::EntryReader;
use super::traits::EntryVisitor;

/// ZIP entry reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipReader;

impl ZipReader {
    /// Creates a new ZIP entry reader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EntryReader for ZipReader {
    fn read_entries(&self, archive_path: &Path, visit: &mut EntryVisitor<'_>) -> Result<()> {
        let file = File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| {
            VerifyError::InvalidArchive(format!("failed to open ZIP archive: {e}"))
        })?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| {
                VerifyError::InvalidArchive(format!("failed to read ZIP entry {i}: {e}"))
            })?;

            if entry.is_dir() {
                continue;
            }

            // Raw stored name: aliasing neutralizes whatever it contains.
            let relative_path = entry.name().to_string();
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
        "zip"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_zip;
    use crate::test_utils::create_test_zip_with_dirs;
    use std::io::Read;
    use tempfile::TempDir;

    fn collect(path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
        let mut out = Vec::new();
        ZipReader::new().read_entries(path, &mut |entry| {
            let mut data = Vec::new();
            entry.content.read_to_end(&mut data)?;
            out.push((entry.relative_path, data));
            Ok(())
        })?;
        Ok(out)
    }

    #[test]
    fn test_reads_files_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.zip");
        std::fs::write(
            &path,
            create_test_zip(vec![("readme.txt", b"hi"), ("lib/net/a.dll", b"MZ")]),
        )
        .unwrap();

        let entries = collect(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                ("readme.txt".to_string(), b"hi".to_vec()),
                ("lib/net/a.dll".to_string(), b"MZ".to_vec())
            ]
        );
    }

    #[test]
    fn test_skips_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.zip");
        std::fs::write(
            &path,
            create_test_zip_with_dirs(&["docs/"], vec![("docs/x.txt", b"x")]),
        )
        .unwrap();

        let names: Vec<_> = collect(&path).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["docs/x.txt"]);
    }

    #[test]
    fn test_traversal_names_passed_through() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("evil.zip");
        std::fs::write(&path, create_test_zip(vec![("../../escape.txt", b"x")])).unwrap();

        let names: Vec<_> = collect(&path).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["../../escape.txt"]);
    }

    #[test]
    fn test_corrupt_archive_is_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.zip");
        std::fs::write(&path, b"definitely not a zip file").unwrap();

        assert!(matches!(collect(&path), Err(VerifyError::InvalidArchive(_))));
    }

    #[test]
    fn test_missing_archive_is_io_error() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            collect(&temp.path().join("missing.zip")),
            Err(VerifyError::Io(_))
        ));
    }
}
