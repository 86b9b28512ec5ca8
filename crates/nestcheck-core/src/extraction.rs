//! Materializes container entries at their alias paths.
//!
//! Extraction runs to completion before any entry is verified: formats with
//! cross-file references (an installer and its external cabinets) can only
//! be validated once every sibling payload is on disk.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::Result;
use crate::VerifyError;
use crate::alias::AliasGenerator;
use crate::cancel::CancellationToken;
use crate::copy::CopyBuffer;
use crate::copy::write_entry;
use crate::formats::EntryReader;

/// Mapping from an entry's in-archive path to the alias it was written to.
///
/// Owned by a single container pass and handed by value to the verify phase.
/// Iteration is ordered by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionMap {
    entries: BTreeMap<String, PathBuf>,
}

impl ExtractionMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry. Returns `false` if the relative path was already
    /// present, in which case the existing alias is kept.
    pub fn insert(&mut self, relative_path: String, alias: PathBuf) -> bool {
        match self.entries.entry(relative_path) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(alias);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Returns the alias recorded for `relative_path`.
    pub fn get(&self, relative_path: &str) -> Option<&Path> {
        self.entries.get(relative_path).map(PathBuf::as_path)
    }

    /// Returns the number of materialized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was materialized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(relative_path, alias)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

impl IntoIterator for ExtractionMap {
    type Item = (String, PathBuf);
    type IntoIter = btree_map::IntoIter<String, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Drives an entry reader and writes each entry to its alias exactly once.
#[derive(Debug)]
pub struct ExtractionCoordinator<'a> {
    aliases: &'a AliasGenerator,
    cancel: &'a CancellationToken,
}

impl<'a> ExtractionCoordinator<'a> {
    /// Creates a coordinator.
    pub fn new(aliases: &'a AliasGenerator, cancel: &'a CancellationToken) -> Self {
        Self { aliases, cancel }
    }

    /// Extracts every entry of `archive_path` under `root`.
    ///
    /// Entries whose alias already exists on disk are skipped and left out
    /// of the returned map. `on_extracted` is called after each write with
    /// the relative path, the alias and the number of bytes written.
    ///
    /// # Errors
    ///
    /// Reader errors, filesystem errors and cancellation abort extraction.
    /// Whatever was written so far stays under `root` for the caller to
    /// clean up.
    pub fn extract(
        &self,
        reader: &dyn EntryReader,
        archive_path: &Path,
        root: &Path,
        on_extracted: &mut dyn FnMut(&str, &Path, u64),
    ) -> Result<ExtractionMap> {
        fs::create_dir_all(root).map_err(|source| VerifyError::Extraction {
            path: root.to_path_buf(),
            source,
        })?;

        let mut map = ExtractionMap::new();
        let mut buffer = CopyBuffer::new();

        reader.read_entries(archive_path, &mut |entry| {
            self.cancel.check()?;

            let alias = self.aliases.alias(&entry.relative_path, root);
            if alias.exists() {
                info!(
                    alias = %alias.display(),
                    entry = %entry.relative_path,
                    "file already exists, skipping"
                );
                return Ok(());
            }

            if let Some(parent) = alias.parent() {
                fs::create_dir_all(parent).map_err(|source| VerifyError::Extraction {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            let written = write_entry(entry.content, &alias, &mut buffer)?;
            debug!(
                entry = %entry.relative_path,
                alias = %alias.display(),
                bytes = written,
                "materialized entry"
            );
            on_extracted(&entry.relative_path, &alias, written);
            map.insert(entry.relative_path, alias);
            Ok(())
        })?;

        Ok(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::formats::ArchiveEntry;
    use crate::formats::traits::EntryVisitor;
    use crate::hash::HashAlgorithm;
    use crate::hash::digest_str;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct MemoryReader(Vec<(&'static str, &'static [u8])>);

    impl EntryReader for MemoryReader {
        fn read_entries(&self, _archive_path: &Path, visit: &mut EntryVisitor<'_>) -> Result<()> {
            for (name, data) in &self.0 {
                let mut content = Cursor::new(*data);
                visit(ArchiveEntry {
                    relative_path: (*name).to_string(),
                    content: &mut content,
                    size: data.len() as u64,
                })?;
            }
            Ok(())
        }

        fn format_name(&self) -> &str {
            "memory"
        }
    }

    fn aliases() -> AliasGenerator {
        AliasGenerator::new(vec![".cab".into()], HashAlgorithm::Sha256)
    }

    fn run(reader: &MemoryReader, root: &Path) -> Result<ExtractionMap> {
        let aliases = aliases();
        let cancel = CancellationToken::new();
        ExtractionCoordinator::new(&aliases, &cancel).extract(
            reader,
            Path::new("memory"),
            root,
            &mut |_, _, _| {},
        )
    }

    #[test]
    fn test_extracts_to_aliases() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let reader = MemoryReader(vec![("payload.cab", b"CAB"), ("docs/readme.txt", b"hello")]);

        let map = run(&reader, &root).unwrap();
        assert_eq!(map.len(), 2);

        let cab = map.get("payload.cab").unwrap();
        assert_eq!(cab.file_name().unwrap(), "payload.cab");
        assert_eq!(fs::read(cab).unwrap(), b"CAB");

        let readme = map.get("docs/readme.txt").unwrap();
        assert_eq!(
            readme,
            root.join(digest_str("docs", HashAlgorithm::Sha256))
                .join(format!("{}.txt", digest_str("docs/readme.txt", HashAlgorithm::Sha256)))
        );
        assert_eq!(fs::read(readme).unwrap(), b"hello");
    }

    #[test]
    fn test_existing_alias_is_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let reader = MemoryReader(vec![("a.txt", b"new")]);

        let alias = aliases().alias("a.txt", &root);
        fs::create_dir_all(alias.parent().unwrap()).unwrap();
        fs::write(&alias, b"old").unwrap();

        let map = run(&reader, &root).unwrap();
        assert!(map.is_empty());
        assert_eq!(fs::read(&alias).unwrap(), b"old");
    }

    #[test]
    fn test_exempt_collision_first_writer_wins() {
        let temp = TempDir::new().unwrap();
        let reader = MemoryReader(vec![("media/d1.cab", b"first"), ("media\\d1.cab", b"second")]);

        let map = run(&reader, temp.path()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(fs::read(map.get("media/d1.cab").unwrap()).unwrap(), b"first");
        assert!(map.get("media\\d1.cab").is_none());
    }

    #[test]
    fn test_duplicate_entry_names_written_once() {
        let temp = TempDir::new().unwrap();
        let reader = MemoryReader(vec![("dup.txt", b"1"), ("dup.txt", b"2")]);

        let map = run(&reader, temp.path()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(fs::read(map.get("dup.txt").unwrap()).unwrap(), b"1");
    }

    #[test]
    fn test_traversal_entries_stay_under_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let reader = MemoryReader(vec![("../../escape.txt", b"x"), ("/abs/evil.cab", b"y")]);

        let map = run(&reader, &root).unwrap();
        for (_, alias) in map.iter() {
            assert!(alias.starts_with(&root));
            assert!(alias.exists());
        }
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[test]
    fn test_same_input_same_map() {
        let temp = TempDir::new().unwrap();
        let reader = MemoryReader(vec![("a/b.dll", b"1"), ("c.cab", b"2"), ("d", b"3")]);

        let first = run(&reader, &temp.path().join("one")).unwrap();
        let second = run(&reader, &temp.path().join("one-again")).unwrap();
        let strip = |m: &ExtractionMap, root: &Path| -> Vec<(String, PathBuf)> {
            m.iter()
                .map(|(k, v)| (k.to_string(), v.strip_prefix(root).unwrap().to_path_buf()))
                .collect()
        };
        assert_eq!(
            strip(&first, &temp.path().join("one")),
            strip(&second, &temp.path().join("one-again"))
        );
    }

    #[test]
    fn test_cancellation_stops_extraction() {
        let temp = TempDir::new().unwrap();
        let reader = MemoryReader(vec![("a.txt", b"1"), ("b.txt", b"2")]);
        let aliases = aliases();
        let cancel = CancellationToken::new();
        let coordinator = ExtractionCoordinator::new(&aliases, &cancel);

        let mut seen = 0;
        let result = coordinator.extract(&reader, Path::new("m"), temp.path(), &mut |_, _, _| {
            seen += 1;
            cancel.cancel();
        });
        assert!(matches!(result, Err(VerifyError::Cancelled)));
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_empty_container() {
        let temp = TempDir::new().unwrap();
        let map = run(&MemoryReader(Vec::new()), temp.path()).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.into_iter().count(), 0);
    }

    #[test]
    fn test_map_insert_keeps_first() {
        let mut map = ExtractionMap::new();
        assert!(map.insert("a".into(), PathBuf::from("/x")));
        assert!(!map.insert("a".into(), PathBuf::from("/y")));
        assert_eq!(map.get("a"), Some(Path::new("/x")));
    }
}
