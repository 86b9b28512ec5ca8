//! Alias path generation for archive entries.
//!
//! Entry paths come from untrusted archives and may be arbitrarily long or
//! contain traversal sequences. Instead of sanitizing them, every entry is
//! materialized at an alias:
//!
//! ```text
//! <root>/<digest(parent dir or sentinel)>/<digest(relative path)><extension>
//! ```
//!
//! Both generated components are hex digests, so nothing from the entry path
//! survives as a path component except the extension, which is taken from the
//! final segment and therefore cannot contain a separator.
//!
//! # Exempt extensions
//!
//! Some formats reference sibling payloads by file name (an installer's media
//! table naming its external `.cab` files, for example). Entries with an exempt
//! extension keep their final segment verbatim, still under the hashed
//! directory. Two exempt entries with the same file name in the same logical
//! directory map to the same alias; the second one is skipped during
//! extraction.

use std::path::Path;
use std::path::PathBuf;

use crate::config::VerifyConfig;
use crate::hash::HashAlgorithm;
use crate::hash::digest_str;

/// Digest input used for entries that have no directory component.
pub const ROOT_DIR_SENTINEL: &str = ".\\";

/// Derives collision-resistant, length-bounded alias paths.
///
/// Pure: no filesystem access.
#[derive(Debug, Clone)]
pub struct AliasGenerator {
    exempt_extensions: Vec<String>,
    algorithm: HashAlgorithm,
}

impl AliasGenerator {
    /// Creates a generator with an explicit exemption list.
    pub fn new(exempt_extensions: Vec<String>, algorithm: HashAlgorithm) -> Self {
        Self {
            exempt_extensions,
            algorithm,
        }
    }

    /// Creates a generator from verification settings.
    pub fn from_config(config: &VerifyConfig) -> Self {
        Self::new(config.exempt_extensions.clone(), config.hash_algorithm)
    }

    /// Computes the alias for an entry under `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestcheck_core::alias::AliasGenerator;
    /// use nestcheck_core::hash::{HashAlgorithm, digest_str};
    /// use std::path::Path;
    ///
    /// let generator = AliasGenerator::new(vec![".cab".into()], HashAlgorithm::Sha256);
    /// let alias = generator.alias("docs/readme.txt", Path::new("/scratch"));
    ///
    /// let expected = Path::new("/scratch")
    ///     .join(digest_str("docs", HashAlgorithm::Sha256))
    ///     .join(format!("{}.txt", digest_str("docs/readme.txt", HashAlgorithm::Sha256)));
    /// assert_eq!(alias, expected);
    /// ```
    pub fn alias(&self, relative_path: &str, root: &Path) -> PathBuf {
        let (directory, file_name) = split_relative(relative_path);
        let directory_hash = digest_str(directory.unwrap_or(ROOT_DIR_SENTINEL), self.algorithm);

        let extension = extension_of(file_name);
        let alias_name = match extension {
            Some(ext) if self.is_exempt(ext) => file_name.to_string(),
            Some(ext) => format!("{}{ext}", digest_str(relative_path, self.algorithm)),
            None => digest_str(relative_path, self.algorithm),
        };

        root.join(directory_hash).join(alias_name)
    }

    /// Returns whether entries with `extension` keep their file name.
    pub fn is_exempt(&self, extension: &str) -> bool {
        self.exempt_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Splits an entry path at its last separator.
///
/// Both `/` and `\` are separators: archives produced on Windows commonly
/// use backslashes. An empty directory part is reported as `None`.
fn split_relative(relative_path: &str) -> (Option<&str>, &str) {
    match relative_path.rfind(['/', '\\']) {
        Some(idx) => {
            let directory = &relative_path[..idx];
            let file_name = &relative_path[idx + 1..];
            ((!directory.is_empty()).then_some(directory), file_name)
        }
        None => (None, relative_path),
    }
}

/// Returns the extension of a file name including the leading dot.
///
/// A trailing dot yields no extension; a leading dot (`.cab`) is an extension.
fn extension_of(file_name: &str) -> Option<&str> {
    let idx = file_name.rfind('.')?;
    (idx + 1 < file_name.len()).then(|| &file_name[idx..])
}
