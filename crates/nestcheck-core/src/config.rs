//! Configuration for recursive container verification.

use std::path::PathBuf;

use crate::hash::HashAlgorithm;

/// Configuration controlling recursion, aliasing and scratch storage.
///
/// # Examples
///
/// ```
/// use nestcheck_core::VerifyConfig;
///
/// // Use defaults
/// let config = VerifyConfig::default();
/// assert!(config.recursive);
///
/// // Customize for specific needs
/// let custom = VerifyConfig {
///     max_depth: 4,
///     ..Default::default()
/// }
/// .with_exempt_extension(".msp");
/// assert!(custom.is_exempt_extension(".MSP"));
/// ```
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Extract and verify the members of containers. When `false`,
    /// containers are verified as opaque files.
    pub recursive: bool,

    /// Extensions (with leading dot) whose entries keep their original file
    /// name when materialized. Matching is case-insensitive.
    pub exempt_extensions: Vec<String>,

    /// Digest used to derive alias path components.
    pub hash_algorithm: HashAlgorithm,

    /// Parent directory for every per-pass extraction root.
    pub scratch_dir: PathBuf,

    /// Maximum container nesting depth. The top-level file is depth 0.
    pub max_depth: usize,
}

impl Default for VerifyConfig {
    /// Creates a `VerifyConfig` with default settings.
    ///
    /// Default values:
    /// - `recursive`: true
    /// - `exempt_extensions`: `[".cab"]`
    /// - `hash_algorithm`: SHA-256
    /// - `scratch_dir`: `<system temp>/nestcheck`
    /// - `max_depth`: 16
    fn default() -> Self {
        Self {
            recursive: true,
            exempt_extensions: vec![".cab".to_string()],
            hash_algorithm: HashAlgorithm::Sha256,
            scratch_dir: std::env::temp_dir().join("nestcheck"),
            max_depth: 16,
        }
    }
}

impl VerifyConfig {
    /// Enables or disables recursive verification.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets the scratch directory.
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Sets the digest algorithm.
    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Adds an exempt extension. A missing leading dot is added.
    #[must_use]
    pub fn with_exempt_extension(mut self, extension: &str) -> Self {
        let ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{extension}")
        };
        if !self.is_exempt_extension(&ext) {
            self.exempt_extensions.push(ext);
        }
        self
    }

    /// Returns whether entries with this extension keep their file name.
    #[must_use]
    pub fn is_exempt_extension(&self, extension: &str) -> bool {
        self.exempt_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VerifyConfig::default();
        assert!(config.recursive);
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert!(config.scratch_dir.ends_with("nestcheck"));
    }

    #[test]
    fn test_cab_exempt_case_insensitive() {
        let config = VerifyConfig::default();
        assert!(config.is_exempt_extension(".cab"));
        assert!(config.is_exempt_extension(".CAB"));
        assert!(!config.is_exempt_extension(".msi"));
        assert!(!config.is_exempt_extension("cab"));
    }

    #[test]
    fn test_with_exempt_extension_normalizes_dot() {
        let config = VerifyConfig::default()
            .with_exempt_extension("msp")
            .with_exempt_extension(".CAB");
        assert!(config.is_exempt_extension(".msp"));
        assert_eq!(config.exempt_extensions.len(), 2);
    }

    #[test]
    fn test_builders() {
        let config = VerifyConfig::default()
            .with_recursive(false)
            .with_max_depth(2)
            .with_scratch_dir("/var/tmp/scratch")
            .with_hash_algorithm(HashAlgorithm::Blake3);
        assert!(!config.recursive);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.scratch_dir, PathBuf::from("/var/tmp/scratch"));
        assert_eq!(config.hash_algorithm, HashAlgorithm::Blake3);
    }
}
