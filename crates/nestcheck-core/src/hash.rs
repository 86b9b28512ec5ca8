//! Stable string digests used to derive alias paths.
//!
//! Output is always lowercase hexadecimal, so a digest can be used directly
//! as a single path component: it never contains separators, dots or
//! characters that are reserved on any supported filesystem.

use std::fmt;
use std::io;
use std::io::Read;
use std::str::FromStr;

use sha2::Digest;
use sha2::Sha256;

use crate::copy::CopyBuffer;
use crate::copy::copy_stream;

/// Digest algorithm used for alias generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-256 (64 hex characters).
    #[default]
    Sha256,
    /// BLAKE3 (64 hex characters).
    Blake3,
}

impl HashAlgorithm {
    /// Returns the canonical lowercase name of the algorithm.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            other => Err(format!("unknown hash algorithm: {other}")),
        }
    }
}

/// Computes the hex digest of a string key.
///
/// # Examples
///
/// ```
/// use nestcheck_core::hash::{HashAlgorithm, digest_str};
///
/// let d = digest_str("docs", HashAlgorithm::Sha256);
/// assert_eq!(d.len(), 64);
/// assert_eq!(d, digest_str("docs", HashAlgorithm::Sha256));
/// ```
pub fn digest_str(input: &str, algorithm: HashAlgorithm) -> String {
    digest_bytes(input.as_bytes(), algorithm)
}

/// Computes the hex digest of a byte slice.
pub fn digest_bytes(input: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
        HashAlgorithm::Blake3 => hex::encode(blake3::hash(input).as_bytes()),
    }
}

/// Computes the hex digest of everything readable from `reader`.
///
/// Content is streamed; it is never held in memory whole.
pub fn digest_reader<R: Read + ?Sized>(
    reader: &mut R,
    algorithm: HashAlgorithm,
) -> io::Result<String> {
    let mut buffer = CopyBuffer::new();
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            copy_stream(reader, &mut hasher, &mut buffer)?;
            Ok(hex::encode(hasher.finalize()))
        }
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            copy_stream(reader, &mut hasher, &mut buffer)?;
            Ok(hex::encode(hasher.finalize().as_bytes()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            digest_str("abc", HashAlgorithm::Sha256),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_blake3_length_and_alphabet() {
        let d = digest_str("../../escape.txt", HashAlgorithm::Blake3);
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_algorithms_differ() {
        assert_ne!(
            digest_str("docs", HashAlgorithm::Sha256),
            digest_str("docs", HashAlgorithm::Blake3)
        );
    }

    #[test]
    fn test_digest_reader_matches_bytes() {
        let data = vec![7u8; 200_000];
        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            let streamed = digest_reader(&mut std::io::Cursor::new(&data), algorithm).unwrap();
            assert_eq!(streamed, digest_bytes(&data, algorithm));
        }
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("SHA256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("blake3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert!("md5".parse::<HashAlgorithm>().is_err());
        assert_eq!(HashAlgorithm::default().to_string(), "sha256");
    }
}
