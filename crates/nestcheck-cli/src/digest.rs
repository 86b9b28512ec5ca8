//! Leaf checker shipped with the binary.
//!
//! Records each file's size and content digest. It does not judge
//! signatures: a file that can be read passes.

use nestcheck_core::DetailCategory;
use nestcheck_core::FileVerifier;
use nestcheck_core::HashAlgorithm;
use nestcheck_core::VerificationResult;
use nestcheck_core::VerificationStatus;
use nestcheck_core::hash::digest_reader;
use std::fs::File;
use std::io;
use std::path::Path;

/// Detail key holding the file size in bytes.
pub const DETAIL_SIZE: &str = "Size";

/// Leaf [`FileVerifier`] recording size and digest details.
#[derive(Debug, Clone, Copy)]
pub struct DigestChecker {
    algorithm: HashAlgorithm,
}

impl DigestChecker {
    pub const fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    fn measure(&self, path: &Path) -> io::Result<(u64, String)> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();
        let digest = digest_reader(&mut file, self.algorithm)?;
        Ok((size, digest))
    }
}

impl FileVerifier for DigestChecker {
    fn verify_file(
        &self,
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
    ) -> VerificationResult {
        let mut result = VerificationResult::for_entry(
            physical_path,
            parent_name,
            virtual_path,
            original_relative_path,
        );

        match self.measure(physical_path) {
            Ok((size, digest)) => {
                result.add_detail(DetailCategory::File, DETAIL_SIZE, size.to_string());
                result.add_detail(DetailCategory::Signature, self.algorithm.name(), digest);
                result.status = VerificationStatus::Pass;
            }
            Err(e) => result.set_failure(format!("cannot read file: {e}")),
        }
        result
    }
}
