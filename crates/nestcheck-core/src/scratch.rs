//! Per-pass extraction roots.
//!
//! Every container verification pass gets a brand-new directory under the
//! configured scratch directory. The directory is removed when the
//! [`ExtractionRoot`] is released or dropped, whichever comes first, so an
//! error or panic anywhere during extraction or verification cannot leak it.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use tracing::debug;
use tracing::warn;

use crate::Result;
use crate::VerifyError;
use crate::hash::HashAlgorithm;
use crate::hash::digest_str;

// Process-wide counter making root names unique across passes.
static ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

const MAX_CREATE_ATTEMPTS: usize = 64;

/// Exclusively owned extraction directory for one container pass.
#[derive(Debug)]
pub struct ExtractionRoot {
    path: PathBuf,
    released: bool,
}

impl ExtractionRoot {
    /// Creates a fresh root under `scratch_dir`.
    ///
    /// The directory name is derived from `container_key`, the process id and
    /// a counter. The final component is created non-recursively, so an
    /// existing directory is never adopted.
    pub fn acquire(scratch_dir: &Path, container_key: &str, algorithm: HashAlgorithm) -> Result<Self> {
        fs::create_dir_all(scratch_dir).map_err(|source| VerifyError::Extraction {
            path: scratch_dir.to_path_buf(),
            source,
        })?;

        let digest = digest_str(container_key, algorithm);
        let stem = &digest[..16];

        let mut last_error = None;
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let n = ROOT_COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = scratch_dir.join(format!("{stem}-{}-{n}", process::id()));

            match fs::create_dir(&path) {
                Ok(()) => {
                    debug!(root = %path.display(), container = container_key, "acquired extraction root");
                    return Ok(Self {
                        path,
                        released: false,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_error = Some((path, e)),
                Err(source) => return Err(VerifyError::Extraction { path, source }),
            }
        }

        let (path, source) = last_error.unwrap_or_else(|| {
            (
                scratch_dir.to_path_buf(),
                io::Error::new(io::ErrorKind::AlreadyExists, "no free extraction root name"),
            )
        });
        Err(VerifyError::Extraction { path, source })
    }

    /// Returns the root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the root and everything materialized beneath it.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(root = %self.path.display(), "released extraction root"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                root = %self.path.display(),
                error = %e,
                "failed to remove extraction root"
            ),
        }
    }
}

impl Drop for ExtractionRoot {
    fn drop(&mut self) {
        self.remove();
    }
}
