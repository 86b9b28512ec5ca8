//! Preflight checks with user-facing hints.
//!
//! Problems with a single container end up in the result tree. Problems
//! that would fail every container are reported once, up front, as
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use std::fs;
use std::path::Path;

/// Checks that `file` can be verified before any work starts.
pub fn check_input(file: &Path) -> Result<()> {
    let metadata = fs::metadata(file).map_err(|e| {
        anyhow!(
            "Cannot access '{}': {}\n\
             HINT: Check that the path exists and is readable.",
            file.display(),
            e
        )
    })?;

    if metadata.is_dir() {
        return Err(anyhow!(
            "Not a regular file: {}\n\
             HINT: Pass archive or package files, not directories.",
            file.display()
        ));
    }
    Ok(())
}

/// Creates the scratch directory up front so permission problems surface
/// once rather than as a failure of every container.
pub fn prepare_scratch_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        anyhow!(
            "Cannot create scratch directory '{}': {}\n\
             HINT: Use --scratch-dir to choose a writable directory with enough free space.",
            dir.display(),
            e
        )
    })
}
