//! Recursive verification of container contents.
//!
//! A container pass runs in four steps. It acquires a fresh
//! [`ExtractionRoot`], materializes every entry with the
//! [`ExtractionCoordinator`], verifies each materialized entry through a
//! [`FileVerifier`], and finally releases the root. The root is released on
//! every exit path, including errors and cancellation.

use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;

use tracing::warn;

use crate::Result;
use crate::VerifyError;
use crate::alias::AliasGenerator;
use crate::cancel::CancellationToken;
use crate::config::VerifyConfig;
use crate::extraction::ExtractionCoordinator;
use crate::extraction::ExtractionMap;
use crate::formats::EntryReader;
use crate::formats::detect_container;
use crate::formats::reader_for;
use crate::progress::NoopProgress;
use crate::progress::ProgressCallback;
use crate::result::DETAIL_FULL_NAME;
use crate::result::DetailCategory;
use crate::result::VerificationResult;
use crate::scratch::ExtractionRoot;

/// General file-verification entry point.
///
/// Implementations are re-entrant: verifying a container calls back into the
/// same verifier for every member.
pub trait FileVerifier {
    /// Verifies one file.
    ///
    /// * `physical_path` - file on disk to examine (an alias for extracted
    ///   entries)
    /// * `parent_name` - display name of the enclosing container, empty at
    ///   the top level
    /// * `virtual_path` - position of the file in the container hierarchy
    /// * `original_relative_path` - path of the entry inside its container
    fn verify_file(
        &self,
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
    ) -> VerificationResult;
}

impl<T: FileVerifier + ?Sized> FileVerifier for &T {
    fn verify_file(
        &self,
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
    ) -> VerificationResult {
        (**self).verify_file(physical_path, parent_name, virtual_path, original_relative_path)
    }
}

/// Leaf verifier that records every file as skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipVerifier;

impl FileVerifier for SkipVerifier {
    fn verify_file(
        &self,
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
    ) -> VerificationResult {
        VerificationResult::for_entry(physical_path, parent_name, virtual_path, original_relative_path)
    }
}

/// Joins a container's virtual path and an entry's relative path.
///
/// The join is textual so that absolute-looking entry names stay below the
/// container in reports.
///
/// ```
/// use nestcheck_core::verify::join_virtual;
///
/// assert_eq!(join_virtual("pkg.zip", "lib/a.dll"), "pkg.zip/lib/a.dll");
/// assert_eq!(join_virtual("pkg.zip/", "/etc/passwd"), "pkg.zip/etc/passwd");
/// ```
pub fn join_virtual(container: &str, relative_path: &str) -> String {
    let container = container.trim_end_matches(['/', '\\']);
    let relative_path = relative_path.trim_start_matches(['/', '\\']);
    match (container.is_empty(), relative_path.is_empty()) {
        (true, _) => relative_path.to_string(),
        (false, true) => container.to_string(),
        (false, false) => format!("{container}/{relative_path}"),
    }
}

/// Verifies every materialized entry and attaches the results to
/// `container`.
///
/// Children are appended in map order and each carries its original
/// in-archive path as a `FullName` detail. A failing child never stops its
/// siblings.
///
/// # Errors
///
/// Returns [`VerifyError::Cancelled`] if `cancel` fires between entries.
/// Children verified before that point stay attached.
pub fn verify_all(
    map: ExtractionMap,
    container: &mut VerificationResult,
    verifier: &dyn FileVerifier,
    cancel: &CancellationToken,
) -> Result<()> {
    for (relative_path, alias) in map {
        cancel.check()?;

        let virtual_path = join_virtual(&container.virtual_path, &relative_path);
        let mut child =
            verifier.verify_file(&alias, &container.filename, &virtual_path, &relative_path);
        child.add_detail(DetailCategory::File, DETAIL_FULL_NAME, relative_path);
        container.add_nested(child);
    }
    Ok(())
}

/// File verifier that expands containers and delegates everything else to a
/// leaf checker.
///
/// Containers are detected by the extension of their original path. A
/// container is first passed to the leaf checker like any other file, then
/// its members are extracted and verified recursively as nested results.
///
/// Nesting depth travels with each call chain, so one verifier can serve
/// several threads at once when `L` is `Sync`.
///
/// # Examples
///
/// ```no_run
/// use nestcheck_core::{ContainerVerifier, SkipVerifier, VerifyConfig};
/// use std::path::Path;
///
/// let verifier = ContainerVerifier::new(VerifyConfig::default(), SkipVerifier);
/// let result = verifier.verify_path(Path::new("package.nupkg"));
/// println!("{} results", result.total_results());
/// ```
pub struct ContainerVerifier<L> {
    config: VerifyConfig,
    aliases: AliasGenerator,
    leaf: L,
    cancel: CancellationToken,
    progress: Mutex<Box<dyn ProgressCallback>>,
}

impl<L: FileVerifier> ContainerVerifier<L> {
    /// Creates a verifier using `leaf` for non-container checks.
    pub fn new(config: VerifyConfig, leaf: L) -> Self {
        let aliases = AliasGenerator::from_config(&config);
        Self {
            config,
            aliases,
            leaf,
            cancel: CancellationToken::new(),
            progress: Mutex::new(Box::new(NoopProgress)),
        }
    }

    /// Uses `cancel` to abort verification between entries.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reports progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Box<dyn ProgressCallback>) -> Self {
        self.progress = Mutex::new(progress);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Returns the cancellation token observed by this verifier.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Verifies a top-level file.
    ///
    /// Its virtual path is its file name and it has no parent.
    pub fn verify_path(&self, path: &Path) -> VerificationResult {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.verify_file(path, "", &name, &name)
    }

    /// Extracts and verifies the members of the container at
    /// `result.full_path`, attaching them to `result`.
    ///
    /// The container counts as a top-level one for the nesting bound. Does
    /// nothing when recursion is disabled.
    ///
    /// # Errors
    ///
    /// Reader and filesystem errors, cancellation and excessive nesting are
    /// returned after the extraction root has been removed.
    pub fn verify_container_contents(
        &self,
        result: &mut VerificationResult,
        reader: &dyn EntryReader,
    ) -> Result<()> {
        self.verify_contents_at(result, reader, 1)
    }

    /// `depth` counts the container passes enclosing the members, this one
    /// included.
    fn verify_contents_at(
        &self,
        result: &mut VerificationResult,
        reader: &dyn EntryReader,
        depth: usize,
    ) -> Result<()> {
        if !self.config.recursive {
            return Ok(());
        }
        if depth > self.config.max_depth {
            return Err(VerifyError::NestingTooDeep {
                depth,
                max: self.config.max_depth,
            });
        }
        self.cancel.check()?;

        self.report(|p| p.on_container_start(&result.virtual_path));
        let outcome = self.run_pass(result, reader, depth);
        self.report(|p| p.on_container_complete(&result.virtual_path));
        outcome
    }

    fn run_pass(
        &self,
        result: &mut VerificationResult,
        reader: &dyn EntryReader,
        depth: usize,
    ) -> Result<()> {
        let root = ExtractionRoot::acquire(
            &self.config.scratch_dir,
            &result.full_path.to_string_lossy(),
            self.config.hash_algorithm,
        )?;

        let coordinator = ExtractionCoordinator::new(&self.aliases, &self.cancel);
        let container_path = result.full_path.clone();
        let map = coordinator.extract(
            reader,
            &container_path,
            root.path(),
            &mut |relative_path: &str, alias: &Path, bytes: u64| {
                self.report(|p| p.on_entry_extracted(relative_path, alias, bytes));
            },
        )?;

        let members = Members {
            verifier: self,
            depth,
        };
        verify_all(map, result, &members, &self.cancel)?;
        root.release();
        Ok(())
    }

    /// Verifies one file that sits inside `depth` enclosing containers.
    fn verify_file_at(
        &self,
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
        depth: usize,
    ) -> VerificationResult {
        let mut result =
            self.leaf
                .verify_file(physical_path, parent_name, virtual_path, original_relative_path);

        let detect_name = if original_relative_path.is_empty() {
            physical_path.to_string_lossy()
        } else {
            original_relative_path.into()
        };

        if let Some(format) = detect_container(&detect_name) {
            let reader = reader_for(format);
            if let Err(e) = self.verify_contents_at(&mut result, reader.as_ref(), depth + 1) {
                warn!(
                    container = virtual_path,
                    format = reader.format_name(),
                    error = %e,
                    "container verification failed"
                );
                // A failed container reports its reason, never a partial tree.
                result.nested_results.clear();
                result.set_failure(e.to_string());
            }
        }

        self.report(|p| p.on_entry_verified(virtual_path));
        result
    }

    fn report(&self, f: impl FnOnce(&mut dyn ProgressCallback)) {
        let mut progress = self.progress.lock().unwrap_or_else(PoisonError::into_inner);
        f(progress.as_mut());
    }
}

impl<L: FileVerifier> FileVerifier for ContainerVerifier<L> {
    fn verify_file(
        &self,
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
    ) -> VerificationResult {
        self.verify_file_at(physical_path, parent_name, virtual_path, original_relative_path, 0)
    }
}

/// Routes the members of one container pass back into the verifier, each
/// sitting inside `depth` containers.
struct Members<'a, L> {
    verifier: &'a ContainerVerifier<L>,
    depth: usize,
}

impl<L: FileVerifier> FileVerifier for Members<'_, L> {
    fn verify_file(
        &self,
        physical_path: &Path,
        parent_name: &str,
        virtual_path: &str,
        original_relative_path: &str,
    ) -> VerificationResult {
        self.verifier.verify_file_at(
            physical_path,
            parent_name,
            virtual_path,
            original_relative_path,
            self.depth,
        )
    }
}

impl<L> std::fmt::Debug for ContainerVerifier<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
