//! Recursive verification of nested archive containers.
//!
//! `nestcheck-core` takes a top-level container (a package, bundle or
//! archive), extracts every entry to a sandboxed alias path, re-verifies each
//! entry through a pluggable [`FileVerifier`] and collects the outcomes into a
//! hierarchical [`VerificationResult`]. Entries that are containers
//! themselves are expanded recursively.
//!
//! Extraction never uses an entry's own path on disk: directory and file
//! names are replaced by digests, so traversal sequences and overlong names
//! cannot escape the per-pass extraction root. The root is removed once the
//! container has been processed, whether or not verification succeeded.
//!
//! # Examples
//!
//! ```no_run
//! use nestcheck_core::{ContainerVerifier, SkipVerifier, VerifyConfig};
//! use std::path::Path;
//!
//! let config = VerifyConfig::default().with_max_depth(8);
//! let verifier = ContainerVerifier::new(config, SkipVerifier);
//!
//! let result = verifier.verify_path(Path::new("bundle.zip"));
//! for failure in result.failures() {
//!     println!("{}: FAIL", failure.virtual_path);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alias;
pub mod cancel;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod hash;
pub mod progress;
pub mod result;
pub mod scratch;
pub mod verify;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use alias::AliasGenerator;
pub use cancel::CancellationToken;
pub use config::VerifyConfig;
pub use error::Result;
pub use error::VerifyError;
pub use extraction::ExtractionCoordinator;
pub use extraction::ExtractionMap;
pub use hash::HashAlgorithm;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use result::Detail;
pub use result::DetailCategory;
pub use result::VerificationResult;
pub use result::VerificationStatus;
pub use scratch::ExtractionRoot;
pub use verify::ContainerVerifier;
pub use verify::FileVerifier;
pub use verify::SkipVerifier;
