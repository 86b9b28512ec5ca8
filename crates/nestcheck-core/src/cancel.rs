//! Cooperative cancellation for long verification runs.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::Result;
use crate::VerifyError;

/// Shared cancellation flag, checked between archive entries.
///
/// Clones observe the same flag, so one clone can be handed to a signal
/// handler while the verifier holds another.
///
/// # Examples
///
/// ```
/// use nestcheck_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(token.check().is_ok());
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Returns `Err(VerifyError::Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(VerifyError::Cancelled)
        } else {
            Ok(())
        }
    }
}
