//! Output formatter trait for CLI results.

use anyhow::Result;
use nestcheck_core::VerificationResult;
use nestcheck_core::VerificationStatus;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result trees of one verify run
    fn format_verification(&self, results: &[VerificationResult]) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Status counts over every node of a set of result trees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.add(result);
        }
        summary
    }

    fn add(&mut self, result: &VerificationResult) {
        self.total += 1;
        match result.status {
            VerificationStatus::Pass => self.passed += 1,
            VerificationStatus::Fail => self.failed += 1,
            VerificationStatus::Skipped => self.skipped += 1,
        }
        for child in &result.nested_results {
            self.add(child);
        }
    }
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Failure,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_descendants() {
        let mut root = VerificationResult::new("a.zip", "a.zip", "/a.zip");
        root.status = VerificationStatus::Pass;
        let mut bad = VerificationResult::new("x", "a.zip/x", "/t/x");
        bad.set_failure("no");
        root.add_nested(bad);
        root.add_nested(VerificationResult::new("y", "a.zip/y", "/t/y"));
        let other = VerificationResult::new("b.dll", "b.dll", "/b.dll");

        let summary = Summary::from_results(&[root, other]);
        assert_eq!(
            summary,
            Summary {
                total: 4,
                passed: 1,
                failed: 1,
                skipped: 2,
            }
        );
    }
}
