//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::Summary;
use anyhow::Result;
use nestcheck_core::VerificationResult;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct DetailOutput<'a> {
    category: String,
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct ResultOutput<'a> {
    filename: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
    virtual_path: &'a str,
    full_path: String,
    status: String,
    details: Vec<DetailOutput<'a>>,
    nested_results: Vec<ResultOutput<'a>>,
}

impl<'a> ResultOutput<'a> {
    fn from_result(result: &'a VerificationResult) -> Self {
        Self {
            filename: &result.filename,
            parent: result.parent.as_deref(),
            virtual_path: &result.virtual_path,
            full_path: result.full_path.display().to_string(),
            status: result.status.to_string().to_lowercase(),
            details: result
                .details
                .iter()
                .map(|d| DetailOutput {
                    category: d.category.to_string(),
                    key: &d.key,
                    value: &d.value,
                })
                .collect(),
            nested_results: result.nested_results.iter().map(Self::from_result).collect(),
        }
    }
}

#[derive(Serialize)]
struct VerifyOutput<'a> {
    summary: Summary,
    results: Vec<ResultOutput<'a>>,
}

fn verify_output(results: &[VerificationResult]) -> JsonOutput<VerifyOutput<'_>> {
    let summary = Summary::from_results(results);
    let data = VerifyOutput {
        summary,
        results: results.iter().map(ResultOutput::from_result).collect(),
    };

    if summary.failed == 0 {
        JsonOutput::success("verify", data)
    } else {
        JsonOutput::failure("verify", data, format!("{} file(s) failed verification", summary.failed))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_verification(&self, results: &[VerificationResult]) -> Result<()> {
        Self::output(&verify_output(results))
    }

    fn format_warning(&self, message: &str) {
        // Warnings stay off stdout so it remains one JSON document.
        let _ = writeln!(io::stderr(), "WARNING: {message}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nestcheck_core::DetailCategory;
    use nestcheck_core::VerificationStatus;

    #[test]
    fn test_json_structure_is_recursive() {
        let mut root = VerificationResult::new("pkg.zip", "pkg.zip", "/in/pkg.zip");
        root.status = VerificationStatus::Pass;
        let mut child = VerificationResult::new("a.txt", "pkg.zip/a.txt", "/tmp/r/h.txt");
        child.parent = Some("pkg.zip".into());
        child.status = VerificationStatus::Pass;
        child.add_detail(DetailCategory::File, "FullName", "a.txt");
        root.add_nested(child);

        let value = serde_json::to_value(verify_output(&[root])).unwrap();
        assert_eq!(value["operation"], "verify");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["summary"]["total"], 2);

        let nested = &value["data"]["results"][0]["nested_results"][0];
        assert_eq!(nested["virtual_path"], "pkg.zip/a.txt");
        assert_eq!(nested["parent"], "pkg.zip");
        assert_eq!(nested["details"][0]["category"], "file");
        assert_eq!(nested["details"][0]["value"], "a.txt");
        assert!(value["data"]["results"][0].get("parent").is_none());
    }

    #[test]
    fn test_json_failure_status() {
        let mut root = VerificationResult::new("x.zip", "x.zip", "/x.zip");
        root.set_failure("invalid archive");

        let value = serde_json::to_value(verify_output(&[root])).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["error"], "1 file(s) failed verification");
        assert_eq!(value["data"]["results"][0]["status"], "fail");
    }
}
