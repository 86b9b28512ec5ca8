//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::Summary;
use anyhow::Result;
use console::Term;
use console::style;
use nestcheck_core::DetailCategory;
use nestcheck_core::VerificationResult;
use nestcheck_core::VerificationStatus;
use nestcheck_core::result::DETAIL_FULL_NAME;
use nestcheck_core::result::DETAIL_REASON;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn status_label(&self, status: VerificationStatus) -> String {
        let label = format!("{status:<7}");
        if !self.use_colors {
            return label;
        }
        match status {
            VerificationStatus::Pass => style(label).green().bold().to_string(),
            VerificationStatus::Fail => style(label).red().bold().to_string(),
            VerificationStatus::Skipped => style(label).dim().to_string(),
        }
    }

    /// Renders one result and its descendants, one line per node.
    fn render(&self, result: &VerificationResult, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        let name = if depth == 0 {
            result.virtual_path.as_str()
        } else {
            result.full_name().unwrap_or(&result.filename)
        };
        lines.push(format!("{indent}{} {name}", self.status_label(result.status)));

        for detail in &result.details {
            let is_reason = detail.category == DetailCategory::Error && detail.key == DETAIL_REASON;
            let is_full_name =
                detail.category == DetailCategory::File && detail.key == DETAIL_FULL_NAME;
            if is_reason || (self.verbose && !is_full_name) {
                lines.push(format!(
                    "{indent}        {}.{}: {}",
                    detail.category, detail.key, detail.value
                ));
            }
        }

        for child in &result.nested_results {
            self.render(child, depth + 1, lines);
        }
    }

    fn lines(&self, results: &[VerificationResult]) -> Vec<String> {
        let mut lines = Vec::new();
        for result in results {
            self.render(result, 0, &mut lines);
        }

        let summary = Summary::from_results(results);
        lines.push(String::new());
        lines.push(format!(
            "Verified {} files: {} passed, {} failed, {} skipped",
            summary.total, summary.passed, summary.failed, summary.skipped
        ));
        lines
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_verification(&self, results: &[VerificationResult]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for line in self.lines(results) {
            self.term.write_line(&line)?;
        }
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = Term::stderr().write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = Term::stderr().write_line(&format!("WARNING: {message}"));
        }
    }
}
