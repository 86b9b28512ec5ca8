//! Progress spinner implementing `ProgressCallback`.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use nestcheck_core::ProgressCallback;
use std::path::Path;
use std::time::Duration;

/// Spinner showing the container being processed and running totals.
///
/// Clears itself on drop.
pub struct CliProgress {
    bar: ProgressBar,
    entries_extracted: u64,
    bytes_written: u64,
    files_verified: u64,
}

impl CliProgress {
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            entries_extracted: 0,
            bytes_written: 0,
            files_verified: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn totals(&self) -> String {
        format!(
            "{} extracted ({}), {} verified",
            self.entries_extracted,
            humanize_bytes(self.bytes_written),
            self.files_verified
        )
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_container_start(&mut self, virtual_path: &str) {
        self.bar
            .set_message(format!("Extracting {virtual_path} [{}]", self.totals()));
    }

    fn on_entry_extracted(&mut self, _relative_path: &str, _alias: &Path, bytes: u64) {
        self.entries_extracted += 1;
        self.bytes_written += bytes;
    }

    fn on_entry_verified(&mut self, virtual_path: &str) {
        self.files_verified += 1;
        self.bar
            .set_message(format!("Verified {virtual_path} [{}]", self.totals()));
    }

    fn on_container_complete(&mut self, _virtual_path: &str) {
        self.bar.tick();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
