//! Tracing subscriber setup.
//!
//! Logs always go to stderr so stdout carries only results. `RUST_LOG`
//! overrides the level chosen from the command-line flags.

use tracing_subscriber::EnvFilter;

/// Returns the default filter directive for the given flags.
fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global tracing subscriber.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .try_init();

    if let Err(e) = installed {
        // Fails only when a global subscriber or logger is already set.
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0, false), "warn");
        assert_eq!(default_directive(1, false), "info");
        assert_eq!(default_directive(3, false), "debug");
        assert_eq!(default_directive(2, true), "error");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing(0, false);
        init_tracing(2, false);
        tracing::info!("still logging through the first subscriber");
    }
}
