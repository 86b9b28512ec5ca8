//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::digest::DigestChecker;
use crate::error::check_input;
use crate::error::prepare_scratch_dir;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use nestcheck_core::ContainerVerifier;
use nestcheck_core::VerificationResult;
use nestcheck_core::VerifyConfig;
use tracing::info;

/// Builds the core configuration from command-line arguments.
fn build_config(args: &VerifyArgs) -> VerifyConfig {
    let mut config = VerifyConfig::default()
        .with_recursive(!args.no_recursive)
        .with_hash_algorithm(args.hash)
        .with_max_depth(usize::from(args.max_depth));

    if let Some(dir) = &args.scratch_dir {
        config = config.with_scratch_dir(dir);
    }
    for ext in &args.exempt_ext {
        config = config.with_exempt_extension(ext);
    }
    config
}

pub fn execute(args: &VerifyArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let config = build_config(args);

    if args.no_recursive && !args.exempt_ext.is_empty() {
        formatter.format_warning("--exempt-ext has no effect with --no-recursive");
    }

    for file in &args.files {
        check_input(file)?;
    }
    if config.recursive {
        prepare_scratch_dir(&config.scratch_dir)?;
    }

    let results = run(config, args, show_progress);
    formatter.format_verification(&results)?;

    let failed: usize = results.iter().map(|r| r.failures().len()).sum();
    if failed > 0 {
        bail!("{failed} file(s) failed verification");
    }
    Ok(())
}

fn run(config: VerifyConfig, args: &VerifyArgs, show_progress: bool) -> Vec<VerificationResult> {
    let mut verifier = ContainerVerifier::new(config, DigestChecker::new(args.hash));
    if show_progress {
        verifier = verifier.with_progress(Box::new(CliProgress::new()));
    }

    args.files
        .iter()
        .map(|file| {
            info!(file = %file.display(), "verifying");
            verifier.verify_path(file)
        })
        .collect()
}
