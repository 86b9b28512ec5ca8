//! CLI argument parsing using clap.

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use nestcheck_core::HashAlgorithm;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nestcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify files, expanding nested containers
    Verify(VerifyArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Files to verify
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Verify containers as opaque files without extracting them
    #[arg(long)]
    pub no_recursive: bool,

    /// Additional extension whose entries keep their file name (repeatable)
    #[arg(long = "exempt-ext", value_name = "EXT")]
    pub exempt_ext: Vec<String>,

    /// Digest used for alias paths and file digests
    #[arg(long, default_value = "sha256", value_parser = parse_hash_algorithm)]
    pub hash: HashAlgorithm,

    /// Directory for temporary extraction roots
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Maximum container nesting depth
    #[arg(long, default_value = "16", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_depth: u16,
}

fn parse_hash_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse()
}
