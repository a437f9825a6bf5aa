//! CLI argument structures

use crate::cli::help::operations_help;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::path::PathBuf;

/// Drive the atto-8 toolchain as a stack of file operations
#[derive(Parser, Debug)]
#[command(name = "atto-pipe")]
#[command(
    about = "atto-pipe - Chain atto-8 toolchain stages over a stack of filenames",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a configuration file (defaults to <ROOT>/atto.toml when present)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root holding the toolchain sources (defaults to current directory)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Workspace directory to stage into (overrides the configured one)
    #[arg(short = 'w', long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Stop at the first failing operation instead of continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// Stage and parse, print the planned actions, launch nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Filenames and operations, consumed left to right
    #[arg(value_name = "TOKEN", required = true)]
    pub tokens: Vec<String>,
}

impl Cli {
    /// Parse process arguments, with the operation table appended to `--help`.
    ///
    /// Usage errors exit with status 1; `--help` and `--version` with 0.
    pub fn parse_args() -> Self {
        let parsed = Self::command()
            .after_help(operations_help())
            .try_get_matches()
            .and_then(|matches| Self::from_arg_matches(&matches));

        match parsed {
            Ok(cli) => cli,
            Err(err) => {
                let code = if err.use_stderr() { 1 } else { 0 };
                let _ = err.print();
                std::process::exit(code)
            }
        }
    }
}
