//! Command-line surface for the `zencode` script runner (`SPEC_FULL.md` §4.8).

use std::path::PathBuf;

use clap::Parser;

/// Runs a `ZenDSL` script against optional `DATA`/`KEYS` JSON documents.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the `ZenDSL` script to run.
    pub script: PathBuf,

    /// Path to a JSON file for `DATA`, or `-` for empty.
    #[arg(long, value_name = "FILE|-")]
    pub data: Option<PathBuf>,

    /// Path to a JSON file for `KEYS`, or `-` for empty.
    #[arg(long, value_name = "FILE|-")]
    pub keys: Option<PathBuf>,

    /// Raise log verbosity; repeatable.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
