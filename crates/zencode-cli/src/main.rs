//! `zencode`: runs a `ZenDSL` script against optional `DATA`/`KEYS` JSON.

use clap::Parser as _;
use zencode_cli::{log_level_for, run, Cli};

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(log_level_for(cli.verbose))
        .init();

    if run(&cli)? {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
