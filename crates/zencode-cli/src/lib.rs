//! Library surface for the `zencode` script runner, split from `main.rs` so
//! the run loop can be exercised without spawning a subprocess.

mod cli;

pub use cli::Cli;

use std::path::Path;

use eyre::{Context, Result};
use zencode::Engine;
use zencode_scenarios::BuiltinScenarioLoader;

/// Reads a `--data`/`--keys` source, treating `None` or `-` as empty input.
fn read_json_source(path: Option<&Path>) -> Result<String> {
    match path {
        None => Ok(String::new()),
        Some(p) if p == Path::new("-") => Ok(String::new()),
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read '{}'", p.display())),
    }
}

/// Runs the script named by `cli`, writing the final `OUT` JSON to stdout on
/// success. Returns `Ok(false)` on a `ZenDSL`-level failure (parse or
/// execution), having already written the traceback to stderr, so `main`
/// can translate that into a non-zero exit without treating it as an `eyre`
/// error (`spec.md` §6's exit-behaviour table).
///
/// # Errors
/// Returns an `eyre` error for I/O failures (unreadable script/data/keys
/// files) — failures outside the `ZenDSL` pipeline itself.
#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "the runner's job is writing OUT/tracebacks to the standard streams"
)]
pub fn run(cli: &Cli) -> Result<bool> {
    let source = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to read script '{}'", cli.script.display()))?;
    let data = read_json_source(cli.data.as_deref())?;
    let keys = read_json_source(cli.keys.as_deref())?;

    let mut engine = Engine::new(Box::new(BuiltinScenarioLoader));
    let script = match engine.parse(&source) {
        Ok(script) => script,
        Err(err) => {
            log::error!("parse failed: {err}");
            eprintln!("{err}");
            return Ok(false);
        }
    };

    match engine.run(&script, &data, &keys) {
        Ok(Some(out)) => {
            println!("{out}");
            Ok(true)
        }
        Ok(None) => Ok(true),
        Err(failure) => {
            log::error!("run failed: {}", failure.error);
            eprint!("{failure}");
            Ok(false)
        }
    }
}

/// Maps a CLI verbosity count onto the facade's max level, matching
/// `cargo-bdd`'s convention of scaling log noise with repeated `-v`.
#[must_use]
pub fn log_level_for(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test setup fails fast on unexpected I/O errors")]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_path_source_is_empty_string() {
        assert_eq!(read_json_source(None).unwrap(), "");
        assert_eq!(read_json_source(Some(Path::new("-"))).unwrap(), "");
    }

    #[test]
    fn verbosity_scales_log_level() {
        assert_eq!(log_level_for(0), log::LevelFilter::Warn);
        assert_eq!(log_level_for(3), log::LevelFilter::Trace);
    }

    fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn invalid_transition_fails_without_stdout() {
        let dir = std::env::temp_dir();
        let script = write_script(&dir, "zencode_cli_test_invalid.zen", "When I sign 'msg'\n");
        let cli = Cli {
            script,
            data: None,
            keys: None,
            verbose: 0,
        };
        assert!(!run(&cli).unwrap());
    }
}
