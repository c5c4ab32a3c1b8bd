//! Calcrepl CLI - an interactive decimal calculator

use std::fs::{self, OpenOptions};
use std::io;

use anyhow::Context;
use clap::Parser;
use env_logger::{Env, Target};
use rustyline::DefaultEditor;

use calcrepl::cli::Args;
use calcrepl::{calculator_repl, Calculator, CalculatorConfig};

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = args.resolve_config();
    init_logging(config.as_ref().ok(), args.verbose);

    let editor = DefaultEditor::new().context("failed to initialise line editor")?;
    calculator_repl(move || Calculator::new(config?), editor, io::stdout())
        .context("calculator session failed")?;
    Ok(())
}

/// Log to `<log_dir>/calculator.log` when it can be opened, stderr otherwise.
/// `RUST_LOG` always wins over the default filter.
fn init_logging(config: Option<&CalculatorConfig>, verbose: bool) {
    let file = config.and_then(|config| {
        fs::create_dir_all(config.log_dir()).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_file())
            .ok()
    });

    let level = default_filter(file.is_some(), verbose);
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(level));
    if let Some(file) = file {
        builder.target(Target::Pipe(Box::new(file)));
    }

    let _ = builder.try_init();
}

/// Level used when `RUST_LOG` is unset. On stderr only warnings show by
/// default so log lines do not interleave with the prompt.
fn default_filter(to_file: bool, verbose: bool) -> &'static str {
    match (to_file, verbose) {
        (_, true) => "debug",
        (true, false) => "info",
        (false, false) => "warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true, false), "info");
        assert_eq!(default_filter(false, false), "warn");
        assert_eq!(default_filter(true, true), "debug");
        assert_eq!(default_filter(false, true), "debug");
    }
}
