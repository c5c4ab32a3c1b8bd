//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::calculator::CalculatorConfig;
use crate::error::Result;

#[derive(Parser, Debug, Default)]
#[command(name = "calcrepl")]
#[command(author, version, about = "Interactive decimal calculator with undo/redo and saved history", long_about = None)]
pub struct Args {
    /// Directory holding history and logs (overrides CALCULATOR_BASE_DIR)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Maximum number of calculations kept (overrides CALCULATOR_MAX_HISTORY_SIZE)
    #[arg(long, value_name = "N")]
    pub max_history_size: Option<usize>,

    /// Do not save history after every calculation
    #[arg(long)]
    pub no_auto_save: bool,

    /// Significant digits used for results (overrides CALCULATOR_PRECISION)
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Read the environment configuration and apply the command-line
    /// overrides on top of it.
    pub fn resolve_config(&self) -> Result<CalculatorConfig> {
        self.apply(CalculatorConfig::from_env()?)
    }

    pub fn apply(&self, mut config: CalculatorConfig) -> Result<CalculatorConfig> {
        if let Some(ref dir) = self.base_dir {
            config.base_dir = dir.clone();
        }
        if let Some(size) = self.max_history_size {
            config.max_history_size = size;
        }
        if self.no_auto_save {
            config.auto_save = false;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "calcrepl",
            "--base-dir",
            "/tmp/calc",
            "--max-history-size",
            "7",
            "--no-auto-save",
            "-v",
        ]);
        assert_eq!(args.base_dir, Some(PathBuf::from("/tmp/calc")));
        assert_eq!(args.max_history_size, Some(7));
        assert!(args.no_auto_save);
        assert!(args.verbose);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::parse_from(["calcrepl", "--base-dir", "/srv/calc", "--precision", "12"]);
        let config = args.apply(CalculatorConfig::default()).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/calc"));
        assert_eq!(config.precision, 12);
        assert!(config.auto_save);
    }

    #[test]
    fn test_zero_history_size_is_rejected() {
        let args = Args::parse_from(["calcrepl", "--max-history-size", "0"]);
        let result = args.apply(CalculatorConfig::default());
        assert!(matches!(result, Err(CalcError::Config(_))));
    }
}
