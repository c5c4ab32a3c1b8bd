//! Calculator configuration
//!
//! Values come from `CALCULATOR_*` environment variables. Unset or empty
//! variables fall back to the defaults below; a value that is set but cannot
//! be parsed is a configuration error, never silently replaced.
//!
//! | variable                      | default          |
//! |-------------------------------|------------------|
//! | `CALCULATOR_BASE_DIR`         | current dir      |
//! | `CALCULATOR_HISTORY_DIR`      | `<base>/history` |
//! | `CALCULATOR_LOG_DIR`          | `<base>/logs`    |
//! | `CALCULATOR_MAX_HISTORY_SIZE` | 1000             |
//! | `CALCULATOR_AUTO_SAVE`        | true             |
//! | `CALCULATOR_PRECISION`        | 28               |
//! | `CALCULATOR_MAX_INPUT_VALUE`  | 1e999            |
//! | `CALCULATOR_MAX_EXPONENT`     | 999              |
//!
//! `CALCULATOR_MAX_EXPONENT` bounds the decimal order of magnitude of every
//! operand and result in both directions, so `1e-1000` is rejected by default.

use std::path::PathBuf;
use std::str::FromStr;

use dashu::float::DBig;
use dashu::integer::IBig;

use super::operations::{order_of_magnitude, NumericContext};
use crate::error::{CalcError, Result};

pub const ENV_BASE_DIR: &str = "CALCULATOR_BASE_DIR";
pub const ENV_HISTORY_DIR: &str = "CALCULATOR_HISTORY_DIR";
pub const ENV_LOG_DIR: &str = "CALCULATOR_LOG_DIR";
pub const ENV_MAX_HISTORY_SIZE: &str = "CALCULATOR_MAX_HISTORY_SIZE";
pub const ENV_AUTO_SAVE: &str = "CALCULATOR_AUTO_SAVE";
pub const ENV_PRECISION: &str = "CALCULATOR_PRECISION";
pub const ENV_MAX_INPUT_VALUE: &str = "CALCULATOR_MAX_INPUT_VALUE";
pub const ENV_MAX_EXPONENT: &str = "CALCULATOR_MAX_EXPONENT";

pub const DEFAULT_MAX_HISTORY_SIZE: usize = 1000;
pub const DEFAULT_PRECISION: usize = 28;
pub const DEFAULT_MAX_EXPONENT: usize = 999;
/// Upper bound for `max_exponent`; a value this size prints as a
/// million-character string already.
pub const MAX_EXPONENT_LIMIT: usize = 1_000_000;
pub const HISTORY_FILE_NAME: &str = "calculator_history.json";
pub const LOG_FILE_NAME: &str = "calculator.log";

#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    pub base_dir: PathBuf,
    pub history_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub max_history_size: usize,
    pub auto_save: bool,
    pub precision: usize,
    pub max_input_value: DBig,
    pub max_exponent: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            history_dir: None,
            log_dir: None,
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            auto_save: true,
            precision: DEFAULT_PRECISION,
            max_input_value: default_max_input(),
            max_exponent: DEFAULT_MAX_EXPONENT,
        }
    }
}

impl CalculatorConfig {
    /// A default config rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_BASE_DIR) {
            config.base_dir = PathBuf::from(dir);
        }
        config.history_dir = get(ENV_HISTORY_DIR).map(PathBuf::from);
        config.log_dir = get(ENV_LOG_DIR).map(PathBuf::from);

        if let Some(raw) = get(ENV_MAX_HISTORY_SIZE) {
            config.max_history_size = parse_positive(ENV_MAX_HISTORY_SIZE, &raw)?;
        }
        if let Some(raw) = get(ENV_AUTO_SAVE) {
            config.auto_save = parse_flag(ENV_AUTO_SAVE, &raw)?;
        }
        if let Some(raw) = get(ENV_PRECISION) {
            config.precision = parse_positive(ENV_PRECISION, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_INPUT_VALUE) {
            config.max_input_value = DBig::from_str(raw.trim()).map_err(|_| {
                CalcError::Config(format!(
                    "{} must be a number, got '{}'",
                    ENV_MAX_INPUT_VALUE, raw
                ))
            })?;
        }
        if let Some(raw) = get(ENV_MAX_EXPONENT) {
            config.max_exponent = parse_positive(ENV_MAX_EXPONENT, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history_size == 0 {
            return Err(CalcError::Config(
                "Maximum history size must be positive".to_string(),
            ));
        }
        if self.precision == 0 {
            return Err(CalcError::Config("Precision must be positive".to_string()));
        }
        if self.max_input_value <= DBig::ZERO {
            return Err(CalcError::Config(
                "Maximum input value must be positive".to_string(),
            ));
        }
        if self.max_exponent == 0 || self.max_exponent > MAX_EXPONENT_LIMIT {
            return Err(CalcError::Config(format!(
                "Maximum exponent must be between 1 and {}",
                MAX_EXPONENT_LIMIT
            )));
        }
        let floor = -(self.max_exponent as isize);
        if order_of_magnitude(&self.max_input_value).is_some_and(|order| order < floor) {
            return Err(CalcError::Config(format!(
                "Maximum input value must be at least 1e-{}",
                self.max_exponent
            )));
        }
        Ok(())
    }

    pub fn numeric_context(&self) -> NumericContext {
        NumericContext {
            precision: self.precision,
            max_exponent: self.max_exponent,
        }
    }

    pub fn history_dir(&self) -> PathBuf {
        self.history_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("history"))
    }

    pub fn history_file(&self) -> PathBuf {
        self.history_dir().join(HISTORY_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("logs"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir().join(LOG_FILE_NAME)
    }
}

fn default_max_input() -> DBig {
    DBig::from_parts(IBig::ONE, 999)
}

fn parse_positive(key: &str, raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CalcError::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CalcError::Config(format!(
            "{} must be true or false, got '{}'",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CalculatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.max_history_size, DEFAULT_MAX_HISTORY_SIZE);
        assert!(config.auto_save);
        assert_eq!(config.precision, DEFAULT_PRECISION);
        assert_eq!(config.max_exponent, DEFAULT_MAX_EXPONENT);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = CalculatorConfig::from_lookup(lookup(&[
            (ENV_BASE_DIR, "/tmp/calc"),
            (ENV_MAX_HISTORY_SIZE, "5"),
            (ENV_AUTO_SAVE, "off"),
            (ENV_PRECISION, "10"),
            (ENV_MAX_INPUT_VALUE, "1000"),
            (ENV_MAX_EXPONENT, "50"),
        ]))
        .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/tmp/calc"));
        assert_eq!(config.max_history_size, 5);
        assert!(!config.auto_save);
        assert_eq!(config.precision, 10);
        assert_eq!(config.max_input_value, DBig::from_str("1000").unwrap());
        assert_eq!(
            config.numeric_context(),
            NumericContext {
                precision: 10,
                max_exponent: 50
            }
        );
        assert_eq!(
            config.history_file(),
            PathBuf::from("/tmp/calc/history/calculator_history.json")
        );
        assert_eq!(config.log_file(), PathBuf::from("/tmp/calc/logs/calculator.log"));
    }

    #[test]
    fn test_explicit_dirs_override_base() {
        let config = CalculatorConfig::from_lookup(lookup(&[
            (ENV_BASE_DIR, "/tmp/calc"),
            (ENV_HISTORY_DIR, "/var/calc"),
        ]))
        .unwrap();
        assert_eq!(config.history_dir(), PathBuf::from("/var/calc"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/calc/logs"));
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let config =
            CalculatorConfig::from_lookup(lookup(&[(ENV_MAX_HISTORY_SIZE, "  ")])).unwrap();
        assert_eq!(config.max_history_size, DEFAULT_MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        for (key, value) in [
            (ENV_MAX_HISTORY_SIZE, "0"),
            (ENV_MAX_HISTORY_SIZE, "-3"),
            (ENV_MAX_HISTORY_SIZE, "lots"),
            (ENV_AUTO_SAVE, "maybe"),
            (ENV_PRECISION, "0"),
            (ENV_MAX_INPUT_VALUE, "big"),
            (ENV_MAX_INPUT_VALUE, "-1"),
            (ENV_MAX_INPUT_VALUE, "1e-5000"),
            (ENV_MAX_EXPONENT, "0"),
            (ENV_MAX_EXPONENT, "1000001"),
        ] {
            let result = CalculatorConfig::from_lookup(lookup(&[(key, value)]));
            assert!(
                matches!(result, Err(CalcError::Config(_))),
                "{}={} should be rejected",
                key,
                value
            );
        }
    }
}
