//! Calculator state
//!
//! The [`Calculator`] owns the history and knows where it is persisted. It
//! computes results without touching the history; callers decide whether to
//! [`record`](Calculator::record) them.

pub mod calculation;
pub mod config;
pub mod history;
pub mod operations;
pub mod storage;

pub use calculation::{Calculation, CalculationRecord};
pub use config::CalculatorConfig;
pub use history::History;
pub use operations::Operation;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dashu::float::DBig;
use log::{debug, info, warn};

use crate::error::{CalcError, Result};

#[derive(Debug)]
pub struct Calculator {
    config: CalculatorConfig,
    history: History,
    history_path: PathBuf,
}

impl Calculator {
    /// Build a calculator from `config`, creating its directories and picking
    /// up any previously saved history.
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;

        for dir in [config.history_dir(), config.log_dir()] {
            fs::create_dir_all(&dir).map_err(|e| {
                CalcError::Storage(format!("Cannot create directory {}: {}", dir.display(), e))
            })?;
        }

        let mut calculator = Self {
            history: History::new(config.max_history_size),
            history_path: config.history_file(),
            config,
        };

        if calculator.history_path.exists() {
            if let Err(e) = calculator.load_history() {
                warn!("Could not load existing history: {}", e);
            }
        }

        info!(
            "Calculator initialized (history: {}, auto-save: {})",
            calculator.history_path.display(),
            calculator.config.auto_save
        );
        Ok(calculator)
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Parse both operands and apply `operation`. History is left alone.
    pub fn perform_operation(
        &self,
        operation: Operation,
        operand1: &str,
        operand2: &str,
    ) -> Result<Calculation> {
        let a = self.parse_operand(operand1)?;
        let b = self.parse_operand(operand2)?;
        let result = operation.apply(&a, &b, self.config.numeric_context())?;

        debug!("{}({}, {}) = {}", operation.command(), a, b, result);
        Ok(Calculation::new(operation, a, b, result))
    }

    /// Append a calculation to the history, saving it if auto-save is on.
    pub fn record(&mut self, calculation: Calculation) {
        info!("Calculation performed: {}", calculation);
        self.history.push(calculation);

        if self.config.auto_save {
            if let Err(e) = self.save_history() {
                warn!("Auto-save failed: {}", e);
            }
        }
    }

    pub fn show_history(&self) -> &[Calculation] {
        self.history.entries()
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo();
        if undone {
            info!("Undid last calculation");
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo();
        if redone {
            info!("Redid last undone calculation");
        }
        redone
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("History cleared");
    }

    pub fn save_history(&self) -> Result<()> {
        storage::save(&self.history_path, self.history.entries())?;
        info!(
            "Saved {} calculations to {}",
            self.history.len(),
            self.history_path.display()
        );
        Ok(())
    }

    /// Replace the in-memory history with the saved one. On failure the
    /// current history is kept as is.
    pub fn load_history(&mut self) -> Result<()> {
        let calculations = storage::load(&self.history_path)?;
        info!(
            "Loaded {} calculations from {}",
            calculations.len(),
            self.history_path.display()
        );
        self.history.replace(calculations);
        Ok(())
    }

    fn parse_operand(&self, raw: &str) -> Result<DBig> {
        let value = DBig::from_str(raw.trim())
            .map_err(|_| CalcError::Validation(format!("Invalid number format: {}", raw.trim())))?;

        let ctx = self.config.numeric_context();
        if !ctx.in_range(&value) {
            return Err(ctx.out_of_range_operand());
        }

        let magnitude = if value < DBig::ZERO { -value.clone() } else { value.clone() };
        if magnitude > self.config.max_input_value {
            return Err(CalcError::Validation(format!(
                "Value exceeds maximum allowed: {}",
                self.config.max_input_value
            )));
        }
        Ok(value)
    }
}
