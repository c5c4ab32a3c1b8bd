//! Calcrepl - an interactive decimal calculator
//!
//! Calcrepl reads commands from a line editor, applies binary arithmetic
//! operators to arbitrary-precision decimals, and keeps a bounded history
//! with undo/redo that can be saved to and loaded from disk.
//!
//! # Example
//!
//! ```no_run
//! use calcrepl::{Calculator, CalculatorConfig, Operation};
//!
//! let mut calc = Calculator::new(CalculatorConfig::with_base_dir("/tmp/calc")).unwrap();
//! let calculation = calc.perform_operation(Operation::Divide, "7", "2").unwrap();
//! println!("{}", calculation);
//! calc.record(calculation);
//! ```

pub mod calculator;
pub mod cli;
pub mod error;
pub mod repl;

pub use calculator::{Calculation, Calculator, CalculatorConfig, History, Operation};
pub use error::{CalcError, Result};
pub use repl::{calculator_repl, LineSource, Repl, ScriptedInput};
