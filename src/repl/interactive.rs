//! Interactive REPL implementation

use std::io::Write;

use log::{debug, error};
use rustyline::error::ReadlineError;

use super::input::LineSource;
use crate::calculator::{Calculator, Operation};
use crate::error::{CalcError, Result};

const PROMPT: &str = "\nEnter command: ";

enum Flow {
    Continue,
    Exit,
}

/// Build the calculator with `build` and run the REPL until the user leaves.
///
/// A failure to build the calculator is printed as a fatal error and
/// returned; nothing else ends the loop with an error except a broken output
/// stream.
pub fn calculator_repl<F, L, W>(build: F, input: L, mut out: W) -> Result<()>
where
    F: FnOnce() -> Result<Calculator>,
    L: LineSource,
    W: Write,
{
    let calculator = match build() {
        Ok(calculator) => calculator,
        Err(e) => {
            error!("Fatal error: {}", e);
            writeln!(out, "Fatal error: {}", e)?;
            return Err(e);
        }
    };

    writeln!(out, "Calculator started. Type 'help' for commands.")?;
    Repl::new(calculator, input, out).run()
}

pub struct Repl<L, W> {
    calculator: Calculator,
    input: L,
    out: W,
}

impl<L: LineSource, W: Write> Repl<L, W> {
    pub fn new(calculator: Calculator, input: L, out: W) -> Self {
        Self {
            calculator,
            input,
            out,
        }
    }

    /// Read and execute commands until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(CalcError::Readline(ReadlineError::Interrupted)) => {
                    writeln!(self.out, "\nOperation cancelled")?;
                }
                Err(CalcError::Readline(ReadlineError::Eof)) => {
                    writeln!(self.out, "\nInput terminated. Exiting...")?;
                    return Ok(());
                }
                Err(CalcError::Io(e)) => return Err(CalcError::Io(e)),
                Err(e) if e.is_known() => writeln!(self.out, "Error: {}", e)?,
                Err(e) => writeln!(self.out, "Unexpected error: {}", e)?,
            }
        }
    }

    fn step(&mut self) -> Result<Flow> {
        let line = self.input.read_line(PROMPT)?;
        let command = line.trim().to_lowercase();
        if command.is_empty() {
            return Ok(Flow::Continue);
        }
        self.input.remember(line.trim());
        debug!("Dispatching command '{}'", command);

        match command.as_str() {
            "help" => self.print_help()?,
            "exit" => {
                match self.calculator.save_history() {
                    Ok(()) => writeln!(self.out, "History saved successfully.")?,
                    Err(e) => writeln!(self.out, "Warning: Could not save history: {}", e)?,
                }
                writeln!(self.out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
            "history" => {
                let history = self.calculator.show_history();
                if history.is_empty() {
                    writeln!(self.out, "No calculations in history")?;
                } else {
                    writeln!(self.out, "\nCalculation History:")?;
                    for (i, calculation) in history.iter().enumerate() {
                        writeln!(self.out, "{}. {}", i + 1, calculation)?;
                    }
                }
            }
            "clear" => {
                self.calculator.clear_history();
                writeln!(self.out, "History cleared")?;
            }
            "undo" => {
                if self.calculator.undo() {
                    writeln!(self.out, "Operation undone")?;
                } else {
                    writeln!(self.out, "Nothing to undo")?;
                }
            }
            "redo" => {
                if self.calculator.redo() {
                    writeln!(self.out, "Operation redone")?;
                } else {
                    writeln!(self.out, "Nothing to redo")?;
                }
            }
            "save" => match self.calculator.save_history() {
                Ok(()) => writeln!(self.out, "History saved successfully")?,
                Err(e) => writeln!(self.out, "Error saving history: {}", e)?,
            },
            "load" => match self.calculator.load_history() {
                Ok(()) => writeln!(self.out, "History loaded successfully")?,
                Err(e) => writeln!(self.out, "Error loading history: {}", e)?,
            },
            other => match Operation::from_command(other) {
                Some(operation) => self.operation(operation)?,
                None => writeln!(self.out, "Unknown command: '{}'", other)?,
            },
        }

        Ok(Flow::Continue)
    }

    /// Prompt for two operands and apply `operation`. Read errors propagate so
    /// the main loop handles interrupts and end of input the same everywhere.
    fn operation(&mut self, operation: Operation) -> Result<()> {
        writeln!(self.out, "\nEnter numbers (or 'cancel' to abort):")?;

        let Some(a) = self.operand("First number: ")? else {
            return Ok(());
        };
        let Some(b) = self.operand("Second number: ")? else {
            return Ok(());
        };

        match self.calculator.perform_operation(operation, &a, &b) {
            Ok(calculation) => {
                writeln!(self.out, "\nResult: {}", calculation.result())?;
                self.calculator.record(calculation);
            }
            Err(e) if e.is_known() => writeln!(self.out, "Error: {}", e)?,
            Err(CalcError::Io(e)) => return Err(CalcError::Io(e)),
            Err(e) => writeln!(self.out, "Unexpected error: {}", e)?,
        }
        Ok(())
    }

    /// `None` when the user typed `cancel`.
    fn operand(&mut self, prompt: &str) -> Result<Option<String>> {
        let raw = self.input.read_line(prompt)?;
        if raw.trim().eq_ignore_ascii_case("cancel") {
            writeln!(self.out, "Operation cancelled")?;
            return Ok(None);
        }
        Ok(Some(raw))
    }

    fn print_help(&mut self) -> Result<()> {
        writeln!(self.out, "\nAvailable commands:")?;
        let names: Vec<&str> = Operation::ALL.iter().map(|op| op.command()).collect();
        writeln!(self.out, "  {} - Perform calculations", names.join(", "))?;
        writeln!(
            self.out,
            r#"  history - Show calculation history
  clear - Clear calculation history
  undo - Undo the last calculation
  redo - Redo the last undone calculation
  save - Save calculation history to file
  load - Load calculation history from file
  exit - Exit the calculator"#
        )?;
        Ok(())
    }
}
