//! Line input for the REPL

use std::collections::VecDeque;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Anything the REPL can read lines from.
///
/// `Interrupted` and `Eof` errors carry meaning: the first cancels the
/// current input, the second ends the session.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError>;

    /// Offer a line for recall. Sources without recall ignore it.
    fn remember(&mut self, _line: &str) {}
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.readline(prompt)
    }

    fn remember(&mut self, line: &str) {
        let _ = self.add_history_entry(line);
    }
}

/// A fixed script of inputs, ending in `Eof` once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    items: VecDeque<Result<String, ReadlineError>>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: lines.into_iter().map(|l| Ok(l.into())).collect(),
        }
    }

    pub fn push_line(mut self, line: impl Into<String>) -> Self {
        self.items.push_back(Ok(line.into()));
        self
    }

    pub fn push_error(mut self, error: ReadlineError) -> Self {
        self.items.push_back(Err(error));
        self
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<String, ReadlineError> {
        self.items.pop_front().unwrap_or(Err(ReadlineError::Eof))
    }
}
