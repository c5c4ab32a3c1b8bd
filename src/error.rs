//! Error types for the calculator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    /// Bad operand or a domain violation such as division by zero.
    #[error("{0}")]
    Validation(String),

    /// The operator itself failed on otherwise valid operands.
    #[error("{0}")]
    Operation(String),

    #[error("{0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl CalcError {
    /// Validation and operation failures are the ones a user can fix by
    /// retyping the operands.
    pub fn is_known(&self) -> bool {
        matches!(self, CalcError::Validation(_) | CalcError::Operation(_))
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
