//! REPL module for interactive mode

pub mod input;
pub mod interactive;

pub use input::{LineSource, ScriptedInput};
pub use interactive::{calculator_repl, Repl};
