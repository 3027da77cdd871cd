// First-run input. The resolver asks for values through `Prompter` so the
// terminal can be swapped for scripted answers in tests.

use crate::error::FiledropError;
use dialoguer::{Input, Password};

pub trait Prompter {
    /// Show a message without expecting an answer.
    fn say(&mut self, message: &str);

    /// Read one plain line of input.
    fn ask(&mut self, label: &str) -> Result<String, FiledropError>;

    /// Read a value that should not be echoed.
    fn ask_secret(&mut self, label: &str) -> Result<String, FiledropError>;
}

/// Interactive prompts on the controlling terminal using `dialoguer`.
#[derive(Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn say(&mut self, message: &str) {
        println!("{}", message);
    }

    fn ask(&mut self, label: &str) -> Result<String, FiledropError> {
        // `allow_empty` keeps parity with a bare line read: enter skips the value.
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| prompt_error(label, e))
    }

    fn ask_secret(&mut self, label: &str) -> Result<String, FiledropError> {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| prompt_error(label, e))
    }
}

fn prompt_error(label: &str, err: impl ToString) -> FiledropError {
    FiledropError::Prompt {
        field: label.to_string(),
        message: err.to_string(),
    }
}
