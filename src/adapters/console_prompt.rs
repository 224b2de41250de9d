use std::io::ErrorKind;

use dialoguer::{Error as DialoguerError, Input};

use crate::domain::{AppError, PromptReply};
use crate::ports::PromptIo;

/// Interactive console backed by dialoguer. Typing `help`, `prev`,
/// `defaults` or `save` at any prompt triggers the matching control reply.
#[derive(Debug, Clone, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

impl PromptIo for ConsolePrompt {
    fn ask(&mut self, prompt: &str, current: Option<&str>) -> Result<PromptReply, AppError> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(value) = current {
            input = input.with_initial_text(value.to_string());
        }
        match input.interact_text() {
            Ok(raw) => Ok(PromptReply::from_raw(&raw)),
            Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => {
                Err(AppError::Interrupted)
            }
            Err(err) => Err(AppError::PromptIo(err.to_string())),
        }
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }
}
