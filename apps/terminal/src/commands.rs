//! Typed commands read from stdin and their mapping onto quiz events.

use std::{io::Write, ops::ControlFlow, str::FromStr};

use client_core::QuizController;
use shared::domain::{CategoryId, Difficulty, UnknownDifficulty};
use thiserror::Error;

use crate::renderer::TerminalRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    Start,
    /// Zero-based answer control index.
    Answer(usize),
    Next,
    Difficulty(Difficulty),
    Category(CategoryId),
    Categories,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("answers are numbered from 1, got '{0}'")]
    InvalidAnswer(String),
    #[error("invalid category id '{0}'")]
    InvalidCategory(String),
    #[error(transparent)]
    InvalidDifficulty(#[from] UnknownDifficulty),
}

impl FromStr for QuizCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let head = head.to_ascii_lowercase();
        let arg = words.next();

        if head.chars().all(|c| c.is_ascii_digit()) {
            return match head.parse::<usize>() {
                Ok(number) if number > 0 => Ok(QuizCommand::Answer(number - 1)),
                _ => Err(CommandError::InvalidAnswer(head)),
            };
        }

        match head.as_str() {
            "start" | "s" => Ok(QuizCommand::Start),
            "next" | "n" => Ok(QuizCommand::Next),
            "reset" | "r" => Ok(QuizCommand::Reset),
            "categories" | "list" => Ok(QuizCommand::Categories),
            "help" | "?" => Ok(QuizCommand::Help),
            "quit" | "q" | "exit" => Ok(QuizCommand::Quit),
            "difficulty" | "d" => {
                let raw = arg.ok_or(CommandError::MissingArgument("difficulty"))?;
                Ok(QuizCommand::Difficulty(raw.parse()?))
            }
            "category" | "c" => {
                let raw = arg.ok_or(CommandError::MissingArgument("category"))?;
                raw.parse::<i64>()
                    .ok()
                    .filter(|id| *id >= 0)
                    .map(|id| QuizCommand::Category(CategoryId(id)))
                    .ok_or_else(|| CommandError::InvalidCategory(raw.to_string()))
            }
            _ => Err(CommandError::Unknown(head)),
        }
    }
}

/// Applies one command. Breaks when the user asked to quit.
pub async fn dispatch<W: Write>(
    quiz: &mut QuizController<TerminalRenderer<W>>,
    command: QuizCommand,
) -> ControlFlow<()> {
    match command {
        QuizCommand::Start => quiz.start().await,
        QuizCommand::Answer(index) => quiz.select_answer(index).await,
        QuizCommand::Next => quiz.advance().await,
        QuizCommand::Difficulty(difficulty) => quiz.set_difficulty(difficulty),
        QuizCommand::Category(category) => quiz.set_category(category),
        QuizCommand::Categories => quiz.load_categories().await,
        QuizCommand::Reset => quiz.reset(),
        QuizCommand::Help => quiz.renderer_mut().help(),
        QuizCommand::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
