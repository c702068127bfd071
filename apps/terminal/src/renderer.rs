//! Plain-text projection of quiz display updates.

use std::io::{self, Write};

use client_core::{
    CategoryEntry, DisplayUpdate, QuestionView, Renderer, Verdict, WELCOME_PROMPT, WELCOME_TITLE,
};
use shared::domain::CategoryId;
use tracing::warn;

pub const HELP: &str = "\
commands:
  start | s            fetch questions and begin
  <n>                  answer with option n
  next | n             move on once the answer is marked
  d <difficulty>       all, easy, medium or hard
  c <id>               category id from the list (0 for all)
  categories           show the category list again
  reset | r            back to the settings screen
  help | ?             this text
  quit | q             leave";

pub struct TerminalRenderer<W: Write> {
    out: W,
    categories: Vec<CategoryEntry>,
    current: Option<QuestionView>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            categories: vec![CategoryEntry::all()],
            current: None,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn help(&mut self) {
        if let Err(error) = writeln!(self.out, "{HELP}").and_then(|()| self.out.flush()) {
            warn!(%error, "failed to write help");
        }
    }

    pub fn notice(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(%error, "failed to write notice");
        }
    }

    fn category_label(&self, id: CategoryId) -> String {
        self.categories
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.label.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    fn write_update(&mut self, update: &DisplayUpdate) -> io::Result<()> {
        match update {
            DisplayUpdate::Welcome => {
                self.current = None;
                writeln!(self.out, "\n== {WELCOME_TITLE} ==\n{WELCOME_PROMPT}")?;
            }
            DisplayUpdate::Categories { entries, active } => {
                self.categories = entries.clone();
                writeln!(self.out, "categories:")?;
                for entry in entries {
                    let marker = if entry.id == *active { '*' } else { ' ' };
                    writeln!(self.out, "  [{marker}] {:>3}  {}", entry.id.0, entry.label)?;
                }
            }
            DisplayUpdate::DifficultyHighlighted(difficulty) => {
                writeln!(self.out, "difficulty: {difficulty}")?;
            }
            DisplayUpdate::CategoryHighlighted(id) => {
                let label = self.category_label(*id);
                writeln!(self.out, "category: {label}")?;
            }
            DisplayUpdate::ControlsLocked(true) => {
                writeln!(self.out, "loading questions...")?;
            }
            DisplayUpdate::ControlsLocked(false) => {}
            DisplayUpdate::Question(view) => {
                writeln!(
                    self.out,
                    "\nQuestion {} [{} | {}]\n{}",
                    view.position + 1,
                    view.category,
                    view.difficulty,
                    view.text
                )?;
                for (index, answer) in view.answers.iter().enumerate() {
                    writeln!(self.out, "  {}) {answer}", index + 1)?;
                }
                self.current = Some(view.clone());
            }
            DisplayUpdate::AnswerMarked { index, verdict } => {
                let answer = self
                    .current
                    .as_ref()
                    .and_then(|view| view.answers.get(*index))
                    .map(String::as_str)
                    .unwrap_or("?");
                let verdict = match verdict {
                    Verdict::Correct => "correct!",
                    Verdict::Incorrect => "incorrect",
                };
                writeln!(self.out, "  {}) {answer} - {verdict}", index + 1)?;
            }
            DisplayUpdate::Message(text) => {
                writeln!(self.out, "{text}")?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, update: &DisplayUpdate) {
        if let Err(error) = self.write_update(update) {
            warn!(%error, "failed to write to terminal");
        }
    }
}

#[cfg(test)]
#[path = "tests/renderer_tests.rs"]
mod tests;
