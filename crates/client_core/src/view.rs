//! What the quiz wants shown, independent of any UI toolkit.

use shared::{
    domain::{CategoryId, Difficulty},
    protocol::{TriviaCategory, TriviaQuestion},
};

use crate::text::{category_label, decode_html_entities};

pub const WELCOME_TITLE: &str = "Trivia Questions";
pub const WELCOME_PROMPT: &str = "Select your settings and then start!";
pub const NO_QUESTIONS_MESSAGE: &str = "No questions available for these settings.";
pub const ALL_CATEGORIES_LABEL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl From<bool> for Verdict {
    fn from(correct: bool) -> Self {
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub label: String,
}

impl CategoryEntry {
    pub fn all() -> Self {
        Self {
            id: CategoryId::ALL,
            label: ALL_CATEGORIES_LABEL.to_string(),
        }
    }
}

impl From<&TriviaCategory> for CategoryEntry {
    fn from(category: &TriviaCategory) -> Self {
        Self {
            id: category.id,
            label: category_label(&category.name).to_string(),
        }
    }
}

/// Category list as displayed: the synthetic "All" entry first, then the
/// server's categories in the order received.
pub fn category_entries(categories: &[TriviaCategory]) -> Vec<CategoryEntry> {
    std::iter::once(CategoryEntry::all())
        .chain(categories.iter().map(CategoryEntry::from))
        .collect()
}

/// A question ready for display. Answer controls are addressed by their
/// position in `answers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub position: usize,
    pub category: String,
    pub difficulty: String,
    pub text: String,
    pub answers: Vec<String>,
}

impl QuestionView {
    pub fn from_question(position: usize, question: &TriviaQuestion) -> Self {
        Self {
            position,
            category: decode_html_entities(&question.category),
            difficulty: decode_html_entities(&question.difficulty),
            text: decode_html_entities(&question.question),
            answers: question
                .answers
                .iter()
                .map(|answer| decode_html_entities(answer))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// Initial "select your settings" screen.
    Welcome,
    Categories {
        entries: Vec<CategoryEntry>,
        active: CategoryId,
    },
    DifficultyHighlighted(Difficulty),
    CategoryHighlighted(CategoryId),
    /// Selection and start controls are locked while a quiz runs.
    ControlsLocked(bool),
    Question(QuestionView),
    AnswerMarked {
        index: usize,
        verdict: Verdict,
    },
    Message(String),
}

/// A display surface the quiz projects onto.
pub trait Renderer {
    fn render(&mut self, update: &DisplayUpdate);
}
