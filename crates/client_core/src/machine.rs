//! Quiz progression state machine.
//!
//! `QuizMachine` is synchronous and performs no I/O. Every event returns a
//! [`Transition`]: the display updates to apply plus at most one [`Effect`]
//! the caller must perform and report back (`questions_loaded`,
//! `answer_validated`).

use shared::{
    domain::{CategoryId, Difficulty},
    protocol::{TriviaCategory, TriviaQuestion, QUESTION_BATCH_SIZE},
};
use tracing::{debug, info, warn};

use crate::{
    source::{AnswerSubmission, QuestionRequest},
    view::{
        category_entries, CategoryEntry, DisplayUpdate, QuestionView, Verdict,
        NO_QUESTIONS_MESSAGE,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Loading,
    Presenting,
    Validating,
    Answered,
    NoContent,
}

/// Selections plus the queue of fetched questions.
///
/// Invariant: `current_index <= queue.len()`. The index equals the length
/// only between exhausting a batch and receiving the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub difficulty: Difficulty,
    pub category: CategoryId,
    queue: Vec<TriviaQuestion>,
    current_index: usize,
}

impl Session {
    pub fn queue(&self) -> &[TriviaQuestion] {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&TriviaQuestion> {
        self.queue.get(self.current_index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.queue.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchQuestions(QuestionRequest),
    ValidateAnswer {
        question_index: usize,
        answer_index: usize,
        submission: AnswerSubmission,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub updates: Vec<DisplayUpdate>,
    pub effect: Option<Effect>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    fn show(update: DisplayUpdate) -> Self {
        Self {
            updates: vec![update],
            effect: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.updates.is_empty() && self.effect.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct QuizMachine {
    phase: QuizPhase,
    session: Session,
    batch_size: u32,
    categories: Vec<CategoryEntry>,
    /// Terminal mark per answer control of the current question.
    marks: Vec<Option<Verdict>>,
    /// Control whose answer has been submitted for the current question.
    locked_answer: Option<usize>,
}

impl Default for QuizMachine {
    fn default() -> Self {
        Self::new(QUESTION_BATCH_SIZE)
    }
}

impl QuizMachine {
    pub fn new(batch_size: u32) -> Self {
        Self {
            phase: QuizPhase::Idle,
            session: Session::default(),
            batch_size,
            categories: vec![CategoryEntry::all()],
            marks: Vec::new(),
            locked_answer: None,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    pub fn categories(&self) -> &[CategoryEntry] {
        &self.categories
    }

    pub fn marks(&self) -> &[Option<Verdict>] {
        &self.marks
    }

    pub fn categories_loaded(&mut self, categories: &[TriviaCategory]) -> Transition {
        self.categories = category_entries(categories);
        Transition::show(DisplayUpdate::Categories {
            entries: self.categories.clone(),
            active: self.session.category,
        })
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Transition {
        if self.phase != QuizPhase::Idle {
            debug!(
                %difficulty,
                phase = ?self.phase,
                "difficulty changed mid-session; applies to next fetch"
            );
        }
        self.session.difficulty = difficulty;
        Transition::show(DisplayUpdate::DifficultyHighlighted(difficulty))
    }

    pub fn set_category(&mut self, category: CategoryId) -> Transition {
        if self.phase != QuizPhase::Idle {
            debug!(
                category = category.0,
                phase = ?self.phase,
                "category changed mid-session; applies to next fetch"
            );
        }
        self.session.category = category;
        Transition::show(DisplayUpdate::CategoryHighlighted(category))
    }

    pub fn start(&mut self) -> Transition {
        if self.phase != QuizPhase::Idle {
            debug!(phase = ?self.phase, "start ignored outside idle");
            return Transition::none();
        }
        info!(
            difficulty = %self.session.difficulty,
            category = self.session.category.0,
            "starting quiz"
        );
        self.phase = QuizPhase::Loading;
        Transition {
            updates: vec![DisplayUpdate::ControlsLocked(true)],
            effect: Some(Effect::FetchQuestions(self.question_request())),
        }
    }

    /// Applies a fetched batch. Only meaningful while `Loading`; batches that
    /// arrive after a reset are dropped.
    ///
    /// `Loading` is only entered with an exhausted queue, so a batch always
    /// replaces the queue. The append branch is unreachable today.
    pub fn questions_loaded(&mut self, batch: Vec<TriviaQuestion>) -> Transition {
        if self.phase != QuizPhase::Loading {
            debug!(phase = ?self.phase, received = batch.len(), "dropping question batch");
            return Transition::none();
        }

        if batch.is_empty() {
            self.phase = QuizPhase::NoContent;
            return Transition::show(DisplayUpdate::Message(NO_QUESTIONS_MESSAGE.to_string()));
        }

        if self.session.is_exhausted() {
            self.session.queue = batch;
            self.session.current_index = 0;
        } else {
            self.session.queue.extend(batch);
        }

        Transition::show(self.present_current())
    }

    pub fn select_answer(&mut self, answer_index: usize) -> Transition {
        if self.phase != QuizPhase::Presenting {
            debug!(answer_index, phase = ?self.phase, "answer ignored");
            return Transition::none();
        }
        if self.locked_answer.is_some()
            || self.marks.get(answer_index).copied().flatten().is_some()
        {
            debug!(answer_index, "question already answered");
            return Transition::none();
        }

        let question_index = self.session.current_index;
        let Some(question) = self.session.queue.get(question_index) else {
            warn!(question_index, "no question at current index");
            return Transition::none();
        };
        let Some(answer) = question.answers.get(answer_index) else {
            debug!(
                answer_index,
                answers = question.answers.len(),
                "answer index out of range"
            );
            return Transition::none();
        };

        let submission = AnswerSubmission {
            token: question.token.clone(),
            instant: question.instant.clone(),
            answer: answer.clone(),
        };
        self.locked_answer = Some(answer_index);
        self.phase = QuizPhase::Validating;
        Transition {
            updates: Vec::new(),
            effect: Some(Effect::ValidateAnswer {
                question_index,
                answer_index,
                submission,
            }),
        }
    }

    /// Applies the validator's verdict to exactly one answer control.
    pub fn answer_validated(
        &mut self,
        question_index: usize,
        answer_index: usize,
        correct: bool,
    ) -> Transition {
        if self.phase != QuizPhase::Validating
            || question_index != self.session.current_index
            || self.locked_answer != Some(answer_index)
        {
            debug!(
                question_index,
                answer_index,
                phase = ?self.phase,
                "dropping stale verdict"
            );
            return Transition::none();
        }
        let Some(mark) = self.marks.get_mut(answer_index) else {
            return Transition::none();
        };
        if mark.is_some() {
            return Transition::none();
        }

        let verdict = Verdict::from(correct);
        *mark = Some(verdict);
        self.phase = QuizPhase::Answered;
        Transition::show(DisplayUpdate::AnswerMarked {
            index: answer_index,
            verdict,
        })
    }

    pub fn advance(&mut self) -> Transition {
        if self.phase != QuizPhase::Answered {
            debug!(phase = ?self.phase, "advance ignored until the current answer is marked");
            return Transition::none();
        }

        self.session.current_index += 1;
        if self.session.is_exhausted() {
            self.phase = QuizPhase::Loading;
            self.clear_marks();
            return Transition {
                updates: Vec::new(),
                effect: Some(Effect::FetchQuestions(self.question_request())),
            };
        }

        Transition::show(self.present_current())
    }

    pub fn reset(&mut self) -> Transition {
        info!(phase = ?self.phase, "resetting quiz");
        self.phase = QuizPhase::Idle;
        self.session = Session::default();
        self.clear_marks();
        Transition {
            updates: vec![
                DisplayUpdate::ControlsLocked(false),
                DisplayUpdate::DifficultyHighlighted(self.session.difficulty),
                DisplayUpdate::CategoryHighlighted(self.session.category),
                DisplayUpdate::Welcome,
            ],
            effect: None,
        }
    }

    fn question_request(&self) -> QuestionRequest {
        QuestionRequest {
            amount: self.batch_size,
            category: self.session.category,
            difficulty: self.session.difficulty,
        }
    }

    fn present_current(&mut self) -> DisplayUpdate {
        let position = self.session.current_index;
        let view = match self.session.queue.get(position) {
            Some(question) => QuestionView::from_question(position, question),
            None => {
                warn!(position, "presenting past the end of the queue");
                return DisplayUpdate::Message(NO_QUESTIONS_MESSAGE.to_string());
            }
        };
        self.phase = QuizPhase::Presenting;
        self.marks = vec![None; view.answers.len()];
        self.locked_answer = None;
        DisplayUpdate::Question(view)
    }

    fn clear_marks(&mut self) {
        self.marks.clear();
        self.locked_answer = None;
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
