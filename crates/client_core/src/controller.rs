use std::sync::Arc;

use shared::domain::{CategoryId, Difficulty};
use tracing::error;

use crate::{
    machine::{Effect, QuizMachine, QuizPhase, Session, Transition},
    source::{AnswerValidator, QuestionSource},
    view::Renderer,
};

/// Drives a [`QuizMachine`]: renders its display updates, performs its
/// effects against the remote collaborators and feeds the results back.
///
/// Transport failures are logged and swallowed. The machine then stays in
/// `Loading` or `Validating` until `reset`; there is no retry.
pub struct QuizController<R: Renderer> {
    machine: QuizMachine,
    source: Arc<dyn QuestionSource>,
    validator: Arc<dyn AnswerValidator>,
    renderer: R,
}

impl<R: Renderer> QuizController<R> {
    pub fn new(
        source: Arc<dyn QuestionSource>,
        validator: Arc<dyn AnswerValidator>,
        renderer: R,
    ) -> Self {
        Self::with_machine(QuizMachine::default(), source, validator, renderer)
    }

    pub fn with_machine(
        machine: QuizMachine,
        source: Arc<dyn QuestionSource>,
        validator: Arc<dyn AnswerValidator>,
        renderer: R,
    ) -> Self {
        Self {
            machine,
            source,
            validator,
            renderer,
        }
    }

    pub fn machine(&self) -> &QuizMachine {
        &self.machine
    }

    pub fn phase(&self) -> QuizPhase {
        self.machine.phase()
    }

    pub fn session(&self) -> &Session {
        self.machine.session()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Fetches the category list and shows it with "All" prepended. On
    /// failure only "All" is shown.
    pub async fn load_categories(&mut self) {
        let categories = match self.source.fetch_categories().await {
            Ok(categories) => categories,
            Err(error) => {
                error!(%error, "failed to fetch categories");
                Vec::new()
            }
        };
        let transition = self.machine.categories_loaded(&categories);
        self.drive(transition).await;
    }

    pub async fn start(&mut self) {
        let transition = self.machine.start();
        self.drive(transition).await;
    }

    pub async fn select_answer(&mut self, answer_index: usize) {
        let transition = self.machine.select_answer(answer_index);
        self.drive(transition).await;
    }

    pub async fn advance(&mut self) {
        let transition = self.machine.advance();
        self.drive(transition).await;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        let transition = self.machine.set_difficulty(difficulty);
        self.render(&transition);
    }

    pub fn set_category(&mut self, category: CategoryId) {
        let transition = self.machine.set_category(category);
        self.render(&transition);
    }

    pub fn reset(&mut self) {
        let transition = self.machine.reset();
        self.render(&transition);
    }

    async fn drive(&mut self, transition: Transition) {
        let mut next = Some(transition);
        while let Some(transition) = next.take() {
            self.render(&transition);
            if let Some(effect) = transition.effect {
                next = self.perform(effect).await;
            }
        }
    }

    async fn perform(&mut self, effect: Effect) -> Option<Transition> {
        match effect {
            Effect::FetchQuestions(request) => {
                match self.source.fetch_questions(&request).await {
                    Ok(batch) => Some(self.machine.questions_loaded(batch)),
                    Err(error) => {
                        error!(
                            %error,
                            category = request.category.0,
                            difficulty = %request.difficulty,
                            "failed to fetch questions"
                        );
                        None
                    }
                }
            }
            Effect::ValidateAnswer {
                question_index,
                answer_index,
                submission,
            } => match self.validator.validate(&submission).await {
                Ok(correct) => Some(self.machine.answer_validated(
                    question_index,
                    answer_index,
                    correct,
                )),
                Err(error) => {
                    error!(%error, question_index, answer_index, "failed to validate answer");
                    None
                }
            },
        }
    }

    fn render(&mut self, transition: &Transition) {
        for update in &transition.updates {
            self.renderer.render(update);
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
