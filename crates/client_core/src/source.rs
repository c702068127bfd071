//! Remote collaborators the quiz depends on: where questions come from and
//! who decides whether an answer is right.

use async_trait::async_trait;
use shared::{
    domain::{CategoryId, Difficulty},
    protocol::{TriviaCategory, TriviaQuestion},
};

use crate::error::ClientError;

/// Filter and size of one question batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionRequest {
    pub amount: u32,
    pub category: CategoryId,
    pub difficulty: Difficulty,
}

/// The (token, instant, answer) triple the validator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub token: String,
    pub instant: String,
    pub answer: String,
}

#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<TriviaCategory>, ClientError>;
    async fn fetch_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<TriviaQuestion>, ClientError>;
}

#[async_trait]
pub trait AnswerValidator: Send + Sync {
    async fn validate(&self, submission: &AnswerSubmission) -> Result<bool, ClientError>;
}
