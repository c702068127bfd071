use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{
    categories_route, questions_route, validate_route, CategoryListResponse, QuestionBatch,
    QuestionQuery, TriviaCategory, TriviaQuestion, ValidateQuery,
};
use tracing::debug;
use url::Url;

use crate::{
    error::ClientError,
    source::{AnswerSubmission, AnswerValidator, QuestionRequest, QuestionSource},
};

/// Talks to the trivia backend over HTTP. One instance serves as both the
/// question source and the answer validator.
#[derive(Debug, Clone)]
pub struct HttpTriviaClient {
    http: Client,
    server_url: String,
}

impl HttpTriviaClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            server_url: normalize_server_url(server_url)?,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

fn normalize_server_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|source| ClientError::InvalidServerUrl {
        raw: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::UnsupportedScheme(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[async_trait]
impl QuestionSource for HttpTriviaClient {
    async fn fetch_categories(&self) -> Result<Vec<TriviaCategory>, ClientError> {
        let response: CategoryListResponse = self
            .http
            .get(format!("{}{}", self.server_url, categories_route()))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(
            count = response.trivia_categories.len(),
            "fetched trivia categories"
        );
        Ok(response.trivia_categories)
    }

    async fn fetch_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<TriviaQuestion>, ClientError> {
        let query = QuestionQuery::new(request.amount, request.category, request.difficulty);
        let batch: QuestionBatch = self
            .http
            .get(format!("{}{}", self.server_url, questions_route()))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(
            amount = request.amount,
            category = request.category.0,
            difficulty = %request.difficulty,
            received = batch.questions.len(),
            "fetched question batch"
        );
        Ok(batch.questions)
    }
}

#[async_trait]
impl AnswerValidator for HttpTriviaClient {
    async fn validate(&self, submission: &AnswerSubmission) -> Result<bool, ClientError> {
        let query = ValidateQuery {
            token: submission.token.clone(),
            instant: submission.instant.clone(),
            answer: submission.answer.clone(),
        };
        let correct: bool = self
            .http
            .get(format!("{}{}", self.server_url, validate_route()))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(correct, "answer validated");
        Ok(correct)
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
