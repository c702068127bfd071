//! Client for the Open Trivia Database.
//!
//! Question requests carry an upstream session token so OpenTDB does not
//! repeat questions. One token is shared by the whole process and renewed
//! once it is older than the configured TTL.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::{
    domain::{CategoryId, Difficulty},
    protocol::CategoryListResponse,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const RESPONSE_OK: i32 = 0;
const RESPONSE_NO_RESULTS: i32 = 1;
const RESPONSE_TOKEN_NOT_FOUND: i32 = 3;
const RESPONSE_TOKEN_EMPTY: i32 = 4;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("trivia api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("trivia api answered with response code {0}")]
    ResponseCode(i32),
    #[error("trivia api issued no session token")]
    MissingToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamQuestion {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    response_code: i32,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionResponse {
    response_code: i32,
    #[serde(default)]
    results: Vec<UpstreamQuestion>,
}

#[derive(Debug, Clone)]
struct SessionToken {
    value: String,
    issued_at: DateTime<Utc>,
}

pub struct OpenTdbClient {
    http: Client,
    base_url: String,
    token_ttl: Duration,
    token: Mutex<Option<SessionToken>>,
}

impl OpenTdbClient {
    pub fn new(base_url: &str, token_ttl: Duration) -> Self {
        Self::with_client(Client::new(), base_url, token_ttl)
    }

    pub fn with_client(http: Client, base_url: &str, token_ttl: Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_ttl,
            token: Mutex::new(None),
        }
    }

    pub async fn fetch_categories(&self) -> Result<CategoryListResponse, UpstreamError> {
        let categories: CategoryListResponse = self
            .http
            .get(format!("{}/api_category.php", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(
            count = categories.trivia_categories.len(),
            "fetched upstream categories"
        );
        Ok(categories)
    }

    /// Returns the cached session token, requesting a new one when none is
    /// held or the held one has reached the TTL.
    pub async fn session_token(&self) -> Result<String, UpstreamError> {
        let mut held = self.token.lock().await;
        if let Some(token) = held.as_ref() {
            if Utc::now() - token.issued_at < self.token_ttl {
                return Ok(token.value.clone());
            }
        }

        let response: TokenResponse = self
            .http
            .get(format!("{}/api_token.php", self.base_url))
            .query(&[("command", "request")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.response_code != RESPONSE_OK {
            return Err(UpstreamError::ResponseCode(response.response_code));
        }
        let value = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or(UpstreamError::MissingToken)?;

        info!("obtained new upstream session token");
        *held = Some(SessionToken {
            value: value.clone(),
            issued_at: Utc::now(),
        });
        Ok(value)
    }

    pub async fn fetch_questions(
        &self,
        amount: u32,
        category: CategoryId,
        difficulty: Difficulty,
    ) -> Result<Vec<UpstreamQuestion>, UpstreamError> {
        let token = self.session_token().await?;

        let mut query = vec![("amount", amount.to_string()), ("token", token)];
        if !category.is_all() {
            query.push(("category", category.to_string()));
        }
        if difficulty != Difficulty::All {
            query.push(("difficulty", difficulty.query_value().to_string()));
        }

        let response: QuestionResponse = self
            .http
            .get(format!("{}/api.php", self.base_url))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response.response_code {
            RESPONSE_OK | RESPONSE_NO_RESULTS => Ok(response.results),
            code @ (RESPONSE_TOKEN_NOT_FOUND | RESPONSE_TOKEN_EMPTY) => {
                warn!(code, "upstream session token rejected; dropping it");
                self.forget_token().await;
                Ok(Vec::new())
            }
            code => Err(UpstreamError::ResponseCode(code)),
        }
    }

    pub async fn forget_token(&self) {
        self.token.lock().await.take();
    }
}

#[cfg(test)]
#[path = "tests/opentdb_tests.rs"]
mod tests;
