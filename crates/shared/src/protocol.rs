use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{CategoryId, Difficulty};

/// Number of questions the client requests per fetch.
pub const QUESTION_BATCH_SIZE: u32 = 15;
/// Amount the server uses when the query omits one.
pub const DEFAULT_QUESTION_AMOUNT: u32 = 10;
/// Largest amount the server accepts per request.
pub const MAX_QUESTION_AMOUNT: u32 = 50;

pub fn categories_route() -> &'static str {
    "/trivia/categories"
}

pub fn questions_route() -> &'static str {
    "/trivia/questions"
}

pub fn validate_route() -> &'static str {
    "/trivia/validate"
}

pub fn session_token_route() -> &'static str {
    "/trivia/token"
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaCategory {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub trivia_categories: Vec<TriviaCategory>,
}

/// A question as served to clients. The correct answer is never included;
/// `token` and `instant` let the server check a submitted answer later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answers: Vec<String>,
    pub token: String,
    pub instant: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBatch {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub questions: Vec<TriviaQuestion>,
}

fn default_amount() -> u32 {
    DEFAULT_QUESTION_AMOUNT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionQuery {
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default)]
    pub category: i64,
    #[serde(default)]
    pub difficulty: String,
}

impl QuestionQuery {
    pub fn new(amount: u32, category: CategoryId, difficulty: Difficulty) -> Self {
        Self {
            amount,
            category: category.0,
            difficulty: difficulty.query_value().to_string(),
        }
    }
}

impl Default for QuestionQuery {
    fn default() -> Self {
        Self {
            amount: DEFAULT_QUESTION_AMOUNT,
            category: 0,
            difficulty: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateQuery {
    pub token: String,
    pub instant: String,
    pub answer: String,
}
