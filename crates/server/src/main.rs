use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rand::seq::SliceRandom;
use shared::{
    domain::{CategoryId, Difficulty},
    error::{ApiError, ErrorCode},
    protocol::{
        categories_route, questions_route, session_token_route, validate_route,
        CategoryListResponse, QuestionBatch, QuestionQuery, TriviaQuestion, ValidateQuery,
        MAX_QUESTION_AMOUNT,
    },
};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod answer_token;
mod app_state;
mod config;
mod opentdb;

#[cfg(test)]
#[path = "tests/fake_opentdb.rs"]
mod fake_opentdb;

use answer_token::AnswerSigner;
use app_state::AppState;
use config::load_settings;
use opentdb::{OpenTdbClient, UpstreamQuestion};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let upstream = OpenTdbClient::new(&settings.trivia_api_base_url, settings.token_ttl());
    let signer = AnswerSigner::random()?;
    let app = build_router(Arc::new(AppState::new(upstream, signer)));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, upstream = %settings.trivia_api_base_url, "trivia server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(categories_route(), get(trivia_categories))
        .route(session_token_route(), get(trivia_session_token))
        .route(questions_route(), get(trivia_questions))
        .route(validate_route(), get(trivia_validate))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn trivia_categories(State(state): State<Arc<AppState>>) -> Json<CategoryListResponse> {
    if let Some(cached) = state.categories.read().await.clone() {
        return Json(cached);
    }

    match state.upstream.fetch_categories().await {
        Ok(categories) => {
            *state.categories.write().await = Some(categories.clone());
            Json(categories)
        }
        Err(error) => {
            error!(%error, "failed to fetch trivia categories");
            Json(CategoryListResponse::default())
        }
    }
}

async fn trivia_session_token(State(state): State<Arc<AppState>>) -> Json<Option<String>> {
    match state.upstream.session_token().await {
        Ok(token) => Json(Some(token)),
        Err(error) => {
            error!(%error, "failed to obtain upstream session token");
            Json(None)
        }
    }
}

async fn trivia_questions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<QuestionQuery>,
) -> ApiResult<QuestionBatch> {
    if q.amount == 0 || q.amount > MAX_QUESTION_AMOUNT {
        return Err(validation_error(format!(
            "amount must be between 1 and {MAX_QUESTION_AMOUNT}"
        )));
    }
    let difficulty = q
        .difficulty
        .parse::<Difficulty>()
        .map_err(|e| validation_error(e.to_string()))?;

    let results = match state
        .upstream
        .fetch_questions(q.amount, CategoryId(q.category), difficulty)
        .await
    {
        Ok(results) => results,
        Err(error) => {
            error!(%error, category = q.category, %difficulty, "failed to fetch trivia questions");
            return Ok(Json(QuestionBatch::default()));
        }
    };

    let questions = results
        .into_iter()
        .map(|question| client_question(&state.signer, question))
        .collect::<Vec<_>>();
    debug!(count = questions.len(), "serving trivia questions");
    Ok(Json(QuestionBatch { questions }))
}

async fn trivia_validate(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ValidateQuery>,
) -> Json<bool> {
    Json(state.signer.verify(&q.token, &q.instant, &q.answer))
}

/// Merges and shuffles the answers and replaces the correct one with a token.
fn client_question(signer: &AnswerSigner, question: UpstreamQuestion) -> TriviaQuestion {
    let issued = signer.issue(&question.correct_answer);
    let mut answers = question.incorrect_answers;
    answers.push(question.correct_answer);
    answers.shuffle(&mut rand::rng());

    TriviaQuestion {
        kind: question.kind,
        difficulty: question.difficulty,
        category: question.category,
        question: question.question,
        answers,
        token: issued.token,
        instant: issued.instant,
    }
}

fn validation_error(message: String) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new(ErrorCode::Validation, message)),
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
