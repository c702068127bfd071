//! Client side of the trivia quiz: the progression state machine, the async
//! controller that drives it, and the HTTP adapter for the trivia backend.

pub mod controller;
pub mod error;
pub mod http;
pub mod machine;
pub mod source;
pub mod text;
pub mod view;

pub use controller::QuizController;
pub use error::ClientError;
pub use http::HttpTriviaClient;
pub use machine::{Effect, QuizMachine, QuizPhase, Session, Transition};
pub use source::{AnswerSubmission, AnswerValidator, QuestionRequest, QuestionSource};
pub use view::{
    CategoryEntry, DisplayUpdate, QuestionView, Renderer, Verdict, NO_QUESTIONS_MESSAGE,
    WELCOME_PROMPT, WELCOME_TITLE,
};
