use super::*;
use async_trait::async_trait;
use client_core::{
    AnswerSubmission, AnswerValidator, ClientError, QuestionRequest, QuestionSource, QuizPhase,
};
use shared::protocol::{TriviaCategory, TriviaQuestion};
use std::sync::{Arc, Mutex};

#[test]
fn parses_answers_as_one_based_numbers() {
    assert_eq!("1".parse::<QuizCommand>().expect("answer"), QuizCommand::Answer(0));
    assert_eq!(" 4 ".parse::<QuizCommand>().expect("answer"), QuizCommand::Answer(3));
    assert!(matches!(
        "0".parse::<QuizCommand>(),
        Err(CommandError::InvalidAnswer(_))
    ));
}

#[test]
fn parses_selection_commands_with_arguments() {
    assert_eq!(
        "d Hard".parse::<QuizCommand>().expect("difficulty"),
        QuizCommand::Difficulty(Difficulty::Hard)
    );
    assert_eq!(
        "difficulty all".parse::<QuizCommand>().expect("difficulty"),
        QuizCommand::Difficulty(Difficulty::All)
    );
    assert_eq!(
        "c 18".parse::<QuizCommand>().expect("category"),
        QuizCommand::Category(CategoryId(18))
    );
    assert!(matches!(
        "d".parse::<QuizCommand>(),
        Err(CommandError::MissingArgument("difficulty"))
    ));
    assert!(matches!(
        "d extreme".parse::<QuizCommand>(),
        Err(CommandError::InvalidDifficulty(_))
    ));
    assert!(matches!(
        "c -3".parse::<QuizCommand>(),
        Err(CommandError::InvalidCategory(_))
    ));
}

#[test]
fn parses_keywords_and_rejects_noise() {
    assert_eq!("START".parse::<QuizCommand>().expect("start"), QuizCommand::Start);
    assert_eq!("n".parse::<QuizCommand>().expect("next"), QuizCommand::Next);
    assert_eq!("r".parse::<QuizCommand>().expect("reset"), QuizCommand::Reset);
    assert_eq!("q".parse::<QuizCommand>().expect("quit"), QuizCommand::Quit);
    assert!(matches!("   ".parse::<QuizCommand>(), Err(CommandError::Empty)));
    assert!(matches!(
        "dance".parse::<QuizCommand>(),
        Err(CommandError::Unknown(_))
    ));
}

struct OneQuestion {
    submissions: Mutex<Vec<AnswerSubmission>>,
}

#[async_trait]
impl QuestionSource for OneQuestion {
    async fn fetch_categories(&self) -> Result<Vec<TriviaCategory>, ClientError> {
        Ok(Vec::new())
    }

    async fn fetch_questions(
        &self,
        _request: &QuestionRequest,
    ) -> Result<Vec<TriviaQuestion>, ClientError> {
        Ok(vec![TriviaQuestion {
            kind: "boolean".into(),
            difficulty: "easy".into(),
            category: "General Knowledge".into(),
            question: "The sky is blue.".into(),
            answers: vec!["True".into(), "False".into()],
            token: "tok".into(),
            instant: "2025-01-01T00:00:00Z".into(),
        }])
    }
}

#[async_trait]
impl AnswerValidator for OneQuestion {
    async fn validate(&self, submission: &AnswerSubmission) -> Result<bool, ClientError> {
        self.submissions
            .lock()
            .expect("submissions")
            .push(submission.clone());
        Ok(submission.answer == "True")
    }
}

#[tokio::test]
async fn dispatch_drives_quiz_and_stops_on_quit() {
    let backend = Arc::new(OneQuestion {
        submissions: Mutex::new(Vec::new()),
    });
    let mut quiz = QuizController::new(
        backend.clone(),
        backend.clone(),
        TerminalRenderer::new(Vec::new()),
    );

    for line in ["start", "1", "2"] {
        let command = line.parse().expect("command");
        assert!(dispatch(&mut quiz, command).await.is_continue());
    }

    assert_eq!(quiz.phase(), QuizPhase::Answered);
    assert_eq!(backend.submissions.lock().expect("submissions").len(), 1);
    let out = String::from_utf8(quiz.renderer().output().clone()).expect("utf8");
    assert!(out.contains("1) True - correct!"));

    assert!(dispatch(&mut quiz, QuizCommand::Help).await.is_continue());
    assert!(dispatch(&mut quiz, QuizCommand::Quit).await.is_break());
}
