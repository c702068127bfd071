use super::*;
use crate::view::{WELCOME_PROMPT, WELCOME_TITLE};

fn question(n: usize) -> TriviaQuestion {
    TriviaQuestion {
        kind: "multiple".into(),
        difficulty: "easy".into(),
        category: "General Knowledge".into(),
        question: format!("Question {n}?"),
        answers: vec![
            format!("a{n}"),
            format!("b{n}"),
            format!("c{n}"),
            format!("d{n}"),
        ],
        token: format!("token-{n}"),
        instant: format!("2025-01-01T00:00:0{n}Z"),
    }
}

fn batch(range: std::ops::Range<usize>) -> Vec<TriviaQuestion> {
    range.map(question).collect()
}

fn presenting_machine(questions: Vec<TriviaQuestion>) -> QuizMachine {
    let mut machine = QuizMachine::default();
    machine.start();
    machine.questions_loaded(questions);
    assert_eq!(machine.phase(), QuizPhase::Presenting);
    machine
}

fn answer_and_mark(machine: &mut QuizMachine, answer_index: usize, correct: bool) {
    let transition = machine.select_answer(answer_index);
    let Some(Effect::ValidateAnswer { question_index, .. }) = transition.effect else {
        panic!("expected a validation effect, got {transition:?}");
    };
    machine.answer_validated(question_index, answer_index, correct);
    assert_eq!(machine.phase(), QuizPhase::Answered);
}

#[test]
fn start_requests_one_batch_with_current_selection() {
    let mut machine = QuizMachine::default();
    machine.set_difficulty(Difficulty::Hard);
    machine.set_category(CategoryId(9));

    let transition = machine.start();

    assert_eq!(machine.phase(), QuizPhase::Loading);
    assert_eq!(
        transition.effect,
        Some(Effect::FetchQuestions(QuestionRequest {
            amount: QUESTION_BATCH_SIZE,
            category: CategoryId(9),
            difficulty: Difficulty::Hard,
        }))
    );
    assert_eq!(transition.updates, vec![DisplayUpdate::ControlsLocked(true)]);
}

#[test]
fn start_is_ignored_outside_idle() {
    let mut machine = QuizMachine::default();
    machine.start();

    assert!(machine.start().is_noop());
    assert_eq!(machine.phase(), QuizPhase::Loading);
}

#[test]
fn loaded_batch_presents_first_question() {
    let mut machine = QuizMachine::default();
    machine.start();

    let transition = machine.questions_loaded(batch(0..3));

    assert_eq!(machine.phase(), QuizPhase::Presenting);
    assert_eq!(machine.session().current_index(), 0);
    assert_eq!(machine.session().queue().len(), 3);
    match transition.updates.as_slice() {
        [DisplayUpdate::Question(view)] => {
            assert_eq!(view.position, 0);
            assert_eq!(view.text, "Question 0?");
            assert_eq!(view.answers.len(), 4);
        }
        other => panic!("unexpected updates: {other:?}"),
    }
}

#[test]
fn empty_batch_shows_no_content_message_and_keeps_queue() {
    let mut machine = QuizMachine::default();
    machine.set_difficulty(Difficulty::Medium);
    machine.start();

    let transition = machine.questions_loaded(Vec::new());

    assert_eq!(machine.phase(), QuizPhase::NoContent);
    assert!(machine.session().queue().is_empty());
    assert_eq!(machine.session().difficulty, Difficulty::Medium);
    assert_eq!(
        transition.updates,
        vec![DisplayUpdate::Message(NO_QUESTIONS_MESSAGE.to_string())]
    );
}

#[test]
fn batch_is_dropped_when_not_loading() {
    let mut machine = QuizMachine::default();
    machine.start();
    machine.reset();

    assert!(machine.questions_loaded(batch(0..2)).is_noop());
    assert_eq!(machine.phase(), QuizPhase::Idle);
    assert!(machine.session().queue().is_empty());
}

#[test]
fn select_answer_issues_validation_for_token_instant_and_raw_answer() {
    let mut machine = presenting_machine(batch(0..1));

    let transition = machine.select_answer(2);

    assert_eq!(machine.phase(), QuizPhase::Validating);
    assert_eq!(
        transition.effect,
        Some(Effect::ValidateAnswer {
            question_index: 0,
            answer_index: 2,
            submission: AnswerSubmission {
                token: "token-0".into(),
                instant: "2025-01-01T00:00:00Z".into(),
                answer: "c0".into(),
            },
        })
    );
}

#[test]
fn second_selection_while_validating_is_ignored() {
    let mut machine = presenting_machine(batch(0..1));
    machine.select_answer(0);

    assert!(machine.select_answer(0).is_noop());
    assert!(machine.select_answer(1).is_noop());
    assert_eq!(machine.phase(), QuizPhase::Validating);
}

#[test]
fn verdict_marks_exactly_one_control_and_locks_question() {
    let mut machine = presenting_machine(batch(0..1));
    machine.select_answer(1);

    let transition = machine.answer_validated(0, 1, true);

    assert_eq!(
        transition.updates,
        vec![DisplayUpdate::AnswerMarked {
            index: 1,
            verdict: Verdict::Correct,
        }]
    );
    assert_eq!(
        machine.marks(),
        &[None, Some(Verdict::Correct), None, None]
    );
    for index in 0..4 {
        assert!(machine.select_answer(index).is_noop());
    }
    assert!(machine.answer_validated(0, 2, false).is_noop());
    assert_eq!(
        machine.marks().iter().filter(|mark| mark.is_some()).count(),
        1
    );
}

#[test]
fn verdict_for_a_control_that_was_not_submitted_is_dropped() {
    let mut machine = presenting_machine(batch(0..1));
    machine.select_answer(1);

    assert!(machine.answer_validated(0, 2, true).is_noop());
    assert_eq!(machine.phase(), QuizPhase::Validating);
    assert!(machine.marks().iter().all(Option::is_none));

    machine.answer_validated(0, 1, false);
    assert_eq!(
        machine.marks(),
        &[None, Some(Verdict::Incorrect), None, None]
    );
}

#[test]
fn batch_replaces_queue_when_refetching() {
    let mut machine = presenting_machine(batch(0..1));
    answer_and_mark(&mut machine, 0, true);
    machine.advance();

    machine.questions_loaded(batch(5..8));

    assert_eq!(machine.session().queue().len(), 3);
    assert_eq!(
        machine.session().queue()[0].token,
        "token-5"
    );
}

#[test]
fn out_of_range_answer_is_ignored() {
    let mut machine = presenting_machine(batch(0..1));

    assert!(machine.select_answer(7).is_noop());
    assert_eq!(machine.phase(), QuizPhase::Presenting);
}

#[test]
fn advance_requires_a_marked_answer() {
    let mut machine = presenting_machine(batch(0..2));

    assert!(machine.advance().is_noop());
    machine.select_answer(0);
    assert!(machine.advance().is_noop());
    assert_eq!(machine.session().current_index(), 0);
}

#[test]
fn advance_moves_to_next_question_then_refetches_when_exhausted() {
    let mut machine = presenting_machine(batch(0..2));

    answer_and_mark(&mut machine, 0, false);
    let transition = machine.advance();
    assert_eq!(machine.phase(), QuizPhase::Presenting);
    assert_eq!(machine.session().current_index(), 1);
    assert!(matches!(
        transition.updates.as_slice(),
        [DisplayUpdate::Question(view)] if view.position == 1
    ));
    let cleared: [Option<Verdict>; 4] = [None; 4];
    assert_eq!(machine.marks(), &cleared);

    answer_and_mark(&mut machine, 3, true);
    let transition = machine.advance();
    assert_eq!(machine.phase(), QuizPhase::Loading);
    assert_eq!(machine.session().current_index(), 2);
    assert!(machine.session().is_exhausted());
    assert!(matches!(transition.effect, Some(Effect::FetchQuestions(_))));

    machine.questions_loaded(batch(10..12));
    assert_eq!(machine.phase(), QuizPhase::Presenting);
    assert_eq!(machine.session().current_index(), 0);
    assert_eq!(machine.session().queue().len(), 2);
    assert_eq!(
        machine.session().current_question().map(|q| q.token.as_str()),
        Some("token-10")
    );
}

#[test]
fn advance_never_moves_backwards_or_past_the_queue() {
    let mut machine = presenting_machine(batch(0..3));
    let mut last_index = machine.session().current_index();

    for _ in 0..3 {
        answer_and_mark(&mut machine, 0, true);
        machine.advance();
        let index = machine.session().current_index();
        assert!(index >= last_index);
        assert!(index <= machine.session().queue().len());
        last_index = index;
    }

    assert_eq!(machine.phase(), QuizPhase::Loading);
}

#[test]
fn refetch_uses_selection_at_time_of_exhaustion() {
    let mut machine = presenting_machine(batch(0..1));
    machine.set_difficulty(Difficulty::Easy);
    answer_and_mark(&mut machine, 0, true);

    let transition = machine.advance();

    assert_eq!(
        transition.effect,
        Some(Effect::FetchQuestions(QuestionRequest {
            amount: QUESTION_BATCH_SIZE,
            category: CategoryId::ALL,
            difficulty: Difficulty::Easy,
        }))
    );
}

#[test]
fn reset_restores_initial_session_from_any_phase() {
    let mut machine = presenting_machine(batch(0..2));
    machine.set_category(CategoryId(12));
    machine.select_answer(0);

    let transition = machine.reset();

    assert_eq!(machine.phase(), QuizPhase::Idle);
    assert_eq!(machine.session(), &Session::default());
    assert!(machine.marks().is_empty());
    assert_eq!(
        transition.updates,
        vec![
            DisplayUpdate::ControlsLocked(false),
            DisplayUpdate::DifficultyHighlighted(Difficulty::All),
            DisplayUpdate::CategoryHighlighted(CategoryId::ALL),
            DisplayUpdate::Welcome,
        ]
    );
    assert!(!WELCOME_TITLE.is_empty() && !WELCOME_PROMPT.is_empty());
}

#[test]
fn verdict_after_reset_is_dropped() {
    let mut machine = presenting_machine(batch(0..1));
    machine.select_answer(0);
    machine.reset();

    assert!(machine.answer_validated(0, 0, true).is_noop());
    assert_eq!(machine.phase(), QuizPhase::Idle);
}

#[test]
fn categories_are_listed_with_all_first_and_preselected() {
    let mut machine = QuizMachine::default();
    let transition = machine.categories_loaded(&[TriviaCategory {
        id: CategoryId(9),
        name: "General Knowledge".into(),
    }]);

    match transition.updates.as_slice() {
        [DisplayUpdate::Categories { entries, active }] => {
            let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
            assert_eq!(labels, vec!["All", "General Knowledge"]);
            assert_eq!(*active, CategoryId::ALL);
        }
        other => panic!("unexpected updates: {other:?}"),
    }
    assert_eq!(machine.categories().len(), 2);
}

#[test]
fn question_view_decodes_html_entities_but_submission_keeps_raw_answer() {
    let mut encoded = question(0);
    encoded.question = "Who wrote &quot;Dune&quot;?".into();
    encoded.answers = vec!["Frank Herbert".into(), "Isaac Asimov&#039;s ghost".into()];
    let mut machine = QuizMachine::default();
    machine.start();

    let transition = machine.questions_loaded(vec![encoded]);
    let [DisplayUpdate::Question(view)] = transition.updates.as_slice() else {
        panic!("expected a question");
    };
    assert_eq!(view.text, "Who wrote \"Dune\"?");
    assert_eq!(view.answers[1], "Isaac Asimov's ghost");

    let transition = machine.select_answer(1);
    let Some(Effect::ValidateAnswer { submission, .. }) = transition.effect else {
        panic!("expected a validation effect");
    };
    assert_eq!(submission.answer, "Isaac Asimov&#039;s ghost");
}
