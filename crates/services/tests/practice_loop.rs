use std::sync::Arc;

use drill_core::model::{
    Answer, OperandRange, OperandSource, Question, QuestionOrder, SessionOptions, SessionType,
};
use drill_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{AnswerOutcome, AppServices, Clock, DataStore, PracticeLoopService, SessionError};
use storage::repository::{DataRepository, InMemoryRepository, Storage};

fn correct_answer(question: &Question) -> Answer {
    match question {
        Question::Arithmetic(q) => Answer::Number(q.ans),
        Question::Matrix(q) => Answer::Matrix(q.ans.clone()),
    }
}

#[tokio::test]
async fn practice_loop_records_one_history_entry() {
    let repo: Arc<dyn DataRepository> = Arc::new(InMemoryRepository::new());
    let mut store = DataStore::load(Arc::clone(&repo)).await;
    let mut clock = Clock::fixed(fixed_now());
    let mut rng = StdRng::seed_from_u64(7);

    let options = SessionOptions {
        session_type: SessionType::Add,
        operands: OperandSource::Range(OperandRange::new(1, 3)),
        order: QuestionOrder::All,
        is_default: true,
    };
    let practice = PracticeLoopService::new(clock);
    let mut session = practice.start_with_rng(&mut rng, &options, &store).unwrap();
    assert_eq!(session.total(), 9);

    while let Some(question) = session.current_question().cloned() {
        clock.advance_millis(400);
        let practice = practice.with_clock(clock);
        assert_eq!(
            practice
                .answer_current(&mut session, &Answer::Number(-1))
                .unwrap(),
            AnswerOutcome::Incorrect
        );
        let outcome = practice
            .answer_current(&mut session, &correct_answer(&question))
            .unwrap();
        assert!(matches!(outcome, AnswerOutcome::Correct { elapsed_ms: 400, .. }));
    }

    let finished = practice.with_clock(clock).finish(session, &mut store).await.unwrap();
    assert!(finished.saved);
    assert_eq!(finished.results.total_time_ms(), 9 * 400);
    assert!(finished.results.breakdown().unwrap().is_complete());
    assert_eq!(store.history().len(), 1);

    let reloaded = DataStore::load(repo).await;
    assert_eq!(reloaded.history(), store.history());
}

#[tokio::test]
async fn unfinished_sessions_are_not_recorded() {
    let mut store = DataStore::load(Arc::new(InMemoryRepository::new())).await;
    let practice = PracticeLoopService::new(Clock::fixed(fixed_now()));
    let session = practice
        .start(&SessionOptions::default_for(SessionType::Sqr), &store)
        .unwrap();

    let err = practice.finish(session, &mut store).await.unwrap_err();
    assert!(matches!(err, SessionError::Incomplete { answered: 0, total: 12 }));
    assert!(store.history().is_empty());
}

#[tokio::test]
async fn app_services_run_matrix_practice_on_sqlite() {
    let mut services = AppServices::new_sqlite(
        "sqlite:file:memdb_practice_loop?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
    )
    .await
    .expect("services");

    let (practice, store) = services.parts_mut();
    let options = SessionOptions::default_for(SessionType::Matrix(
        drill_core::model::MatrixOperator::Mul,
    ));
    let mut session = practice.start(&options, store).unwrap();
    while let Some(question) = session.current_question().cloned() {
        practice
            .answer_current(&mut session, &correct_answer(&question))
            .unwrap();
    }
    let finished = practice.finish(session, store).await.unwrap();
    assert!(finished.saved);
    assert!(finished.results.breakdown().is_none());
    assert_eq!(finished.results.question_count(), 10);

    let storage = Storage::sqlite("sqlite:file:memdb_practice_loop?mode=memory&cache=shared")
        .await
        .expect("reopen");
    let again = AppServices::from_storage(&storage, Clock::default()).await;
    assert_eq!(again.store().history().len(), 1);
}
