use rand::Rng;
use tracing::{debug, info};

use drill_core::model::{Answer, SessionOptions, SessionResults};

use super::service::{AnswerOutcome, Session};
use crate::Clock;
use crate::error::SessionError;
use crate::store::DataStore;

/// Results of a finished session and whether they reached storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedSession {
    pub results: SessionResults,
    pub saved: bool,
}

/// Orchestrates session start, timed answering and recording results.
#[derive(Debug, Clone, Copy)]
pub struct PracticeLoopService {
    clock: Clock,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Generate and start a session with the thread-local generator.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if no session can be built from `options`.
    pub fn start(
        &self,
        options: &SessionOptions,
        store: &DataStore,
    ) -> Result<Session, SessionError> {
        self.start_with_rng(&mut rand::rng(), options, store)
    }

    /// Generate and start a session with the given generator.
    ///
    /// The answer time cap comes from the stored settings.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if no session can be built from `options`.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        options: &SessionOptions,
        store: &DataStore,
    ) -> Result<Session, SessionError> {
        let mut session = Session::generate(rng, options, store.settings().time_cap())?;
        session.start(self.clock.now())?;
        Ok(session)
    }

    /// Submit an answer for the current question, timed by the service clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` for sessions that were never started.
    pub fn answer_current(
        &self,
        session: &mut Session,
        answer: &Answer,
    ) -> Result<AnswerOutcome, SessionError> {
        let outcome = session.submit_answer(answer, self.clock.now())?;
        if let AnswerOutcome::Correct { elapsed_ms, .. } = outcome {
            debug!(
                answered = session.answered(),
                total = session.total(),
                elapsed_ms,
                "correct answer"
            );
        }
        Ok(outcome)
    }

    /// Finalize the session, append it to history and save.
    ///
    /// A failed save still returns the results; `saved` reports it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` if questions remain.
    pub async fn finish(
        &self,
        session: Session,
        store: &mut DataStore,
    ) -> Result<FinishedSession, SessionError> {
        let results = session.finalize()?;
        store.record_result(results.clone());
        let saved = store.save().await;
        info!(
            session_type = %results.session_type(),
            total_time_ms = results.total_time_ms(),
            saved,
            "session recorded"
        );
        Ok(FinishedSession { results, saved })
    }
}
