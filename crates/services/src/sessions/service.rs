use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use tracing::debug;

use drill_core::model::{
    Answer, IndividualBreakdown, OperandRange, Question, SessionOptions, SessionResults,
    SessionType, TimeCap,
};
use drill_core::time::elapsed_millis;

use super::plan::QuestionPlan;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Wrong answer. Nothing is recorded and the same question stays current.
    Incorrect,
    /// Right answer. `elapsed_ms` is the recorded (capped) time.
    Correct { elapsed_ms: u64, is_complete: bool },
    /// Every question was already answered.
    AlreadyComplete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Pending,
    Running {
        started_at: DateTime<Utc>,
        last_mark: DateTime<Utc>,
    },
    Finished {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
}

/// A timed run through a fixed list of questions.
///
/// Pending until `start`, then each correct answer records the time since
/// the previous correct answer (or since the start) and advances to the
/// next question. Wrong answers can be retried freely.
pub struct Session {
    session_type: SessionType,
    questions: Vec<Question>,
    times: Vec<u64>,
    time_cap: TimeCap,
    is_default: bool,
    operand_range: Option<OperandRange>,
    state: SessionState,
}

impl Session {
    /// Generate questions for `options` and wrap them in a pending session.
    ///
    /// # Errors
    ///
    /// Propagates `QuestionPlan::build` failures.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        options: &SessionOptions,
        time_cap: TimeCap,
    ) -> Result<Self, SessionError> {
        let plan = QuestionPlan::build(rng, options)?;
        Self::from_plan(plan, time_cap)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the plan has no questions.
    pub fn from_plan(plan: QuestionPlan, time_cap: TimeCap) -> Result<Self, SessionError> {
        if plan.questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            session_type: plan.session_type,
            times: Vec::with_capacity(plan.questions.len()),
            questions: plan.questions,
            time_cap,
            is_default: plan.is_default,
            operand_range: plan.operand_range,
            state: SessionState::Pending,
        })
    }

    /// Start timing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` on a second call.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.state != SessionState::Pending {
            return Err(SessionError::AlreadyStarted);
        }
        self.state = SessionState::Running {
            started_at: now,
            last_mark: now,
        };
        debug!(session_type = %self.session_type, total = self.total(), "session started");
        Ok(())
    }

    /// Check `answer` against the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`.
    pub fn submit_answer(
        &mut self,
        answer: &Answer,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let (started_at, last_mark) = match self.state {
            SessionState::Pending => return Err(SessionError::NotStarted),
            SessionState::Finished { .. } => return Ok(AnswerOutcome::AlreadyComplete),
            SessionState::Running {
                started_at,
                last_mark,
            } => (started_at, last_mark),
        };

        let Some(question) = self.questions.get(self.times.len()) else {
            return Ok(AnswerOutcome::AlreadyComplete);
        };
        if !question.is_correct(answer) {
            return Ok(AnswerOutcome::Incorrect);
        }

        let elapsed_ms = self.time_cap.apply(elapsed_millis(last_mark, now));
        self.times.push(elapsed_ms);

        let is_complete = self.times.len() == self.questions.len();
        self.state = if is_complete {
            debug!(session_type = %self.session_type, "session finished");
            SessionState::Finished {
                started_at,
                completed_at: now,
            }
        } else {
            SessionState::Running {
                started_at,
                last_mark: now,
            }
        };

        Ok(AnswerOutcome::Correct {
            elapsed_ms,
            is_complete,
        })
    }

    #[must_use]
    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Recorded time per answered question, in order.
    #[must_use]
    pub fn times(&self) -> &[u64] {
        &self.times
    }

    #[must_use]
    pub fn time_cap(&self) -> TimeCap {
        self.time_cap
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SessionState::Pending => None,
            SessionState::Running { started_at, .. } | SessionState::Finished { started_at, .. } => {
                Some(started_at)
            }
        }
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SessionState::Finished { completed_at, .. } => Some(completed_at),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state != SessionState::Pending
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Finished { .. })
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        self.questions.get(self.times.len())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.answered(),
            remaining: self.total().saturating_sub(self.answered()),
            is_complete: self.is_complete(),
        }
    }

    /// Per-question times on the operand grid.
    ///
    /// Only default sessions of a single operator over an operand range
    /// get one.
    #[must_use]
    pub fn individual_breakdown(&self) -> Option<IndividualBreakdown> {
        if !self.is_default {
            return None;
        }
        let oper = self.session_type.operator()?;
        let range = self.operand_range?;

        let answered = self
            .questions
            .iter()
            .filter_map(Question::as_arithmetic)
            .zip(self.times.iter().copied());
        Some(IndividualBreakdown::from_answers(oper, range, answered))
    }

    /// Consume a finished session into its results record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` until every question is answered.
    pub fn finalize(self) -> Result<SessionResults, SessionError> {
        let SessionState::Finished { completed_at, .. } = self.state else {
            return Err(SessionError::Incomplete {
                answered: self.answered(),
                total: self.total(),
            });
        };

        let total_time_ms = self.times.iter().sum();
        let breakdown = self.individual_breakdown();
        Ok(SessionResults::new(
            completed_at,
            self.session_type,
            total_time_ms,
            self.questions.len(),
            breakdown,
        )?)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_type", &self.session_type)
            .field("questions_len", &self.questions.len())
            .field("answered", &self.times.len())
            .field("time_cap", &self.time_cap)
            .field("is_default", &self.is_default)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
