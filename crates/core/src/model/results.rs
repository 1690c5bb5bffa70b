use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ArithmeticQuestion, MathOperator, OperandRange, SessionType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultsError {
    #[error("breakdown operator {oper} does not match session type {session_type}")]
    BreakdownTypeMismatch {
        oper: MathOperator,
        session_type: SessionType,
    },

    #[error("breakdown grid is not {expected}x{expected}")]
    BreakdownShape { expected: usize },
}

//
// ─── INDIVIDUAL BREAKDOWN ──────────────────────────────────────────────────────
//

/// Per-question answer times of a default single-operator session.
///
/// `times[i][j]` holds the time for operands `(range.min + i, range.min + j)`;
/// `None` marks a pair the session never asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualBreakdown {
    pub oper: MathOperator,
    pub range: OperandRange,
    pub times: Vec<Vec<Option<u64>>>,
}

impl IndividualBreakdown {
    #[must_use]
    pub fn empty(oper: MathOperator, range: OperandRange) -> Self {
        let n = range.len();
        Self {
            oper,
            range,
            times: vec![vec![None; n]; n],
        }
    }

    /// Fill a grid from answered questions and their times.
    ///
    /// Questions are placed by their source operands; operands outside
    /// `range` are skipped.
    #[must_use]
    pub fn from_answers<'a>(
        oper: MathOperator,
        range: OperandRange,
        answers: impl IntoIterator<Item = (&'a ArithmeticQuestion, u64)>,
    ) -> Self {
        let mut breakdown = Self::empty(oper, range);
        for (question, time) in answers {
            let (a, b) = question.source_operands();
            if let (Some(i), Some(j)) = (range.index_of(a), range.index_of(b)) {
                breakdown.times[i][j] = Some(time);
            }
        }
        breakdown
    }

    /// Time recorded for operands `(a, b)`, if that pair was asked.
    #[must_use]
    pub fn time_for(&self, a: i64, b: i64) -> Option<u64> {
        let i = self.range.index_of(a)?;
        let j = self.range.index_of(b)?;
        *self.times.get(i)?.get(j)?
    }

    /// Covered cells as `(i, j, time)` in row-major grid order.
    pub fn covered_cells(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        self.times.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(j, time)| time.map(|t| (i, j, t)))
        })
    }

    #[must_use]
    pub fn covered(&self) -> usize {
        self.covered_cells().count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.times.iter().flatten().all(Option::is_some)
    }

    fn has_square_shape(&self) -> bool {
        let n = self.range.len();
        self.times.len() == n && self.times.iter().all(|row| row.len() == n)
    }
}

//
// ─── SESSION RESULTS ───────────────────────────────────────────────────────────
//

/// Immutable record of a finished session, kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionResultsRecord")]
pub struct SessionResults {
    completed_at: DateTime<Utc>,
    session_type: SessionType,
    total_time_ms: u64,
    question_count: usize,
    breakdown: Option<IndividualBreakdown>,
}

#[derive(Deserialize)]
struct SessionResultsRecord {
    completed_at: DateTime<Utc>,
    session_type: SessionType,
    total_time_ms: u64,
    question_count: usize,
    #[serde(default)]
    breakdown: Option<IndividualBreakdown>,
}

impl TryFrom<SessionResultsRecord> for SessionResults {
    type Error = ResultsError;

    fn try_from(record: SessionResultsRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.completed_at,
            record.session_type,
            record.total_time_ms,
            record.question_count,
            record.breakdown,
        )
    }
}

impl SessionResults {
    /// Build a results record.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError` if the breakdown belongs to another operator
    /// or its grid does not match its range.
    pub fn new(
        completed_at: DateTime<Utc>,
        session_type: SessionType,
        total_time_ms: u64,
        question_count: usize,
        breakdown: Option<IndividualBreakdown>,
    ) -> Result<Self, ResultsError> {
        if let Some(b) = &breakdown {
            if session_type.operator() != Some(b.oper) {
                return Err(ResultsError::BreakdownTypeMismatch {
                    oper: b.oper,
                    session_type,
                });
            }
            if !b.has_square_shape() {
                return Err(ResultsError::BreakdownShape {
                    expected: b.range.len(),
                });
            }
        }

        Ok(Self {
            completed_at,
            session_type,
            total_time_ms,
            question_count,
            breakdown,
        })
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    #[must_use]
    pub fn total_time_ms(&self) -> u64 {
        self.total_time_ms
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn breakdown(&self) -> Option<&IndividualBreakdown> {
        self.breakdown.as_ref()
    }

    /// Mean time per question in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_time_ms(&self) -> Option<f64> {
        if self.question_count == 0 {
            None
        } else {
            Some(self.total_time_ms as f64 / self.question_count as f64)
        }
    }
}
