//! Presentation-agnostic views over session history.
//!
//! Nothing here formats strings; times stay in milliseconds and
//! timestamps stay `DateTime<Utc>` so the caller can render them.

use chrono::{DateTime, Utc};

use drill_core::model::{MathOperator, OperandRange, SessionResults, SessionType};
use drill_core::stats::{self, QuestionTime};

/// How many extremes the stats screen lists per operator.
pub const EXTREMES_SHOWN: usize = 5;

/// Minimum number of sessions covering a pair before its average is shown.
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// One history entry, keyed by its position in storage order so it can be
/// removed again.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryListItem {
    pub index: usize,
    pub completed_at: DateTime<Utc>,
    pub session_type: SessionType,
    pub question_count: usize,
    pub total_time_ms: u64,
    pub average_time_ms: Option<f64>,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_results(index: usize, results: &SessionResults) -> Self {
        Self {
            index,
            completed_at: results.completed_at(),
            session_type: results.session_type(),
            question_count: results.question_count(),
            total_time_ms: results.total_time_ms(),
            average_time_ms: results.average_time_ms(),
        }
    }
}

/// History items, most recent first.
#[must_use]
pub fn history_items(history: &[SessionResults]) -> Vec<HistoryListItem> {
    let mut items: Vec<_> = history
        .iter()
        .enumerate()
        .map(|(index, results)| HistoryListItem::from_results(index, results))
        .collect();
    items.sort_by_key(|item| std::cmp::Reverse(item.completed_at));
    items
}

/// Summary of past sessions of any type.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTypeStats {
    pub session_type: SessionType,
    pub attempts: usize,
    pub latest: Option<SessionResults>,
    pub best_total_ms: Option<u64>,
}

impl SessionTypeStats {
    #[must_use]
    pub fn build(history: &[SessionResults], session_type: SessionType) -> Self {
        let matching = stats::filter_by_type(history, session_type);
        Self {
            session_type,
            attempts: matching.len(),
            latest: stats::latest_of_type(history, session_type).cloned(),
            best_total_ms: matching.iter().map(SessionResults::total_time_ms).min(),
        }
    }
}

/// Everything the stats screen shows for one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorStats {
    pub oper: MathOperator,
    pub attempts: usize,
    pub latest: Option<SessionResults>,
    pub fastest: Vec<QuestionTime>,
    pub slowest: Vec<QuestionTime>,
    pub range: OperandRange,
    /// `averages[i][j]` is the mean time for `(range.min + i, range.min + j)`.
    pub averages: Vec<Vec<Option<f64>>>,
}

impl OperatorStats {
    /// Build the view from the latest session and all default sessions of
    /// `oper` over `range`.
    #[must_use]
    pub fn build(
        history: &[SessionResults],
        oper: MathOperator,
        range: OperandRange,
        min_samples: usize,
    ) -> Self {
        let session_type = SessionType::from_operator(oper);
        let latest = stats::latest_of_type(history, session_type).cloned();
        let (fastest, slowest) = latest.as_ref().map_or_else(
            || (Vec::new(), Vec::new()),
            |results| {
                (
                    stats::fastest(results, EXTREMES_SHOWN),
                    stats::slowest(results, EXTREMES_SHOWN),
                )
            },
        );

        let values = range.values();
        let averages = values
            .iter()
            .map(|&a| {
                values
                    .iter()
                    .map(|&b| stats::average_for_pair(history, session_type, a, b, min_samples))
                    .collect()
            })
            .collect();

        Self {
            oper,
            attempts: stats::filter_by_type(history, session_type).len(),
            latest,
            fastest,
            slowest,
            range,
            averages,
        }
    }

    #[must_use]
    pub fn average_for(&self, a: i64, b: i64) -> Option<f64> {
        let i = self.range.index_of(a)?;
        let j = self.range.index_of(b)?;
        *self.averages.get(i)?.get(j)?
    }
}
