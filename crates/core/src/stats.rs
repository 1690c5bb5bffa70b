//! Read-only queries over session history.

use crate::generator::generate_question;
use crate::model::{ArithmeticQuestion, SessionResults, SessionType};

/// One cell of a breakdown grid turned back into a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTime {
    pub question: ArithmeticQuestion,
    pub time_ms: u64,
}

/// History ordered by completion time. Entries completed at the same
/// instant keep their original relative order.
#[must_use]
pub fn history_sorted(history: &[SessionResults]) -> Vec<SessionResults> {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(SessionResults::completed_at);
    sorted
}

#[must_use]
pub fn filter_by_type(history: &[SessionResults], session_type: SessionType) -> Vec<SessionResults> {
    history
        .iter()
        .filter(|r| r.session_type() == session_type)
        .cloned()
        .collect()
}

/// Last entry of `session_type` in storage order (not completion order).
#[must_use]
pub fn latest_of_type(
    history: &[SessionResults],
    session_type: SessionType,
) -> Option<&SessionResults> {
    history
        .iter()
        .rev()
        .find(|r| r.session_type() == session_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Fastest,
    Slowest,
}

/// Keep the `n` best cells seen so far: push, stable sort, truncate.
fn extremes(results: &SessionResults, n: usize, which: Extreme) -> Vec<QuestionTime> {
    let Some(breakdown) = results.breakdown() else {
        return Vec::new();
    };
    let min = breakdown.range.min;
    let mut kept: Vec<QuestionTime> = Vec::with_capacity(n + 1);

    for (i, j, time_ms) in breakdown.covered_cells() {
        let (Ok(i), Ok(j)) = (i64::try_from(i), i64::try_from(j)) else {
            continue;
        };
        let Ok(question) = generate_question(min + i, min + j, breakdown.oper) else {
            continue;
        };
        kept.push(QuestionTime { question, time_ms });
        match which {
            Extreme::Fastest => kept.sort_by_key(|q| q.time_ms),
            Extreme::Slowest => kept.sort_by_key(|q| std::cmp::Reverse(q.time_ms)),
        }
        kept.truncate(n);
    }

    kept
}

/// Up to `n` quickest answers in a session, quickest first.
///
/// Ties keep grid order. Sessions without a breakdown yield nothing.
#[must_use]
pub fn fastest(results: &SessionResults, n: usize) -> Vec<QuestionTime> {
    extremes(results, n, Extreme::Fastest)
}

/// Up to `n` slowest answers in a session, slowest first.
#[must_use]
pub fn slowest(results: &SessionResults, n: usize) -> Vec<QuestionTime> {
    extremes(results, n, Extreme::Slowest)
}

/// Mean time for operands `(a, b)` across every `session_type` entry whose
/// breakdown covers that pair.
///
/// Returns `None` when there are no samples or fewer than `min_samples`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_for_pair(
    history: &[SessionResults],
    session_type: SessionType,
    a: i64,
    b: i64,
    min_samples: usize,
) -> Option<f64> {
    let samples: Vec<u64> = history
        .iter()
        .filter(|r| r.session_type() == session_type)
        .filter_map(SessionResults::breakdown)
        .filter_map(|breakdown| breakdown.time_for(a, b))
        .collect();

    if samples.is_empty() || samples.len() < min_samples {
        return None;
    }
    let total: u64 = samples.iter().sum();
    Some(total as f64 / samples.len() as f64)
}
