use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::SessionType;

/// Questions per matrix session when no count is configured.
pub const DEFAULT_MATRIX_QUESTION_COUNT: u32 = 10;

/// Questions per random arithmetic session when no count is configured.
pub const DEFAULT_RANDOM_QUESTION_COUNT: u32 = 20;

/// Upper limit for `QuestionOrder::Random` counts.
pub const MAX_QUESTION_COUNT: u32 = 1_000;

/// Operands a session may draw from, inclusive.
pub const OPERAND_BOUNDS: OperandRange = OperandRange { min: 1, max: 1_000 };

/// Session options that would produce unbounded or invalid sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OptionsError {
    #[error("operand {value} is outside {}..={}", OPERAND_BOUNDS.min, OPERAND_BOUNDS.max)]
    OperandOutOfBounds { value: i64 },
    #[error("operand pool has {len} entries, at most {max} allowed")]
    PoolTooLarge { len: usize, max: usize },
    #[error("{requested} questions requested, at most {MAX_QUESTION_COUNT} allowed")]
    TooManyQuestions { requested: u32 },
}

/// Inclusive operand range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: i64,
    pub max: i64,
}

impl OperandRange {
    /// The times-table range `1..=12` used by default sessions.
    pub const DEFAULT: OperandRange = OperandRange { min: 1, max: 12 };

    #[must_use]
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Number of operands in the range; zero when `min > max`.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.max.saturating_sub(self.min).saturating_add(1)).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Zero-based position of `value` in the range.
    #[must_use]
    pub fn index_of(&self, value: i64) -> Option<usize> {
        if self.contains(value) {
            usize::try_from(value - self.min).ok()
        } else {
            None
        }
    }

    #[must_use]
    pub fn values(&self) -> Vec<i64> {
        (self.min..=self.max).collect()
    }
}

impl Default for OperandRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where operands come from: a contiguous range or a hand-picked pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandSource {
    Range(OperandRange),
    Pool(Vec<i64>),
}

impl OperandSource {
    #[must_use]
    pub fn range(&self) -> Option<OperandRange> {
        match self {
            OperandSource::Range(range) => Some(*range),
            OperandSource::Pool(_) => None,
        }
    }
}

/// How the question list is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOrder {
    /// Every ordered operand pair, in pool order.
    All,
    /// Every ordered operand pair, shuffled.
    AllShuffled,
    /// `count` independent random draws.
    Random { count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub session_type: SessionType,
    pub operands: OperandSource,
    pub order: QuestionOrder,
    pub is_default: bool,
}

impl SessionOptions {
    /// Check operands and counts against the session limits.
    ///
    /// An inverted range is not rejected here; it simply yields no questions.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` for operands outside `OPERAND_BOUNDS`, pools
    /// larger than the bounds, or random counts above `MAX_QUESTION_COUNT`.
    pub fn validate(&self) -> Result<(), OptionsError> {
        match &self.operands {
            OperandSource::Range(range) => {
                if !range.is_empty() {
                    for value in [range.min, range.max] {
                        if !OPERAND_BOUNDS.contains(value) {
                            return Err(OptionsError::OperandOutOfBounds { value });
                        }
                    }
                }
            }
            OperandSource::Pool(pool) => {
                if pool.len() > OPERAND_BOUNDS.len() {
                    return Err(OptionsError::PoolTooLarge {
                        len: pool.len(),
                        max: OPERAND_BOUNDS.len(),
                    });
                }
                if let Some(&value) = pool.iter().find(|v| !OPERAND_BOUNDS.contains(**v)) {
                    return Err(OptionsError::OperandOutOfBounds { value });
                }
            }
        }

        if let QuestionOrder::Random { count } = self.order {
            if count > MAX_QUESTION_COUNT {
                return Err(OptionsError::TooManyQuestions { requested: count });
            }
        }
        Ok(())
    }

    /// Options for the one-click practice of a session type: the default
    /// range, every pair shuffled, flagged as default so results keep a
    /// per-question breakdown.
    #[must_use]
    pub fn default_for(session_type: SessionType) -> Self {
        let order = if session_type.matrix_operator().is_some() {
            QuestionOrder::Random {
                count: DEFAULT_MATRIX_QUESTION_COUNT,
            }
        } else {
            QuestionOrder::AllShuffled
        };
        Self {
            session_type,
            operands: OperandSource::Range(OperandRange::DEFAULT),
            order,
            is_default: true,
        }
    }
}

/// Named custom session saved by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTemplate {
    pub name: String,
    pub options: SessionOptions,
}

impl SessionTemplate {
    /// Custom sessions never count as default sessions.
    #[must_use]
    pub fn new(name: impl Into<String>, mut options: SessionOptions) -> Self {
        options.is_default = false;
        Self {
            name: name.into(),
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatrixOperator;

    #[test]
    fn range_length_and_index() {
        let range = OperandRange::new(3, 7);
        assert_eq!(range.len(), 5);
        assert_eq!(range.index_of(3), Some(0));
        assert_eq!(range.index_of(8), None);
        assert!(OperandRange::new(5, 4).is_empty());
        assert_eq!(OperandRange::new(5, 4).len(), 0);
    }

    #[test]
    fn default_options_follow_session_kind() {
        let add = SessionOptions::default_for(SessionType::Add);
        assert_eq!(add.order, QuestionOrder::AllShuffled);
        assert!(add.is_default);

        let matrix = SessionOptions::default_for(SessionType::Matrix(MatrixOperator::Mul));
        assert_eq!(matrix.order, QuestionOrder::Random { count: 10 });
    }

    #[test]
    fn options_outside_operand_bounds_are_rejected() {
        let mut options = SessionOptions::default_for(SessionType::Mul);
        assert_eq!(options.validate(), Ok(()));

        options.operands = OperandSource::Pool(vec![3, 4_000_000_000]);
        assert_eq!(
            options.validate(),
            Err(OptionsError::OperandOutOfBounds {
                value: 4_000_000_000
            })
        );

        options.operands = OperandSource::Range(OperandRange::new(0, 12));
        assert_eq!(
            options.validate(),
            Err(OptionsError::OperandOutOfBounds { value: 0 })
        );

        options.operands = OperandSource::Range(OPERAND_BOUNDS);
        assert_eq!(options.validate(), Ok(()));

        options.operands = OperandSource::Pool(vec![7; 1_001]);
        assert_eq!(
            options.validate(),
            Err(OptionsError::PoolTooLarge {
                len: 1_001,
                max: 1_000
            })
        );
    }

    #[test]
    fn random_counts_are_capped() {
        let mut options = SessionOptions::default_for(SessionType::Add);
        options.order = QuestionOrder::Random {
            count: MAX_QUESTION_COUNT,
        };
        assert_eq!(options.validate(), Ok(()));

        options.order = QuestionOrder::Random { count: u32::MAX };
        assert_eq!(
            options.validate(),
            Err(OptionsError::TooManyQuestions {
                requested: u32::MAX
            })
        );
    }

    #[test]
    fn templates_are_never_default() {
        let template = SessionTemplate::new("warmup", SessionOptions::default_for(SessionType::Mul));
        assert!(!template.options.is_default);
    }

    #[test]
    fn options_serialize_with_tagged_sources() {
        let options = SessionOptions {
            session_type: SessionType::Add,
            operands: OperandSource::Pool(vec![2, 3]),
            order: QuestionOrder::Random { count: 4 },
            is_default: false,
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["operands"]["pool"], serde_json::json!([2, 3]));
        assert_eq!(json["order"]["random"]["count"], 4);
        let back: SessionOptions = serde_json::from_value(json).unwrap();
        assert_eq!(back, options);
    }
}
