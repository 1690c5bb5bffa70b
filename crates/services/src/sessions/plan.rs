use rand::Rng;

use drill_core::generator::{
    generate_matrix_questions, generate_questions_ordered, generate_questions_random,
    resolve_pool,
};
use drill_core::model::{
    OperandRange, OperandSource, Question, QuestionOrder, SessionOptions, SessionType,
};
use drill_core::random::shuffle;

use crate::error::SessionError;

/// Question list for a session, plus the metadata results need later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPlan {
    pub session_type: SessionType,
    pub questions: Vec<Question>,
    pub is_default: bool,
    pub operand_range: Option<OperandRange>,
}

impl QuestionPlan {
    /// Resolve operands and ordering into a concrete question list.
    ///
    /// Matrix sessions only support `QuestionOrder::Random`; their entries
    /// come from the operand range, or from the bounds of a pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Options` for operands or counts outside the
    /// session limits, `SessionError::UnsupportedOrder` for exhaustive
    /// matrix sessions, `SessionError::Empty` when no questions result, and
    /// `SessionError::Generate` for generator failures.
    pub fn build<R: Rng + ?Sized>(
        rng: &mut R,
        options: &SessionOptions,
    ) -> Result<Self, SessionError> {
        options.validate()?;
        let questions = match options.session_type.matrix_operator() {
            Some(oper) => {
                let QuestionOrder::Random { count } = options.order else {
                    return Err(SessionError::UnsupportedOrder {
                        session_type: options.session_type,
                        order: options.order,
                    });
                };
                let range = matrix_range(&options.operands).ok_or(SessionError::Empty)?;
                generate_matrix_questions(rng, oper, count_to_len(count), range)?
                    .into_iter()
                    .map(Question::Matrix)
                    .collect::<Vec<_>>()
            }
            None => {
                let pool = resolve_pool(&options.operands);
                let arithmetic = match options.order {
                    QuestionOrder::All => {
                        generate_questions_ordered(rng, options.session_type, &pool)?
                    }
                    QuestionOrder::AllShuffled => {
                        let ordered = generate_questions_ordered(rng, options.session_type, &pool)?;
                        shuffle(rng, &ordered)
                    }
                    QuestionOrder::Random { count } => generate_questions_random(
                        rng,
                        options.session_type,
                        &pool,
                        count_to_len(count),
                    )?,
                };
                arithmetic.into_iter().map(Question::Arithmetic).collect::<Vec<_>>()
            }
        };

        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            session_type: options.session_type,
            questions,
            is_default: options.is_default,
            operand_range: options.operands.range(),
        })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

fn count_to_len(count: u32) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

fn matrix_range(source: &OperandSource) -> Option<OperandRange> {
    match source {
        OperandSource::Range(range) if !range.is_empty() => Some(*range),
        OperandSource::Range(_) => None,
        OperandSource::Pool(pool) => {
            let min = pool.iter().copied().min()?;
            let max = pool.iter().copied().max()?;
            Some(OperandRange::new(min, max))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::{MAX_QUESTION_COUNT, MathOperator, MatrixOperator, OptionsError};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn default_arithmetic_plan_is_every_pair_shuffled() {
        let options = SessionOptions::default_for(SessionType::Mul);
        let plan = QuestionPlan::build(&mut rng(), &options).unwrap();

        assert_eq!(plan.total(), 144);
        assert!(plan.is_default);
        assert_eq!(plan.operand_range, Some(OperandRange::DEFAULT));

        let mut seen: Vec<(i64, i64)> = plan
            .questions
            .iter()
            .map(|q| {
                let q = q.as_arithmetic().unwrap();
                assert_eq!(q.oper, MathOperator::Mul);
                (q.num1, q.num2)
            })
            .collect();
        let in_order: Vec<_> = (1..=12).flat_map(|a| (1..=12).map(move |b| (a, b))).collect();
        assert_ne!(seen, in_order);
        seen.sort_unstable();
        assert_eq!(seen, in_order);
    }

    #[test]
    fn ordered_plan_keeps_pool_order() {
        let options = SessionOptions {
            session_type: SessionType::Add,
            operands: OperandSource::Pool(vec![5, 2]),
            order: QuestionOrder::All,
            is_default: false,
        };
        let plan = QuestionPlan::build(&mut rng(), &options).unwrap();
        let pairs: Vec<_> = plan
            .questions
            .iter()
            .map(|q| {
                let q = q.as_arithmetic().unwrap();
                (q.num1, q.num2)
            })
            .collect();
        assert_eq!(pairs, vec![(5, 5), (5, 2), (2, 5), (2, 2)]);
        assert_eq!(plan.operand_range, None);
    }

    #[test]
    fn random_plan_has_requested_length() {
        let options = SessionOptions {
            session_type: SessionType::Div,
            operands: OperandSource::Range(OperandRange::new(2, 9)),
            order: QuestionOrder::Random { count: 25 },
            is_default: false,
        };
        assert_eq!(QuestionPlan::build(&mut rng(), &options).unwrap().total(), 25);
    }

    #[test]
    fn matrix_plans_require_random_order() {
        let mut options = SessionOptions::default_for(SessionType::Matrix(MatrixOperator::Mul));
        let plan = QuestionPlan::build(&mut rng(), &options).unwrap();
        assert_eq!(plan.total(), 10);
        assert!(plan.questions.iter().all(|q| q.as_matrix().is_some()));

        options.order = QuestionOrder::AllShuffled;
        assert!(matches!(
            QuestionPlan::build(&mut rng(), &options),
            Err(SessionError::UnsupportedOrder { .. })
        ));
    }

    #[test]
    fn matrix_pool_uses_its_bounds() {
        let options = SessionOptions {
            session_type: SessionType::Matrix(MatrixOperator::Add),
            operands: OperandSource::Pool(vec![7, 3, 5]),
            order: QuestionOrder::Random { count: 4 },
            is_default: false,
        };
        let plan = QuestionPlan::build(&mut rng(), &options).unwrap();
        for question in &plan.questions {
            let q = question.as_matrix().unwrap();
            assert!(q.mat1.columns().iter().flatten().all(|v| (3..=7).contains(v)));
        }
    }

    #[test]
    fn empty_plans_are_rejected() {
        let empty_pool = SessionOptions {
            session_type: SessionType::Add,
            operands: OperandSource::Pool(Vec::new()),
            order: QuestionOrder::All,
            is_default: false,
        };
        assert_eq!(
            QuestionPlan::build(&mut rng(), &empty_pool),
            Err(SessionError::Empty)
        );

        let zero_count = SessionOptions {
            order: QuestionOrder::Random { count: 0 },
            ..SessionOptions::default_for(SessionType::Sqr)
        };
        assert_eq!(
            QuestionPlan::build(&mut rng(), &zero_count),
            Err(SessionError::Empty)
        );
    }

    #[test]
    fn operands_beyond_the_bounds_are_rejected_before_generating() {
        let options = SessionOptions {
            session_type: SessionType::Mul,
            operands: OperandSource::Pool(vec![4_000_000_000]),
            order: QuestionOrder::All,
            is_default: false,
        };
        assert_eq!(
            QuestionPlan::build(&mut rng(), &options),
            Err(SessionError::Options(OptionsError::OperandOutOfBounds {
                value: 4_000_000_000
            }))
        );

        let wide = SessionOptions {
            operands: OperandSource::Range(OperandRange::new(1, 100_000)),
            ..options
        };
        assert!(matches!(
            QuestionPlan::build(&mut rng(), &wide),
            Err(SessionError::Options(OptionsError::OperandOutOfBounds { value: 100_000 }))
        ));
    }

    #[test]
    fn oversized_random_counts_are_rejected() {
        let options = SessionOptions {
            order: QuestionOrder::Random { count: u32::MAX },
            ..SessionOptions::default_for(SessionType::Matrix(MatrixOperator::Sub))
        };
        assert_eq!(
            QuestionPlan::build(&mut rng(), &options),
            Err(SessionError::Options(OptionsError::TooManyQuestions {
                requested: u32::MAX
            }))
        );

        let at_limit = SessionOptions {
            order: QuestionOrder::Random {
                count: MAX_QUESTION_COUNT,
            },
            ..SessionOptions::default_for(SessionType::Add)
        };
        assert_eq!(
            QuestionPlan::build(&mut rng(), &at_limit).unwrap().total(),
            1_000
        );
    }
}
