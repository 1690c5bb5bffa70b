//! Question generation for arithmetic and matrix drills.
//!
//! Subtraction and division are generated backwards from an addition or
//! multiplication over the same operands, so every answer is an exact
//! integer drawn from the operand pool:
//!
//! | oper | num1  | num2 | ans   |
//! |------|-------|------|-------|
//! | add  | a     | b    | a + b |
//! | sub  | a + b | b    | a     |
//! | mul  | a     | b    | a * b |
//! | div  | a * b | b    | a     |

use rand::Rng;

use crate::error::Error;
use crate::matrix;
use crate::model::{
    ArithmeticQuestion, MathOperator, MatrixOperator, MatrixQuestion, OperandRange, OperandSource,
    SessionType,
};
use crate::random::random_choice;

/// Build one question from a sampled operand pair.
///
/// # Errors
///
/// Returns `Error::Overflow` if the sum or product does not fit in `i64`.
pub fn generate_question(
    a: i64,
    b: i64,
    oper: MathOperator,
) -> Result<ArithmeticQuestion, Error> {
    let overflow = || Error::Overflow { a, b, oper };
    let (num1, ans) = match oper {
        MathOperator::Add => (a, a.checked_add(b).ok_or_else(overflow)?),
        MathOperator::Sub => (a.checked_add(b).ok_or_else(overflow)?, a),
        MathOperator::Mul => (a, a.checked_mul(b).ok_or_else(overflow)?),
        MathOperator::Div => (a.checked_mul(b).ok_or_else(overflow)?, a),
    };
    Ok(ArithmeticQuestion {
        num1,
        num2: b,
        oper,
        ans,
    })
}

/// Operands a session draws from: the inclusive range, or the pool as given.
#[must_use]
pub fn resolve_pool(source: &OperandSource) -> Vec<i64> {
    match source {
        OperandSource::Range(range) => range.values(),
        OperandSource::Pool(pool) => pool.clone(),
    }
}

/// How a session type picks the operator for each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperatorRule {
    Fixed(MathOperator),
    Mixed,
    Squares,
}

impl OperatorRule {
    fn for_session(session_type: SessionType) -> Result<Self, Error> {
        match session_type {
            SessionType::Mix => Ok(Self::Mixed),
            SessionType::Sqr => Ok(Self::Squares),
            SessionType::Matrix(_) => Err(Error::NotArithmetic(session_type)),
            other => other
                .operator()
                .map(Self::Fixed)
                .ok_or(Error::NotArithmetic(other)),
        }
    }
}

/// Every ordered pair of the pool, in pool order.
///
/// `Sqr` keeps only pairs with equal operands, so it yields `pool.len()`
/// questions; every other type yields `pool.len()²`.
///
/// # Errors
///
/// Returns `Error::NotArithmetic` for matrix session types.
pub fn generate_questions_ordered<R: Rng + ?Sized>(
    rng: &mut R,
    session_type: SessionType,
    pool: &[i64],
) -> Result<Vec<ArithmeticQuestion>, Error> {
    let rule = OperatorRule::for_session(session_type)?;
    let mut questions = Vec::with_capacity(pool.len() * pool.len());

    for (i, &a) in pool.iter().enumerate() {
        for (j, &b) in pool.iter().enumerate() {
            let oper = match rule {
                OperatorRule::Fixed(oper) => oper,
                OperatorRule::Mixed => *random_choice(rng, &MathOperator::ALL)?,
                OperatorRule::Squares => {
                    if i != j {
                        continue;
                    }
                    MathOperator::Mul
                }
            };
            questions.push(generate_question(a, b, oper)?);
        }
    }

    Ok(questions)
}

/// `count` independent questions with operands drawn uniformly from `pool`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `pool` is empty and `count > 0`, or
/// `Error::NotArithmetic` for matrix session types.
pub fn generate_questions_random<R: Rng + ?Sized>(
    rng: &mut R,
    session_type: SessionType,
    pool: &[i64],
    count: usize,
) -> Result<Vec<ArithmeticQuestion>, Error> {
    let rule = OperatorRule::for_session(session_type)?;
    let mut questions = Vec::with_capacity(count);

    for _ in 0..count {
        let question = match rule {
            OperatorRule::Fixed(oper) => {
                let a = *random_choice(rng, pool)?;
                let b = *random_choice(rng, pool)?;
                generate_question(a, b, oper)?
            }
            OperatorRule::Mixed => {
                let oper = *random_choice(rng, &MathOperator::ALL)?;
                let a = *random_choice(rng, pool)?;
                let b = *random_choice(rng, pool)?;
                generate_question(a, b, oper)?
            }
            OperatorRule::Squares => {
                let a = *random_choice(rng, pool)?;
                generate_question(a, a, MathOperator::Mul)?
            }
        };
        questions.push(question);
    }

    Ok(questions)
}

/// `amount` matrix questions with entries drawn from `range` (inclusive).
///
/// Multiplication pairs a 1x2 with a 2x1 matrix; addition and subtraction
/// use two 1x2 matrices so the shapes always agree.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty range and propagates
/// `Error::Matrix` if the operand shapes are inconsistent.
pub fn generate_matrix_questions<R: Rng + ?Sized>(
    rng: &mut R,
    oper: MatrixOperator,
    amount: usize,
    range: OperandRange,
) -> Result<Vec<MatrixQuestion>, Error> {
    let (min, max) = (range.min, range.max.saturating_add(1));
    let (width2, height2) = match oper {
        MatrixOperator::Mul => (2, 1),
        MatrixOperator::Add | MatrixOperator::Sub => (1, 2),
    };

    (0..amount)
        .map(|_| {
            let mat1 = matrix::random(&mut *rng, 1, 2, min, max)?;
            let mat2 = matrix::random(&mut *rng, width2, height2, min, max)?;
            let ans = matrix::apply(oper, &mat1, &mat2)?;
            Ok(MatrixQuestion {
                mat1,
                mat2,
                oper,
                ans,
            })
        })
        .collect()
}
