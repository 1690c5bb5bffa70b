use thiserror::Error;

use crate::matrix::MatrixError;
use crate::model::{MathOperator, SessionType};
use crate::random::EmptyInputError;

/// Failures raised while generating questions.
///
/// Both wrapped variants indicate a programming or configuration error and
/// are meant to propagate to the caller untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    EmptyInput(#[from] EmptyInputError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("{0} sessions do not draw arithmetic operands")]
    NotArithmetic(SessionType),
    #[error("{a} {oper} {b} overflows the operand type")]
    Overflow { a: i64, b: i64, oper: MathOperator },
}
