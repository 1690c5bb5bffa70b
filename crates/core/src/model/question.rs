use serde::{Deserialize, Serialize};
use std::fmt;

use crate::matrix::Matrix;
use crate::model::{MathOperator, MatrixOperator};

/// `num1 oper num2 = ans`, always with an exact integer answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArithmeticQuestion {
    pub num1: i64,
    pub num2: i64,
    pub oper: MathOperator,
    pub ans: i64,
}

impl ArithmeticQuestion {
    /// The operand pair the question was generated from.
    ///
    /// Subtraction and division store the synthesized dividend/minuend in
    /// `num1`; the logical first operand is the answer.
    #[must_use]
    pub fn source_operands(&self) -> (i64, i64) {
        match self.oper {
            MathOperator::Sub | MathOperator::Div => (self.ans, self.num2),
            MathOperator::Add | MathOperator::Mul => (self.num1, self.num2),
        }
    }
}

impl fmt::Display for ArithmeticQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.num1, self.oper, self.num2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixQuestion {
    pub mat1: Matrix,
    pub mat2: Matrix,
    pub oper: MatrixOperator,
    pub ans: Matrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    Arithmetic(ArithmeticQuestion),
    Matrix(MatrixQuestion),
}

impl Question {
    /// Exact comparison; an answer of the wrong kind is never correct.
    #[must_use]
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (Question::Arithmetic(q), Answer::Number(n)) => q.ans == *n,
            (Question::Matrix(q), Answer::Matrix(m)) => crate::matrix::equals(&q.ans, m),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_arithmetic(&self) -> Option<&ArithmeticQuestion> {
        match self {
            Question::Arithmetic(q) => Some(q),
            Question::Matrix(_) => None,
        }
    }

    #[must_use]
    pub fn as_matrix(&self) -> Option<&MatrixQuestion> {
        match self {
            Question::Matrix(q) => Some(q),
            Question::Arithmetic(_) => None,
        }
    }
}

/// A submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Number(i64),
    Matrix(Matrix),
}

impl From<i64> for Answer {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<Matrix> for Answer {
    fn from(value: Matrix) -> Self {
        Self::Matrix(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::zeros;

    #[test]
    fn answers_of_the_wrong_kind_never_match() {
        let q = Question::Arithmetic(ArithmeticQuestion {
            num1: 0,
            num2: 0,
            oper: MathOperator::Add,
            ans: 0,
        });
        assert!(q.is_correct(&Answer::Number(0)));
        assert!(!q.is_correct(&Answer::Matrix(zeros(1, 1))));
    }

    #[test]
    fn source_operands_undo_synthesis() {
        let q = ArithmeticQuestion {
            num1: 42,
            num2: 6,
            oper: MathOperator::Div,
            ans: 7,
        };
        assert_eq!(q.source_operands(), (7, 6));
        assert_eq!(q.to_string(), "42 / 6");
    }
}
