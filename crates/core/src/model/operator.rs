use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four arithmetic drill operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl MathOperator {
    pub const ALL: [MathOperator; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "Addition",
            Self::Sub => "Subtraction",
            Self::Mul => "Multiplication",
            Self::Div => "Division",
        }
    }
}

impl fmt::Display for MathOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Operators available for matrix questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixOperator {
    Add,
    Sub,
    Mul,
}

impl MatrixOperator {
    pub const ALL: [MatrixOperator; 3] = [Self::Add, Self::Sub, Self::Mul];

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Sub => "subtraction",
            Self::Mul => "multiplication",
        }
    }
}

impl fmt::Display for MatrixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of practice session.
///
/// `Mix` draws a random operator per question, `Sqr` only asks `n * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Add,
    Sub,
    Mul,
    Div,
    Mix,
    Sqr,
    Matrix(MatrixOperator),
}

impl SessionType {
    /// Session types that draw from an operand pool.
    pub const ARITHMETIC: [SessionType; 6] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mix,
        Self::Sqr,
    ];

    #[must_use]
    pub fn from_operator(oper: MathOperator) -> Self {
        match oper {
            MathOperator::Add => Self::Add,
            MathOperator::Sub => Self::Sub,
            MathOperator::Mul => Self::Mul,
            MathOperator::Div => Self::Div,
        }
    }

    /// The single operator this session drills, if it has exactly one.
    #[must_use]
    pub fn operator(self) -> Option<MathOperator> {
        match self {
            Self::Add => Some(MathOperator::Add),
            Self::Sub => Some(MathOperator::Sub),
            Self::Mul => Some(MathOperator::Mul),
            Self::Div => Some(MathOperator::Div),
            Self::Mix | Self::Sqr | Self::Matrix(_) => None,
        }
    }

    #[must_use]
    pub fn matrix_operator(self) -> Option<MatrixOperator> {
        match self {
            Self::Matrix(op) => Some(op),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mix => "Mixed",
            Self::Sqr => "Squares",
            Self::Matrix(MatrixOperator::Add) => "Matrix Addition",
            Self::Matrix(MatrixOperator::Sub) => "Matrix Subtraction",
            Self::Matrix(MatrixOperator::Mul) => "Matrix Multiplication",
            other => other.operator().map_or("", MathOperator::name),
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mix => "mix",
            Self::Sqr => "sqr",
            Self::Matrix(MatrixOperator::Add) => "matrix-add",
            Self::Matrix(MatrixOperator::Sub) => "matrix-sub",
            Self::Matrix(MatrixOperator::Mul) => "matrix-mul",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown session type: {0}")]
pub struct ParseSessionTypeError(pub String);

impl FromStr for SessionType {
    type Err = ParseSessionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        SessionType::ARITHMETIC
            .into_iter()
            .chain(MatrixOperator::ALL.into_iter().map(SessionType::Matrix))
            .find(|ty| ty.key() == normalized)
            .ok_or_else(|| ParseSessionTypeError(s.to_owned()))
    }
}
