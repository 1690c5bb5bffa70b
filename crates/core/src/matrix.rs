//! Small fixed-shape integer matrices used by matrix practice questions.
//!
//! Storage is column-major: `columns[col][row]`. A matrix is `width`
//! columns of `height` entries each.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::MatrixOperator;
use crate::random::{EmptyInputError, random_int};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Width and height of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatrixError {
    #[error("matrix {op}: incompatible shapes {left} and {right}")]
    DimensionMismatch {
        op: MatrixOperator,
        left: Shape,
        right: Shape,
    },

    #[error("column {column} has {found} rows, expected {expected}")]
    Ragged {
        column: usize,
        expected: usize,
        found: usize,
    },
}

//
// ─── MATRIX ────────────────────────────────────────────────────────────────────
//

/// Rectangular column-major grid of integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct Matrix {
    columns: Vec<Vec<i64>>,
}

impl Matrix {
    /// Build a matrix from its columns.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::Ragged` if the columns differ in length.
    pub fn from_columns(columns: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let expected = columns.first().map_or(0, Vec::len);
        if let Some((column, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, col)| col.len() != expected)
        {
            return Err(MatrixError::Ragged {
                column,
                expected,
                found: col.len(),
            });
        }
        Ok(Self { columns })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width(),
            height: self.height(),
        }
    }

    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> Option<i64> {
        self.columns.get(column)?.get(row).copied()
    }

    #[must_use]
    pub fn columns(&self) -> &[Vec<i64>] {
        &self.columns
    }

    /// Row-major view, convenient for printing.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<i64>> {
        (0..self.height())
            .map(|row| self.columns.iter().map(|col| col[row]).collect())
            .collect()
    }

    fn zip_with(
        &self,
        other: &Self,
        op: MatrixOperator,
        f: impl Fn(i64, i64) -> i64,
    ) -> Result<Self, MatrixError> {
        if self.shape() != other.shape() {
            return Err(mismatch(op, self, other));
        }
        let columns = self
            .columns
            .iter()
            .zip(&other.columns)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect())
            .collect();
        Ok(Self { columns })
    }
}

impl TryFrom<Vec<Vec<i64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(columns: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::from_columns(columns)
    }
}

impl From<Matrix> for Vec<Vec<i64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.columns
    }
}

fn mismatch(op: MatrixOperator, left: &Matrix, right: &Matrix) -> MatrixError {
    MatrixError::DimensionMismatch {
        op,
        left: left.shape(),
        right: right.shape(),
    }
}

//
// ─── OPERATIONS ────────────────────────────────────────────────────────────────
//

/// Elementwise sum.
///
/// # Errors
///
/// Returns `MatrixError::DimensionMismatch` unless both shapes are equal.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    a.zip_with(b, MatrixOperator::Add, |x, y| x + y)
}

/// Elementwise difference.
///
/// # Errors
///
/// Returns `MatrixError::DimensionMismatch` unless both shapes are equal.
pub fn sub(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    a.zip_with(b, MatrixOperator::Sub, |x, y| x - y)
}

/// Matrix product `a · b`. The result is `b.width` wide and `a.height` tall.
///
/// # Errors
///
/// Returns `MatrixError::DimensionMismatch` unless `a.width == b.height`.
pub fn mul(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    if a.width() != b.height() {
        return Err(mismatch(MatrixOperator::Mul, a, b));
    }
    let height = a.height();
    let columns = b
        .columns
        .iter()
        .map(|b_col| {
            (0..height)
                .map(|row| {
                    a.columns
                        .iter()
                        .zip(b_col)
                        .map(|(a_col, b_val)| a_col[row] * b_val)
                        .sum::<i64>()
                })
                .collect()
        })
        .collect();
    Ok(Matrix { columns })
}

/// Dispatch on a practice operator.
///
/// # Errors
///
/// Propagates `MatrixError::DimensionMismatch` from the chosen operation.
pub fn apply(op: MatrixOperator, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    match op {
        MatrixOperator::Add => add(a, b),
        MatrixOperator::Sub => sub(a, b),
        MatrixOperator::Mul => mul(a, b),
    }
}

#[must_use]
pub fn zeros(width: usize, height: usize) -> Matrix {
    Matrix {
        columns: vec![vec![0; height]; width],
    }
}

/// Matrix of independent `random_int(min, max)` entries.
///
/// # Errors
///
/// Returns `EmptyInputError` when `min >= max` and the matrix is non-empty.
pub fn random<R: Rng + ?Sized>(
    rng: &mut R,
    width: usize,
    height: usize,
    min: i64,
    max: i64,
) -> Result<Matrix, EmptyInputError> {
    let columns = (0..width)
        .map(|_| {
            (0..height)
                .map(|_| random_int(&mut *rng, min, max))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Matrix { columns })
}

/// Same shape and same entries.
#[must_use]
pub fn equals(a: &Matrix, b: &Matrix) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn m(columns: &[&[i64]]) -> Matrix {
        Matrix::from_columns(columns.iter().map(|c| c.to_vec()).collect()).unwrap()
    }

    #[test]
    fn adds_and_subtracts_elementwise() {
        let a = m(&[&[1, 2, 3], &[4, 5, 6]]);
        let b = m(&[&[7, 8, 9], &[10, 11, 12]]);

        assert_eq!(add(&a, &b).unwrap(), m(&[&[8, 10, 12], &[14, 16, 18]]));
        assert_eq!(sub(&a, &b).unwrap(), m(&[&[-6, -6, -6], &[-6, -6, -6]]));
    }

    #[test]
    fn add_then_subtract_recovers_left_operand() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let a = random(&mut rng, 3, 2, -50, 50).unwrap();
            let b = random(&mut rng, 3, 2, -50, 50).unwrap();
            assert_eq!(sub(&add(&a, &b).unwrap(), &b).unwrap(), a);
        }
    }

    #[test]
    fn multiplies_column_major_operands() {
        let a = m(&[&[1, 4], &[2, 5], &[3, 6]]);
        let b = m(&[&[1, 3, 5], &[2, 4, 6]]);

        let product = mul(&a, &b).unwrap();
        assert_eq!(product, m(&[&[22, 49], &[28, 64]]));
        assert_eq!(product.shape(), Shape { width: 2, height: 2 });
    }

    #[test]
    fn multiply_result_has_b_width_and_a_height() {
        let a = m(&[&[1, 2, 3]]);
        let b = m(&[&[2], &[3]]);

        let product = mul(&a, &b).unwrap();
        assert_eq!(product.shape(), Shape { width: 2, height: 3 });
        assert_eq!(product, m(&[&[2, 4, 6], &[3, 6, 9]]));
    }

    #[test]
    fn multiplication_is_associative_on_samples() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..10 {
            let a = random(&mut rng, 3, 2, -9, 10).unwrap();
            let b = random(&mut rng, 4, 3, -9, 10).unwrap();
            let c = random(&mut rng, 2, 4, -9, 10).unwrap();
            let left = mul(&mul(&a, &b).unwrap(), &c).unwrap();
            let right = mul(&a, &mul(&b, &c).unwrap()).unwrap();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn incompatible_shapes_are_reported() {
        let a = zeros(1, 2);
        let b = zeros(2, 1);

        assert!(matches!(
            add(&a, &b),
            Err(MatrixError::DimensionMismatch { op: MatrixOperator::Add, .. })
        ));
        assert!(matches!(
            sub(&a, &b),
            Err(MatrixError::DimensionMismatch { op: MatrixOperator::Sub, .. })
        ));
        assert!(matches!(
            mul(&a, &zeros(1, 3)),
            Err(MatrixError::DimensionMismatch { op: MatrixOperator::Mul, .. })
        ));
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Matrix::from_columns(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::Ragged {
                column: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn equality_requires_same_shape() {
        assert!(equals(&zeros(2, 2), &zeros(2, 2)));
        assert!(!equals(&zeros(1, 2), &zeros(2, 1)));
        assert!(!equals(&m(&[&[1, 2]]), &m(&[&[1, 3]])));
    }

    #[test]
    fn random_entries_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let mat = random(&mut rng, 4, 4, 1, 13).unwrap();
        assert!(mat.columns().iter().flatten().all(|v| (1..13).contains(v)));
        assert_eq!(random(&mut rng, 1, 1, 3, 3), Err(EmptyInputError));
    }

    #[test]
    fn rows_transpose_storage() {
        let a = m(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(a.rows(), vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
    }

    #[test]
    fn serde_rejects_ragged_payload() {
        let ok: Matrix = serde_json::from_str("[[1,2],[3,4]]").unwrap();
        assert_eq!(ok.get(1, 0), Some(3));
        assert!(serde_json::from_str::<Matrix>("[[1,2],[3]]").is_err());
    }
}
