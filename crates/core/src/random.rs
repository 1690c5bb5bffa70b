//! Uniform integer, choice and shuffle helpers over any `rand::Rng`.
//!
//! Every helper takes the generator explicitly so sessions can run on
//! `rand::rng()` while tests pin a seeded `StdRng`.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

/// A random draw was requested from an empty interval or collection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot draw a random value from empty input")]
pub struct EmptyInputError;

/// Uniform integer in `[min, max)`.
///
/// # Errors
///
/// Returns `EmptyInputError` when `min >= max`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> Result<i64, EmptyInputError> {
    if min >= max {
        return Err(EmptyInputError);
    }
    Ok(rng.random_range(min..max))
}

/// Uniform integer in `[0, bound)`.
///
/// # Errors
///
/// Returns `EmptyInputError` when `bound <= 0`.
pub fn random_below<R: Rng + ?Sized>(rng: &mut R, bound: i64) -> Result<i64, EmptyInputError> {
    random_int(rng, 0, bound)
}

/// Uniformly pick one element.
///
/// # Errors
///
/// Returns `EmptyInputError` when `items` is empty.
pub fn random_choice<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    items: &'a [T],
) -> Result<&'a T, EmptyInputError> {
    if items.is_empty() {
        return Err(EmptyInputError);
    }
    items.get(rng.random_range(0..items.len())).ok_or(EmptyInputError)
}

/// Fisher–Yates shuffle into a new vector; `items` is left untouched.
#[must_use]
pub fn shuffle<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.as_mut_slice().shuffle(rng);
    out
}
