#![forbid(unsafe_code)]

//! Question generation, matrix algebra and statistics for timed drill sessions.

pub mod error;
pub mod generator;
pub mod matrix;
pub mod model;
pub mod random;
pub mod stats;
pub mod time;

pub use error::Error;
pub use matrix::{Matrix, MatrixError};
pub use random::EmptyInputError;
pub use time::Clock;
