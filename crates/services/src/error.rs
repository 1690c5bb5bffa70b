//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{DataError, OptionsError, QuestionOrder, ResultsError, SessionType};
use storage::sqlite::SqliteInitError;

/// Errors emitted by practice sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("{session_type} sessions do not support {order:?} ordering")]
    UnsupportedOrder {
        session_type: SessionType,
        order: QuestionOrder,
    },
    #[error("session has not been started")]
    NotStarted,
    #[error("session already started")]
    AlreadyStarted,
    #[error("session incomplete: {answered} of {total} answered")]
    Incomplete { answered: usize, total: usize },
    #[error(transparent)]
    Generate(#[from] drill_core::Error),
    #[error(transparent)]
    Results(#[from] ResultsError),
}

/// Errors emitted by `DataStore` edits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataStoreError {
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
