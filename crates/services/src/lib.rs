#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod sessions;
pub mod stats_view;
pub mod store;

pub use drill_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, DataStoreError, SessionError};
pub use sessions::{
    AnswerOutcome, FinishedSession, PracticeLoopService, QuestionPlan, Session, SessionProgress,
};
pub use stats_view::{HistoryListItem, OperatorStats, SessionTypeStats};
pub use store::DataStore;
