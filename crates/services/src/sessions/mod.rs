mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::QuestionPlan;
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, Session};
pub use workflow::{FinishedSession, PracticeLoopService};
