//! Candidate-side exam engine: the timed session state machine, scoring,
//! and the best-effort submission of results.

pub mod client_metadata;
pub mod driver;
pub mod error;
pub mod presentation;
pub mod scoring;
pub mod session;
pub mod store;
pub mod submission;

pub use client_metadata::ClientMetadata;
pub use driver::{ExamCommand, ExamDriver, ExamHandle, ExamOutcome, ExamSnapshot};
pub use error::{LoadError, PersistenceError, QuizError};
pub use presentation::{format_clock, timer_urgency, ResultView, TimerUrgency};
pub use scoring::{score, score_responses, QuestionOutcome, QuizResult};
pub use session::{Answer, Phase, Progress, QuizSession, SessionConfig};
pub use store::{HttpQuestionStore, QuestionStore};
pub use submission::{AttemptStore, HttpAttemptStore, SubmissionProtocol};
