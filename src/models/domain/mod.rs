pub mod question;
pub mod test_attempt;
pub mod test_definition;
pub mod user;
pub use question::{DifficultyLevel, InvalidQuestion, Question, Subject};
pub use test_attempt::{AttemptAnswer, AttemptStatus, TestAttemptRecord};
pub use test_definition::{NegativeMarking, TestDefinition};
pub use user::UserRole;
