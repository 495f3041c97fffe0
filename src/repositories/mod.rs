pub mod question_repository;
pub mod test_attempt_repository;
pub mod test_repository;

pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use test_attempt_repository::{
    AttemptFilter, MongoTestAttemptRepository, TestAttemptRepository,
};
pub use test_repository::{MongoTestRepository, TestRepository};
