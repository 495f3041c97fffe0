pub mod question_service;
pub mod test_attempt_service;
pub mod test_service;

pub use question_service::QuestionService;
pub use test_attempt_service::TestAttemptService;
pub use test_service::TestService;
