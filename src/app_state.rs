use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuestionRepository, MongoTestAttemptRepository, MongoTestRepository,
        QuestionRepository, TestAttemptRepository, TestRepository,
    },
    services::{QuestionService, TestAttemptService, TestService},
};

#[derive(Clone)]
pub struct AppState {
    pub question_service: Arc<QuestionService>,
    pub test_attempt_service: Arc<TestAttemptService>,
    pub test_service: Arc<TestService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let test_attempt_repository = Arc::new(MongoTestAttemptRepository::new(&db));
        test_attempt_repository.ensure_indexes().await?;

        let test_repository = Arc::new(MongoTestRepository::new(&db));
        test_repository.ensure_indexes().await?;

        Ok(Self::from_repositories(
            question_repository,
            test_attempt_repository,
            test_repository,
            config,
        ))
    }

    pub fn from_repositories(
        question_repository: Arc<dyn QuestionRepository>,
        test_attempt_repository: Arc<dyn TestAttemptRepository>,
        test_repository: Arc<dyn TestRepository>,
        config: Config,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            question_service: Arc::new(QuestionService::new(question_repository.clone())),
            test_attempt_service: Arc::new(TestAttemptService::new(test_attempt_repository)),
            test_service: Arc::new(TestService::new(test_repository, question_repository)),
            jwt_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(
        questions: Vec<crate::models::domain::Question>,
        attempts: Vec<crate::models::domain::TestAttemptRecord>,
    ) -> Self {
        use crate::test_utils::{
            InMemoryQuestionRepository, InMemoryTestAttemptRepository, InMemoryTestRepository,
        };

        Self::from_repositories(
            Arc::new(InMemoryQuestionRepository::with_questions(questions)),
            Arc::new(InMemoryTestAttemptRepository::with_records(attempts)),
            Arc::new(InMemoryTestRepository::new()),
            Config::test_config(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_jwt_service_uses_configured_expiry() {
        let state = AppState::for_tests(vec![], vec![]);
        assert_eq!(
            state.jwt_service.expiration_hours(),
            state.config.jwt_expiration_hours
        );
    }
}
