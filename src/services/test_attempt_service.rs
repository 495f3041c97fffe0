use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{attempt_owner_filter, require_owner_or_staff, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::TestAttemptRecord,
        dto::{
            request::{CreateTestAttemptRequest, TestAttemptsQuery},
            response::{CreateTestAttemptResponse, Pagination, TestAttemptListResponse},
        },
    },
    quiz::ClientMetadata,
    repositories::{AttemptFilter, TestAttemptRepository},
};

pub struct TestAttemptService {
    repository: Arc<dyn TestAttemptRepository>,
}

impl TestAttemptService {
    pub fn new(repository: Arc<dyn TestAttemptRepository>) -> Self {
        Self { repository }
    }

    /// Stores a finished attempt for `user_id`.
    pub async fn record_attempt(
        &self,
        request: CreateTestAttemptRequest,
        user_id: &str,
        seen: &ClientMetadata,
    ) -> AppResult<CreateTestAttemptResponse> {
        request.validate()?;

        let total = request.total_questions.unwrap_or_default();
        let correct = request.correct_answers.unwrap_or_default();
        if correct > total {
            return Err(AppError::ValidationError(format!(
                "correctAnswers ({}) cannot exceed totalQuestions ({})",
                correct, total
            )));
        }

        let record = self
            .repository
            .create(request.into_record(user_id, seen))
            .await?;

        log::info!(
            "Test attempt {} saved for user {} on {} ({}%)",
            record.id,
            record.user,
            record.test,
            record.score
        );

        Ok(CreateTestAttemptResponse {
            success: true,
            message: "Test result saved successfully".to_string(),
            test_attempt_id: record.id,
        })
    }

    /// One attempt with its answers. Candidates may only read their own.
    pub async fn get_attempt(&self, id: &str, caller: &Claims) -> AppResult<TestAttemptRecord> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Test attempt not found".to_string()))?;

        require_owner_or_staff(caller, &record.user)?;
        Ok(record)
    }

    pub async fn list_attempts(
        &self,
        query: TestAttemptsQuery,
        caller: &Claims,
    ) -> AppResult<TestAttemptListResponse> {
        query.validate()?;

        let filter = AttemptFilter {
            user: attempt_owner_filter(caller, query.user_id.as_deref()),
            test: query.test_id.clone(),
        };
        let (page, limit) = (query.page(), query.limit());
        let (records, total) = self
            .repository
            .find_page(&filter, query.offset(), limit)
            .await?;

        Ok(TestAttemptListResponse {
            results: records.into_iter().map(Into::into).collect(),
            pagination: Pagination::new(total, page, limit),
        })
    }
}
