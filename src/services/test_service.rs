use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Subject, TestDefinition},
        dto::{
            request::{CreateTestRequest, TestsQuery},
            response::{CreatedTest, CreateTestResponse, Pagination, TestListResponse},
        },
    },
    repositories::{QuestionRepository, TestRepository},
};

pub struct TestService {
    repository: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl TestService {
    pub fn new(repository: Arc<dyn TestRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            repository,
            questions,
        }
    }

    /// Assembles a test by drawing `questionCounts[subject]` questions from
    /// each selected subject's pool, newest first.
    pub async fn create_test(
        &self,
        request: CreateTestRequest,
        created_by: &str,
    ) -> AppResult<CreateTestResponse> {
        request.validate()?;

        if let (Some(start), Some(end)) = (request.start_time, request.end_time) {
            if end <= start {
                return Err(AppError::ValidationError(
                    "Test end time must be after its start time".to_string(),
                ));
            }
        }
        if let (Some(total), Some(passing)) = (request.total_marks, request.passing_marks) {
            if passing > total {
                return Err(AppError::ValidationError(format!(
                    "Passing marks ({}) cannot exceed total marks ({})",
                    passing, total
                )));
            }
        }

        let mut seen: Vec<Subject> = Vec::with_capacity(request.subjects.len());
        let mut question_ids = Vec::new();
        for &subject in &request.subjects {
            if seen.contains(&subject) {
                continue;
            }
            seen.push(subject);

            let count = request.count_for(subject);
            if count == 0 {
                continue;
            }
            let (picked, _) = self
                .questions
                .find_page(Some(subject), 0, i64::from(count))
                .await?;
            question_ids.extend(picked.into_iter().map(|q| q.id));
        }

        if question_ids.is_empty() {
            return Err(AppError::ValidationError("No questions selected".to_string()));
        }

        let test = self
            .repository
            .create(request.into_test(question_ids, created_by))
            .await?;
        log::info!(
            "Test {} '{}' assembled by {} with {} questions",
            test.id,
            test.title,
            created_by,
            test.questions.len()
        );

        Ok(CreateTestResponse {
            message: "Test created successfully".to_string(),
            test: CreatedTest {
                id: test.id,
                title: test.title,
            },
        })
    }

    pub async fn get_test(&self, id: &str) -> AppResult<TestDefinition> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Test not found".to_string()))
    }

    pub async fn list_tests(&self, query: TestsQuery) -> AppResult<TestListResponse> {
        query.validate()?;

        let (page, limit) = (query.page(), query.limit());
        let (tests, total) = self.repository.find_page(query.offset(), limit).await?;

        Ok(TestListResponse {
            tests,
            pagination: Pagination::new(total, page, limit),
        })
    }
}
