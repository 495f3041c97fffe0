use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::MAX_BULK_QUESTIONS,
    errors::{AppError, AppResult},
    models::{
        domain::{Question, Subject},
        dto::{
            request::{
                BulkAddQuestionsRequest, CreateQuestionRequest, QuestionsQuery,
                UpdateQuestionRequest,
            },
            response::{
                ApiResponse, BulkAddResponse, CreateQuestionResponse, DeleteResponse, Pagination,
                QuestionListResponse, RejectedQuestion, SubjectStat, UpdateQuestionResponse,
            },
        },
    },
    repositories::QuestionRepository,
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_questions(&self, query: QuestionsQuery) -> AppResult<QuestionListResponse> {
        query.validate()?;

        let subject = query.subject_filter()?;
        let (page, limit) = (query.page(), query.limit());
        let (questions, total) = self
            .repository
            .find_page(subject, query.offset(), limit)
            .await?;

        Ok(QuestionListResponse {
            questions,
            pagination: Pagination::new(total, page, limit),
        })
    }

    pub async fn get_question(&self, id: &str) -> AppResult<Question> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    pub async fn create_question(
        &self,
        request: CreateQuestionRequest,
        created_by: &str,
    ) -> AppResult<CreateQuestionResponse> {
        request.validate()?;

        let question = request.into_question(created_by);
        question.check_shape()?;

        let question = self.repository.create(question).await?;
        log::info!(
            "Question {} added to {} by {}",
            question.id,
            question.subject,
            created_by
        );

        Ok(ApiResponse {
            data: question,
            message: "Question added successfully".to_string(),
        })
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: UpdateQuestionRequest,
    ) -> AppResult<UpdateQuestionResponse> {
        request.validate()?;

        let mut question = self.get_question(id).await?;
        request.apply_to(&mut question);
        question.check_shape()?;

        let question = self.repository.update(question).await?;
        log::info!("Question {} updated", question.id);

        Ok(ApiResponse {
            data: question,
            message: "Question updated successfully".to_string(),
        })
    }

    /// Stores every well-formed item and reports the rest by index. Only an
    /// empty or oversized batch fails as a whole.
    pub async fn bulk_add_questions(
        &self,
        request: BulkAddQuestionsRequest,
        created_by: &str,
    ) -> AppResult<BulkAddResponse> {
        let total_submitted = request.questions.len();
        if total_submitted == 0 {
            return Err(AppError::ValidationError(
                "Request must include a non-empty array of questions".to_string(),
            ));
        }
        if total_submitted > MAX_BULK_QUESTIONS {
            return Err(AppError::ValidationError(format!(
                "At most {} questions can be added at once",
                MAX_BULK_QUESTIONS
            )));
        }

        let mut valid = Vec::new();
        let mut rejected = Vec::new();
        for (index, item) in request.questions.into_iter().enumerate() {
            match parse_bulk_item(item, created_by) {
                Ok(question) => valid.push(question),
                Err(reason) => rejected.push(RejectedQuestion { index, reason }),
            }
        }

        let valid_count = valid.len();
        let inserted = self.repository.create_many(valid).await?;
        log::info!(
            "Bulk add by {}: {} of {} questions stored",
            created_by,
            inserted.len(),
            total_submitted
        );

        Ok(BulkAddResponse {
            success: true,
            message: format!("Added {} questions successfully", inserted.len()),
            total_submitted,
            valid_count,
            invalid_count: rejected.len(),
            invalid_questions: rejected,
        })
    }

    pub async fn delete_question(&self, id: &str) -> AppResult<DeleteResponse> {
        self.repository.delete(id).await?;
        log::info!("Question {} deleted", id);

        Ok(DeleteResponse {
            message: "Question deleted successfully".to_string(),
        })
    }

    /// Question count for every subject, including subjects with none.
    pub async fn subject_stats(&self) -> AppResult<Vec<SubjectStat>> {
        let mut stats = Vec::with_capacity(Subject::ALL.len());
        for subject in Subject::ALL {
            let count = self.repository.count_by_subject(subject).await?;
            stats.push(SubjectStat::new(subject, count));
        }
        Ok(stats)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }
}

fn parse_bulk_item(item: serde_json::Value, created_by: &str) -> Result<Question, String> {
    let request: CreateQuestionRequest =
        serde_json::from_value(item).map_err(|e| format!("Malformed question: {}", e))?;
    request
        .validate()
        .map_err(|e| AppError::from(e).to_string())?;

    let question = request.into_question(created_by);
    question
        .check_shape()
        .map_err(|e| AppError::from(e).to_string())?;
    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::DifficultyLevel;
    use crate::test_utils::{fixtures, InMemoryQuestionRepository};

    fn service_with(questions: Vec<Question>) -> QuestionService {
        QuestionService::new(Arc::new(InMemoryQuestionRepository::with_questions(questions)))
    }

    fn create_request(options: usize, correct: usize) -> CreateQuestionRequest {
        CreateQuestionRequest {
            question: "Which tag creates a hyperlink?".to_string(),
            options: (0..options).map(|i| format!("<tag{}>", i)).collect(),
            correct_answer: correct,
            subject: Subject::WebDevelopment,
            difficulty_level: DifficultyLevel::Easy,
            marks: None,
            explanation: None,
        }
    }

    #[tokio::test]
    async fn test_list_questions_filters_and_paginates() {
        let service = service_with(fixtures::question_bank());

        let response = service
            .list_questions(QuestionsQuery {
                subject: Some("web-development".to_string()),
                page: Some(1),
                limit: Some(2),
            })
            .await
            .unwrap();

        assert_eq!(response.questions.len(), 2);
        assert!(response
            .questions
            .iter()
            .all(|q| q.subject == Subject::WebDevelopment));
        assert_eq!(response.pagination.total, 3);
        assert_eq!(response.pagination.pages, 2);
    }

    #[tokio::test]
    async fn test_list_questions_rejects_unknown_subject() {
        let service = service_with(vec![]);
        let result = service
            .list_questions(QuestionsQuery {
                subject: Some("cooking".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_question_checks_correct_index() {
        let service = service_with(vec![]);

        let result = service.create_question(create_request(3, 3), "examiner-1").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let created = service
            .create_question(create_request(3, 1), "examiner-1")
            .await
            .unwrap();
        assert_eq!(created.data.created_by.as_deref(), Some("examiner-1"));
        assert_eq!(created.data.marks, 1);
    }

    #[tokio::test]
    async fn test_get_and_delete_missing_question() {
        let service = service_with(vec![]);

        assert!(matches!(
            service.get_question("nope").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_question("nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_subject_stats_cover_every_subject() {
        let service = service_with(fixtures::question_bank());
        let stats = service.subject_stats().await.unwrap();

        assert_eq!(stats.len(), Subject::ALL.len());
        let web = stats
            .iter()
            .find(|s| s.id == Subject::WebDevelopment)
            .unwrap();
        assert_eq!(web.count, 3);
        assert_eq!(web.name, "Web Development");
    }

    #[tokio::test]
    async fn test_update_question_keeps_id_and_rechecks_shape() {
        let original = fixtures::question(Subject::WebDevelopment, 0, 5);
        let id = original.id.clone();
        let service = service_with(vec![original]);

        let result = service.update_question(&id, create_request(2, 4)).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let updated = service
            .update_question(&id, create_request(3, 2))
            .await
            .unwrap();
        assert_eq!(updated.message, "Question updated successfully");
        assert_eq!(updated.data.id, id);
        assert_eq!(updated.data.correct_option_index, 2);

        let stored = service.get_question(&id).await.unwrap();
        assert_eq!(stored.text, "Which tag creates a hyperlink?");
        assert_eq!(stored.options.len(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_question_is_not_found() {
        let service = service_with(vec![]);
        let result = service.update_question("nope", create_request(2, 0)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bulk_add_reports_rejects_by_index() {
        let service = service_with(vec![]);
        let request: BulkAddQuestionsRequest = serde_json::from_value(serde_json::json!({
            "questions": [
                {"question": "2 + 2?", "options": ["3", "4"], "correctAnswer": 1, "subject": "data-science"},
                {"question": "Missing options", "correctAnswer": 0, "subject": "data-science"},
                {"question": "Out of range", "options": ["a", "b"], "correctAnswer": 5, "subject": "web-development"},
                {"question": "Best codec?", "options": ["H.264", "GIF"], "correctAnswer": 0, "subject": "video-editing", "marks": 2}
            ]
        }))
        .unwrap();

        let response = service.bulk_add_questions(request, "admin-1").await.unwrap();

        assert_eq!(response.total_submitted, 4);
        assert_eq!(response.valid_count, 2);
        assert_eq!(response.invalid_count, 2);
        assert_eq!(response.message, "Added 2 questions successfully");
        let indices: Vec<usize> = response.invalid_questions.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(response.invalid_questions[1].reason.starts_with("Invalid question:"));

        let stats = service.subject_stats().await.unwrap();
        let stored: u64 = stats.iter().map(|s| s.count).sum();
        assert_eq!(stored, 2);
    }

    #[tokio::test]
    async fn test_bulk_add_rejects_empty_batch() {
        let service = service_with(vec![]);
        let result = service
            .bulk_add_questions(BulkAddQuestionsRequest { questions: vec![] }, "admin-1")
            .await;

        match result {
            Err(AppError::ValidationError(message)) => {
                assert_eq!(message, "Request must include a non-empty array of questions")
            }
            other => panic!("expected validation error, got {:?}", other.map(|r| r.message)),
        }
    }

    #[tokio::test]
    async fn test_huge_page_number_returns_empty_page() {
        let service = service_with(fixtures::question_bank());
        let response = service
            .list_questions(QuestionsQuery {
                subject: None,
                page: Some(i64::MAX),
                limit: Some(10),
            })
            .await
            .unwrap();

        assert!(response.questions.is_empty());
        assert_eq!(response.pagination.total, 5);
    }
}
