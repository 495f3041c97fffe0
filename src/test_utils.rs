use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Question, Subject, TestAttemptRecord, TestDefinition},
    repositories::{AttemptFilter, QuestionRepository, TestAttemptRepository, TestRepository},
};

pub mod fixtures {
    use chrono::{Duration, Utc};

    use crate::{
        auth::Claims,
        models::domain::{Question, Subject, TestAttemptRecord, TestDefinition, UserRole},
        quiz::{score_responses, Answer, ClientMetadata},
    };

    /// Four-option question on `subject`, created `age_minutes` ago.
    pub fn question(subject: Subject, correct: usize, age_minutes: i64) -> Question {
        let mut question = Question::new(
            &format!("{} question {}", subject.title(), age_minutes),
            vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct,
            subject,
        );
        question.created_at = Some(Utc::now() - Duration::minutes(age_minutes));
        question
    }

    /// Three web development questions and two data science questions.
    pub fn question_bank() -> Vec<Question> {
        vec![
            question(Subject::WebDevelopment, 0, 30),
            question(Subject::WebDevelopment, 1, 20),
            question(Subject::WebDevelopment, 2, 10),
            question(Subject::DataScience, 3, 5),
            question(Subject::DataScience, 0, 1),
        ]
    }

    pub fn claims(user_id: &str, role: UserRole) -> Claims {
        Claims::new(user_id, &format!("{}@example.com", user_id), role, 1)
    }

    /// A ten-question attempt scoring `percentage`.
    pub fn attempt_record(user_id: &str, test_id: &str, percentage: i32) -> TestAttemptRecord {
        let questions: Vec<Question> = (0..10)
            .map(|i| question(Subject::WebDevelopment, 0, i))
            .collect();
        let correct = (percentage / 10) as usize;
        let responses: Vec<Answer> = (0..10)
            .map(|i| if i < correct { Answer::Selected(0) } else { Answer::Selected(1) })
            .collect();
        let ended_at = Utc::now();
        let result = score_responses(
            &questions,
            &responses,
            ended_at - Duration::seconds(300),
            ended_at,
        );

        TestAttemptRecord::from_result(&result, test_id, user_id, &ClientMetadata::default())
    }

    /// A web development test over `question_ids`, created `age_minutes` ago.
    pub fn test_definition(title: &str, question_ids: &[&str], age_minutes: i64) -> TestDefinition {
        let mut test = TestDefinition::new(
            title,
            vec![Subject::WebDevelopment],
            question_ids.iter().map(|id| id.to_string()).collect(),
            "examiner-1",
        );
        test.created_at = Utc::now() - Duration::minutes(age_minutes);
        test
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

fn page_of<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    let start = offset.max(0) as usize;
    let end = start.saturating_add(limit.max(0) as usize).min(items.len());
    if start >= items.len() {
        vec![]
    } else {
        items[start..end].to_vec()
    }
}

pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<HashMap<String, Question>>>,
    healthy: bool,
}

impl InMemoryQuestionRepository {
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(RwLock::new(
                questions.into_iter().map(|q| (q.id.clone(), q)).collect(),
            )),
            healthy: true,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::with_questions(vec![])
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_page(
        &self,
        subject: Option<Subject>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Question>, i64)> {
        let questions = self.questions.read().await;
        let mut items: Vec<Question> = questions
            .values()
            .filter(|q| subject.map_or(true, |s| q.subject == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok((page_of(&items, offset, limit), items.len() as i64))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(AppError::AlreadyExists(format!("Question with id '{}'", question.id)));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn create_many(&self, batch: Vec<Question>) -> AppResult<Vec<Question>> {
        let mut questions = self.questions.write().await;
        if let Some(duplicate) = batch.iter().find(|q| questions.contains_key(&q.id)) {
            return Err(AppError::AlreadyExists(format!(
                "Question with id '{}'",
                duplicate.id
            )));
        }
        for question in &batch {
            questions.insert(question.id.clone(), question.clone());
        }
        Ok(batch)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        match questions.get_mut(&question.id) {
            Some(stored) => {
                *stored = question.clone();
                Ok(question)
            }
            None => Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            ))),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.questions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    async fn count_by_subject(&self, subject: Subject) -> AppResult<u64> {
        let questions = self.questions.read().await;
        Ok(questions.values().filter(|q| q.subject == subject).count() as u64)
    }

    async fn health_check(&self) -> AppResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::DatabaseError("ping failed".to_string()))
        }
    }
}

pub struct InMemoryTestAttemptRepository {
    records: Arc<RwLock<HashMap<String, TestAttemptRecord>>>,
}

impl InMemoryTestAttemptRepository {
    pub fn new() -> Self {
        Self::with_records(vec![])
    }

    pub fn with_records(records: Vec<TestAttemptRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(
                records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            )),
        }
    }

    pub async fn get(&self, id: &str) -> Option<TestAttemptRecord> {
        self.records.read().await.get(id).cloned()
    }
}

#[async_trait]
impl TestAttemptRepository for InMemoryTestAttemptRepository {
    async fn create(&self, record: TestAttemptRecord) -> AppResult<TestAttemptRecord> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestAttemptRecord>> {
        Ok(self.get(id).await)
    }

    async fn find_page(
        &self,
        filter: &AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestAttemptRecord>, i64)> {
        let records = self.records.read().await;
        let mut items: Vec<TestAttemptRecord> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.end_time.cmp(&a.end_time));

        Ok((page_of(&items, offset, limit), items.len() as i64))
    }
}

pub struct InMemoryTestRepository {
    tests: Arc<RwLock<HashMap<String, TestDefinition>>>,
}

impl InMemoryTestRepository {
    pub fn new() -> Self {
        Self::with_tests(vec![])
    }

    pub fn with_tests(tests: Vec<TestDefinition>) -> Self {
        Self {
            tests: Arc::new(RwLock::new(
                tests.into_iter().map(|t| (t.id.clone(), t)).collect(),
            )),
        }
    }
}

#[async_trait]
impl TestRepository for InMemoryTestRepository {
    async fn create(&self, test: TestDefinition) -> AppResult<TestDefinition> {
        let mut tests = self.tests.write().await;
        if tests.contains_key(&test.id) {
            return Err(AppError::AlreadyExists(format!("Test with id '{}'", test.id)));
        }
        tests.insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestDefinition>> {
        Ok(self.tests.read().await.get(id).cloned())
    }

    async fn find_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<TestDefinition>, i64)> {
        let tests = self.tests.read().await;
        let mut items: Vec<TestDefinition> = tests.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok((page_of(&items, offset, limit), items.len() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_question_bank_is_well_formed() {
        let bank = question_bank();
        assert_eq!(bank.len(), 5);
        assert!(bank.iter().all(|q| q.check_shape().is_ok()));
    }

    #[test]
    fn test_attempt_record_hits_requested_percentage() {
        let record = attempt_record("cand-1", "web-development", 70);
        assert_eq!(record.score, 70);
        assert_eq!(record.correct_answers, 7);
        assert!(record.passed());
    }
}
