use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};
use crate::models::domain::{
    AttemptAnswer, AttemptStatus, DifficultyLevel, NegativeMarking, Question, Subject,
    TestAttemptRecord, TestDefinition,
};
use crate::quiz::ClientMetadata;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct QuestionsQuery {
    pub subject: Option<String>,

    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl QuestionsQuery {
    /// `None` for an absent subject or `all`.
    pub fn subject_filter(&self) -> AppResult<Option<Subject>> {
        match self.subject.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => raw
                .parse::<Subject>()
                .map(Some)
                .map_err(|e| AppError::ValidationError(e.to_string())),
        }
    }

    pub fn page(&self) -> i64 {
        page_number(self.page)
    }

    pub fn limit(&self) -> i64 {
        page_size(self.limit)
    }

    pub fn offset(&self) -> i64 {
        page_offset(self.page(), self.limit())
    }
}

fn page_number(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

fn page_size(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Rows to skip. Saturates instead of overflowing for absurd page numbers,
/// which then simply land past the last row.
fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,

    #[validate(length(min = 2, max = 10, message = "A question needs between 2 and 10 options"))]
    pub options: Vec<String>,

    pub correct_answer: usize,

    pub subject: Subject,

    #[serde(default)]
    pub difficulty_level: DifficultyLevel,

    #[validate(range(min = 1, max = 100))]
    pub marks: Option<u32>,

    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
}

impl CreateQuestionRequest {
    pub fn into_question(self, created_by: &str) -> Question {
        let mut question = Question::new(
            &self.question,
            self.options,
            self.correct_answer,
            self.subject,
        );
        question.difficulty_level = self.difficulty_level;
        question.marks = self.marks.unwrap_or(1);
        question.explanation = self.explanation;
        question.created_by = Some(created_by.to_string());
        question
    }

    /// Overwrites the authored fields of `question`. Id, author and creation
    /// time are kept.
    pub fn apply_to(self, question: &mut Question) {
        question.text = self.question;
        question.options = self.options;
        question.correct_option_index = self.correct_answer;
        question.subject = self.subject;
        question.difficulty_level = self.difficulty_level;
        if let Some(marks) = self.marks {
            question.marks = marks;
        }
        question.explanation = self.explanation;
    }
}

/// `PUT /api/questions/{id}` takes the same body as creation.
pub type UpdateQuestionRequest = CreateQuestionRequest;

/// Body of `POST /api/questions/bulk-add`. Items stay raw so that one
/// malformed entry is reported by index instead of failing the whole body.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkAddQuestionsRequest {
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
}

/// Body of `POST /api/tests`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Test title is required"))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "At least one subject must be selected"))]
    pub subjects: Vec<Subject>,

    /// How many questions to draw from each selected subject.
    #[serde(default)]
    pub question_counts: HashMap<Subject, u32>,

    /// Minutes.
    #[validate(range(min = 1, max = 600))]
    pub duration: Option<u32>,

    pub total_marks: Option<u32>,

    pub passing_marks: Option<u32>,

    pub randomize_questions: Option<bool>,

    pub negative_marking: Option<NegativeMarking>,

    #[validate(range(min = 1))]
    pub allowed_attempts: Option<u32>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,
}

impl CreateTestRequest {
    /// Questions to draw for `subject`; unlisted subjects draw none.
    pub fn count_for(&self, subject: Subject) -> u32 {
        self.question_counts.get(&subject).copied().unwrap_or(0)
    }

    pub fn into_test(self, question_ids: Vec<String>, created_by: &str) -> TestDefinition {
        let mut test = TestDefinition::new(self.title.trim(), self.subjects, question_ids, created_by);
        test.description = self.description;
        if let Some(duration) = self.duration {
            test.duration = duration;
        }
        if let Some(total_marks) = self.total_marks {
            test.total_marks = total_marks;
        }
        if let Some(passing_marks) = self.passing_marks {
            test.passing_marks = passing_marks;
        }
        if let Some(randomize) = self.randomize_questions {
            test.randomize_questions = randomize;
        }
        if let Some(negative_marking) = self.negative_marking {
            test.negative_marking = negative_marking;
        }
        if let Some(allowed_attempts) = self.allowed_attempts {
            test.allowed_attempts = allowed_attempts;
        }
        if let Some(is_active) = self.is_active {
            test.is_active = is_active;
        }
        test.start_time = self.start_time;
        test.end_time = self.end_time;
        test
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TestsQuery {
    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl TestsQuery {
    pub fn page(&self) -> i64 {
        page_number(self.page)
    }

    pub fn limit(&self) -> i64 {
        page_size(self.limit)
    }

    pub fn offset(&self) -> i64 {
        page_offset(self.page(), self.limit())
    }
}

/// Body of `POST /api/test-attempts`. The candidate is taken from the access
/// token, never from the body.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestAttemptRequest {
    #[validate(length(min = 1, max = 100))]
    pub test_id: String,

    #[validate(required, range(min = 0, max = 100))]
    pub score: Option<i32>,

    #[validate(required, range(min = 1))]
    pub total_questions: Option<i32>,

    #[validate(required, range(min = 0))]
    pub correct_answers: Option<i32>,

    #[validate(range(min = 0))]
    pub unanswered_count: Option<i32>,

    #[validate(range(min = 0))]
    pub time_taken_seconds: Option<i64>,

    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub answers: Vec<AttemptAnswer>,

    pub ip_address: Option<String>,

    pub device: Option<String>,

    pub browser: Option<String>,
}

impl From<&TestAttemptRecord> for CreateTestAttemptRequest {
    fn from(record: &TestAttemptRecord) -> Self {
        CreateTestAttemptRequest {
            test_id: record.test.clone(),
            score: Some(record.score),
            total_questions: Some(record.total_questions),
            correct_answers: Some(record.correct_answers),
            unanswered_count: Some(record.unanswered_count),
            time_taken_seconds: Some(record.time_taken_seconds),
            start_time: Some(record.start_time),
            answers: record.answers.clone(),
            ip_address: Some(record.ip_address.clone()),
            device: Some(record.device.clone()),
            browser: Some(record.browser.clone()),
        }
    }
}

impl CreateTestAttemptRequest {
    /// Builds the stored record for `user_id`, ended now. Client details
    /// missing from the body fall back to what the server saw on the request.
    pub fn into_record(self, user_id: &str, seen: &ClientMetadata) -> TestAttemptRecord {
        let end_time = Utc::now();
        let time_taken_seconds = self.time_taken_seconds.unwrap_or(0);
        let start_time = self
            .start_time
            .unwrap_or_else(|| end_time - chrono::Duration::seconds(time_taken_seconds));

        TestAttemptRecord {
            id: Uuid::new_v4().to_string(),
            test: self.test_id,
            user: user_id.to_string(),
            score: self.score.unwrap_or_default(),
            total_questions: self.total_questions.unwrap_or_default(),
            correct_answers: self.correct_answers.unwrap_or_default(),
            unanswered_count: self.unanswered_count.unwrap_or_default(),
            time_taken_seconds,
            answers: self.answers,
            start_time,
            end_time,
            status: AttemptStatus::Completed,
            ip_address: non_empty_or(self.ip_address, &seen.ip_address),
            device: non_empty_or(self.device, &seen.device),
            browser: non_empty_or(self.browser, &seen.browser),
        }
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestAttemptsQuery {
    pub user_id: Option<String>,

    pub test_id: Option<String>,

    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl TestAttemptsQuery {
    pub fn page(&self) -> i64 {
        page_number(self.page)
    }

    pub fn limit(&self) -> i64 {
        page_size(self.limit)
    }

    pub fn offset(&self) -> i64 {
        page_offset(self.page(), self.limit())
    }
}
