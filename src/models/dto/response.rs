use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Question, Subject, TestAttemptRecord, TestDefinition};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            total,
            page,
            limit,
            pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub questions: Vec<Question>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

pub type CreateQuestionResponse = ApiResponse<Question>;

pub type UpdateQuestionResponse = ApiResponse<Question>;

/// A bulk-add item that was skipped, by its position in the request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RejectedQuestion {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddResponse {
    pub success: bool,
    pub message: String,
    pub total_submitted: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_questions: Vec<RejectedQuestion>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedTest {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct CreateTestResponse {
    pub message: String,
    pub test: CreatedTest,
}

#[derive(Debug, Serialize)]
pub struct TestListResponse {
    pub tests: Vec<TestDefinition>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestAttemptResponse {
    pub success: bool,
    pub message: String,
    pub test_attempt_id: String,
}

/// One row of an attempt listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestAttemptSummary {
    pub id: String,
    pub test: String,
    pub user: String,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub unanswered_count: i32,
    pub time_taken_seconds: i64,
    pub passed: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub browser: String,
}

impl From<TestAttemptRecord> for TestAttemptSummary {
    fn from(record: TestAttemptRecord) -> Self {
        TestAttemptSummary {
            passed: record.passed(),
            id: record.id,
            test: record.test,
            user: record.user,
            score: record.score,
            total_questions: record.total_questions,
            correct_answers: record.correct_answers,
            unanswered_count: record.unanswered_count,
            time_taken_seconds: record.time_taken_seconds,
            start_time: record.start_time,
            end_time: record.end_time,
            browser: record.browser,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestAttemptListResponse {
    pub results: Vec<TestAttemptSummary>,
    pub pagination: Pagination,
}

/// Question count for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectStat {
    pub id: Subject,
    pub name: String,
    pub count: u64,
}

impl SubjectStat {
    pub fn new(subject: Subject, count: u64) -> Self {
        Self {
            id: subject,
            name: subject.title(),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(21, 1, 10).pages, 3);
        assert_eq!(Pagination::new(20, 1, 10).pages, 2);
        assert_eq!(Pagination::new(0, 1, 10).pages, 0);
    }

    #[test]
    fn test_subject_stat_uses_title() {
        let stat = SubjectStat::new(Subject::VideoEditing, 4);
        let json = serde_json::to_value(&stat).unwrap();

        assert_eq!(json["id"], "video-editing");
        assert_eq!(json["name"], "Video Editing");
        assert_eq!(json["count"], 4);
    }

    #[test]
    fn test_bulk_add_response_omits_empty_rejections() {
        let response = BulkAddResponse {
            success: true,
            message: "Added 2 questions successfully".to_string(),
            total_submitted: 2,
            valid_count: 2,
            invalid_count: 0,
            invalid_questions: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["totalSubmitted"], 2);
        assert_eq!(json["validCount"], 2);
        assert!(json.get("invalidQuestions").is_none());
    }

    #[test]
    fn test_create_attempt_response_round_trips_camel_case() {
        let body = r#"{"success":true,"message":"Test result saved successfully","testAttemptId":"a-1"}"#;
        let parsed: CreateTestAttemptResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.test_attempt_id, "a-1");
    }
}
