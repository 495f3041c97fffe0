use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::grading::is_passing,
    quiz::{ClientMetadata, QuizResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptStatus {
    InProgress,
    #[default]
    Completed,
    Abandoned,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptAnswer {
    pub question: String,
    pub selected_option: Option<i32>,
    pub is_correct: bool,
}

/// One completed attempt as stored in the `testattempts` collection.
///
/// `score` is the percentage and `correct_answers` the raw score, matching the
/// payload the quiz client has always sent.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestAttemptRecord {
    pub id: String,
    pub test: String,
    pub user: String,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    #[serde(default)]
    pub unanswered_count: i32,
    #[serde(default)]
    pub time_taken_seconds: i64,
    #[serde(default)]
    pub answers: Vec<AttemptAnswer>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: AttemptStatus,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub browser: String,
}

impl TestAttemptRecord {
    /// Assembles the persisted shape of a scored attempt.
    pub fn from_result(
        result: &QuizResult,
        test_id: &str,
        user_id: &str,
        metadata: &ClientMetadata,
    ) -> Self {
        let answers = result
            .per_question
            .iter()
            .map(|outcome| AttemptAnswer {
                question: outcome.question_id.clone(),
                selected_option: outcome.selected.selected().map(|i| i as i32),
                is_correct: outcome.is_correct,
            })
            .collect();

        TestAttemptRecord {
            id: Uuid::new_v4().to_string(),
            test: test_id.to_string(),
            user: user_id.to_string(),
            score: result.percentage as i32,
            total_questions: result.total_questions as i32,
            correct_answers: result.raw_score as i32,
            unanswered_count: result.unanswered_count as i32,
            time_taken_seconds: result.time_taken_seconds,
            answers,
            start_time: result.started_at,
            end_time: result.ended_at,
            status: AttemptStatus::Completed,
            ip_address: metadata.ip_address.clone(),
            device: metadata.device.clone(),
            browser: metadata.browser.clone(),
        }
    }

    pub fn raw_score(&self) -> i32 {
        self.correct_answers
    }

    pub fn percentage(&self) -> i32 {
        self.score
    }

    pub fn passed(&self) -> bool {
        is_passing(self.score)
    }
}
