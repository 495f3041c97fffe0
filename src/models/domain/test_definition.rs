use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::domain::Subject, quiz::SessionConfig};

fn default_duration_minutes() -> u32 {
    30
}

fn default_total_marks() -> u32 {
    100
}

fn default_passing_marks() -> u32 {
    40
}

fn default_allowed_attempts() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Configured but not applied by the scoring engine.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NegativeMarking {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub value: f64,
}

/// An exam assembled by staff from the question pool, stored in the `tests`
/// collection.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subjects: Vec<Subject>,
    /// Minutes.
    #[serde(default = "default_duration_minutes")]
    pub duration: u32,
    #[serde(default = "default_total_marks")]
    pub total_marks: u32,
    #[serde(default = "default_passing_marks")]
    pub passing_marks: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub created_by: String,
    /// Question ids, in the order they were picked.
    pub questions: Vec<String>,
    #[serde(default = "default_allowed_attempts")]
    pub allowed_attempts: u32,
    #[serde(default)]
    pub negative_marking: NegativeMarking,
    #[serde(default = "default_true")]
    pub randomize_questions: bool,
    pub created_at: DateTime<Utc>,
}

impl TestDefinition {
    pub fn new(title: &str, subjects: Vec<Subject>, questions: Vec<String>, created_by: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: None,
            subjects,
            duration: default_duration_minutes(),
            total_marks: default_total_marks(),
            passing_marks: default_passing_marks(),
            is_active: true,
            start_time: None,
            end_time: None,
            created_by: created_by.to_string(),
            questions,
            allowed_attempts: default_allowed_attempts(),
            negative_marking: NegativeMarking::default(),
            randomize_questions: true,
            created_at: Utc::now(),
        }
    }

    /// Countdown and question count for a session sitting this test.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_seconds: self.duration.saturating_mul(60),
            question_limit: self.questions.len(),
        }
    }

    /// Whether the test can be sat at `now`: active and inside its window, if
    /// one is set.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_time.map_or(true, |start| now >= start)
            && self.end_time.map_or(true, |end| now <= end)
    }
}
