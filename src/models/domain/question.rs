use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Topic category a question pool is selected by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    MobileDevelopment,
    WebDevelopment,
    GraphicDesign,
    VideoEditing,
    DigitalMarketing,
    DataScience,
}

impl Subject {
    pub const ALL: [Subject; 6] = [
        Subject::MobileDevelopment,
        Subject::WebDevelopment,
        Subject::GraphicDesign,
        Subject::VideoEditing,
        Subject::DigitalMarketing,
        Subject::DataScience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::MobileDevelopment => "mobile-development",
            Subject::WebDevelopment => "web-development",
            Subject::GraphicDesign => "graphic-design",
            Subject::VideoEditing => "video-editing",
            Subject::DigitalMarketing => "digital-marketing",
            Subject::DataScience => "data-science",
        }
    }

    /// Human readable title, e.g. `web-development` -> `Web Development`.
    pub fn title(&self) -> String {
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown subject '{0}'")]
pub struct UnknownSubject(pub String);

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

fn default_marks() -> u32 {
    1
}

/// A multiple-choice question. Read-only to quiz sessions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_option_index: usize,
    pub subject: Subject,
    #[serde(default)]
    pub difficulty_level: DifficultyLevel,
    #[serde(default = "default_marks")]
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuestion {
    #[error("a question must have at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer index {index} is outside the {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

impl Question {
    pub fn new(
        text: &str,
        options: Vec<String>,
        correct_option_index: usize,
        subject: Subject,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            options,
            correct_option_index,
            subject,
            difficulty_level: DifficultyLevel::default(),
            marks: default_marks(),
            explanation: None,
            created_by: None,
            created_at: Some(Utc::now()),
        }
    }

    /// `correct_option_index` must index into `options`, and there must be a choice to make.
    pub fn check_shape(&self) -> Result<(), InvalidQuestion> {
        if self.options.len() < 2 {
            return Err(InvalidQuestion::TooFewOptions(self.options.len()));
        }
        if self.correct_option_index >= self.options.len() {
            return Err(InvalidQuestion::CorrectIndexOutOfRange {
                index: self.correct_option_index,
                len: self.options.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl Question {
    pub fn test_question(correct_option_index: usize) -> Self {
        Question::new(
            "Which option is correct?",
            vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct_option_index,
            Subject::WebDevelopment,
        )
    }
}
