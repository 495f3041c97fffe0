use thiserror::Error;

use crate::models::domain::Subject;
use crate::quiz::session::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("No questions available for subject '{0}'")]
    NoQuestionsAvailable(Subject),

    #[error("Failed to load questions: {0}")]
    LoadFailure(String),

    #[error("'{operation}' is not allowed while the session is {phase}")]
    InvalidPhase { operation: &'static str, phase: Phase },

    #[error("Question {index} does not exist ({len} questions loaded)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("Option {option} does not exist on question {question} ({len} options)")]
    OptionOutOfRange {
        question: usize,
        option: usize,
        len: usize,
    },

    #[error("The exam session has already ended")]
    SessionClosed,
}

impl QuizError {
    /// Load-time errors are the only ones a candidate ever sees.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            QuizError::NoQuestionsAvailable(_) | QuizError::LoadFailure(_)
        )
    }
}

/// Failure reading from the question store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("question store responded with status {status}")]
    Status { status: u16 },

    #[error("could not parse questions: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LoadError::Parse(err.to_string())
        } else {
            LoadError::Transport(err.to_string())
        }
    }
}

/// Failure writing a test attempt. Logged, never shown to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("attempt store rejected the record with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("could not decode attempt store response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PersistenceError::Decode(err.to_string())
        } else {
            PersistenceError::Transport(err.to_string())
        }
    }
}
