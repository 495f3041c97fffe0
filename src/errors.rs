use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;

use crate::models::domain::InvalidQuestion;

const DUPLICATE_KEY: i32 = 11000;

/// Failures surfaced by the question, test and attempt endpoints. Client
/// errors carry the message shown to the caller verbatim.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Exam database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Body text for the response. Server-side failures are logged in full
    /// and reported generically.
    fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) => "The exam database is unavailable".to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{} ({})", self, self.error_code());
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.public_message(),
            code: status.as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            ErrorKind::Write(WriteFailure::WriteError(ref write_error))
                if write_error.code == DUPLICATE_KEY =>
            {
                AppError::AlreadyExists("A document with this id".to_string())
            }
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

/// Joins field failures into one sorted line, preferring each rule's own
/// message.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = field.to_string();
                errors.iter().map(move |error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid ({})", field, error.code),
                })
            })
            .collect();

        if messages.is_empty() {
            return AppError::ValidationError(err.to_string());
        }
        messages.sort();
        messages.dedup();
        AppError::ValidationError(messages.join("; "))
    }
}

impl From<InvalidQuestion> for AppError {
    fn from(err: InvalidQuestion) -> Self {
        AppError::ValidationError(format!("Invalid question: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
