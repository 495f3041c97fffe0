use std::env;
use secrecy::SecretString;

use crate::constants::{DEFAULT_EXAM_DURATION_SECS, DEFAULT_QUESTIONS_PER_EXAM};
use crate::quiz::SessionConfig;

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub questions_collection: String,
    pub test_attempts_collection: String,
    pub tests_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub exam_duration_seconds: u32,
    pub questions_per_exam: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "certify-local".to_string()),
            questions_collection: env::var("QUESTIONS_COLLECTION")
                .unwrap_or_else(|_| "questions".to_string()),
            test_attempts_collection: env::var("TEST_ATTEMPTS_COLLECTION")
                .unwrap_or_else(|_| "testattempts".to_string()),
            tests_collection: env::var("TESTS_COLLECTION")
                .unwrap_or_else(|_| "tests".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            exam_duration_seconds: env::var("EXAM_DURATION_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_EXAM_DURATION_SECS),
            questions_per_exam: env::var("QUESTIONS_PER_EXAM")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_QUESTIONS_PER_EXAM),
        }
    }

    /// Settings a quiz session is started with. Fixed for the session's lifetime.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_seconds: self.exam_duration_seconds,
            question_limit: self.questions_per_exam,
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "certify-test".to_string(),
            questions_collection: "questions".to_string(),
            test_attempts_collection: "testattempts".to_string(),
            tests_collection: "tests".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            exam_duration_seconds: DEFAULT_EXAM_DURATION_SECS,
            questions_per_exam: DEFAULT_QUESTIONS_PER_EXAM,
        }
    }
}
