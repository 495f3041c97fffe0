use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::task::JoinHandle;

use crate::{
    models::{
        domain::TestAttemptRecord,
        dto::{request::CreateTestAttemptRequest, response::CreateTestAttemptResponse},
    },
    quiz::{client_metadata::ClientMetadata, error::PersistenceError, scoring::QuizResult},
};

/// Write side of the test-attempt store. Returns the id the store assigned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn persist(&self, record: &TestAttemptRecord) -> Result<String, PersistenceError>;
}

/// Posts attempts to the platform's `POST /api/test-attempts` endpoint as the
/// signed-in candidate.
#[derive(Clone)]
pub struct HttpAttemptStore {
    client: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl HttpAttemptStore {
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }
}

#[async_trait]
impl AttemptStore for HttpAttemptStore {
    async fn persist(&self, record: &TestAttemptRecord) -> Result<String, PersistenceError> {
        let response = self
            .client
            .post(format!("{}/api/test-attempts", self.base_url))
            .bearer_auth(self.access_token.expose_secret())
            .json(&CreateTestAttemptRequest::from(record))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistenceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let saved: CreateTestAttemptResponse = response.json().await?;
        Ok(saved.test_attempt_id)
    }
}

/// Hands a scored result to the attempt store without making the candidate
/// wait for it.
///
/// The locally computed result is what the candidate sees. Persistence runs on
/// its own task, failures are logged and nothing is retried.
#[derive(Clone)]
pub struct SubmissionProtocol {
    store: Arc<dyn AttemptStore>,
    user_id: String,
    metadata: ClientMetadata,
}

impl SubmissionProtocol {
    pub fn new(store: Arc<dyn AttemptStore>, user_id: &str, metadata: ClientMetadata) -> Self {
        Self {
            store,
            user_id: user_id.to_string(),
            metadata,
        }
    }

    pub fn build_record(&self, test_id: &str, result: &QuizResult) -> TestAttemptRecord {
        TestAttemptRecord::from_result(result, test_id, &self.user_id, &self.metadata)
    }

    /// Spawns the persistence request and returns immediately. The handle is
    /// only useful to callers that want to observe completion; the outcome is
    /// never reported back.
    pub fn persist_in_background(&self, test_id: &str, result: &QuizResult) -> JoinHandle<()> {
        let record = self.build_record(test_id, result);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match store.persist(&record).await {
                Ok(attempt_id) => log::info!(
                    "Saved test attempt {} for user {} on {}",
                    attempt_id,
                    record.user,
                    record.test
                ),
                Err(err) => log::error!(
                    "Error saving test results for user {} on {}: {}",
                    record.user,
                    record.test,
                    err
                ),
            }
        })
    }
}
