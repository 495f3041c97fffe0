use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    models::domain::{Question, Subject},
    quiz::error::LoadError,
};

/// Read side of the question store as seen by a quiz session.
///
/// An empty `Ok` and an `Err` are different outcomes: the session treats the
/// first as "no questions for this subject" and the second as a load failure.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn fetch_questions(
        &self,
        subject: Subject,
        limit: usize,
    ) -> Result<Vec<Question>, LoadError>;
}

/// The questions endpoint answers either with a bare array or with a paginated
/// `{ "questions": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionsPayload {
    Bare(Vec<Question>),
    Paginated {
        #[serde(default)]
        questions: Vec<Question>,
    },
}

impl QuestionsPayload {
    fn into_questions(self) -> Vec<Question> {
        match self {
            QuestionsPayload::Bare(questions) => questions,
            QuestionsPayload::Paginated { questions } => questions,
        }
    }
}

pub fn parse_questions(body: &str) -> Result<Vec<Question>, LoadError> {
    serde_json::from_str::<QuestionsPayload>(body)
        .map(QuestionsPayload::into_questions)
        .map_err(|e| LoadError::Parse(e.to_string()))
}

/// Fetches questions from the platform's `GET /api/questions` endpoint.
#[derive(Clone)]
pub struct HttpQuestionStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuestionStore {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn questions_url(&self) -> String {
        format!("{}/api/questions", self.base_url)
    }
}

#[async_trait]
impl QuestionStore for HttpQuestionStore {
    async fn fetch_questions(
        &self,
        subject: Subject,
        limit: usize,
    ) -> Result<Vec<Question>, LoadError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.questions_url())
            .query(&[("subject", subject.as_str()), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let questions = parse_questions(&body)?;
        log::debug!(
            "Question store returned {} questions for {}",
            questions.len(),
            subject
        );
        Ok(questions)
    }
}
