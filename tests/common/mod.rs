#![allow(dead_code)]

use std::{collections::HashMap, net::TcpListener, sync::Arc};

use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use certify_server::{
    app_state::AppState,
    auth::AuthMiddleware,
    config::Config,
    errors::{AppError, AppResult},
    handlers,
    middleware::ClientMetadataMiddleware,
    models::domain::{Question, Subject, TestAttemptRecord, TestDefinition},
    repositories::{AttemptFilter, QuestionRepository, TestAttemptRepository, TestRepository},
};

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "certify-integration".to_string(),
        questions_collection: "questions".to_string(),
        test_attempts_collection: "testattempts".to_string(),
        tests_collection: "tests".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        jwt_secret: SecretString::from("integration_test_secret_value_32_chars".to_string()),
        jwt_expiration_hours: 1,
        exam_duration_seconds: 900,
        questions_per_exam: 10,
    }
}

fn page_of<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    let start = offset.max(0) as usize;
    let end = start.saturating_add(limit.max(0) as usize).min(items.len());
    if start >= items.len() {
        vec![]
    } else {
        items[start..end].to_vec()
    }
}

pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<HashMap<String, Question>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        let repository = Self::new();
        {
            let mut map = repository
                .questions
                .try_write()
                .expect("fresh lock is uncontended");
            for question in questions {
                map.insert(question.id.clone(), question);
            }
        }
        repository
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_page(
        &self,
        subject: Option<Subject>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Question>, i64)> {
        let questions = self.questions.read().await;
        let mut items: Vec<Question> = questions
            .values()
            .filter(|q| subject.map_or(true, |s| q.subject == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        Ok((page_of(&items, offset, limit), items.len() as i64))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(AppError::AlreadyExists(format!(
                "Question with id '{}'",
                question.id
            )));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn create_many(&self, batch: Vec<Question>) -> AppResult<Vec<Question>> {
        let mut questions = self.questions.write().await;
        for question in &batch {
            questions.insert(question.id.clone(), question.clone());
        }
        Ok(batch)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if !questions.contains_key(&question.id) {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            )));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        match self.questions.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            ))),
        }
    }

    async fn count_by_subject(&self, subject: Subject) -> AppResult<u64> {
        let questions = self.questions.read().await;
        Ok(questions.values().filter(|q| q.subject == subject).count() as u64)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryTestAttemptRepository {
    records: Arc<RwLock<HashMap<String, TestAttemptRecord>>>,
}

impl InMemoryTestAttemptRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn all(&self) -> Vec<TestAttemptRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl TestAttemptRepository for InMemoryTestAttemptRepository {
    async fn create(&self, record: TestAttemptRecord) -> AppResult<TestAttemptRecord> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(AppError::AlreadyExists(format!(
                "Test attempt with id '{}'",
                record.id
            )));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestAttemptRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_page(
        &self,
        filter: &AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestAttemptRecord>, i64)> {
        let records = self.records.read().await;
        let mut items: Vec<TestAttemptRecord> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.end_time.cmp(&a.end_time));

        Ok((page_of(&items, offset, limit), items.len() as i64))
    }
}

pub struct InMemoryTestRepository {
    tests: Arc<RwLock<HashMap<String, TestDefinition>>>,
}

impl InMemoryTestRepository {
    pub fn new() -> Self {
        Self {
            tests: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TestRepository for InMemoryTestRepository {
    async fn create(&self, test: TestDefinition) -> AppResult<TestDefinition> {
        self.tests
            .write()
            .await
            .insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestDefinition>> {
        Ok(self.tests.read().await.get(id).cloned())
    }

    async fn find_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<TestDefinition>, i64)> {
        let tests = self.tests.read().await;
        let mut items: Vec<TestDefinition> = tests.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok((page_of(&items, offset, limit), items.len() as i64))
    }
}

pub struct TestApp {
    pub base_url: String,
    pub state: AppState,
    pub attempts: Arc<InMemoryTestAttemptRepository>,
}

/// Serves the full route table on an ephemeral port.
pub fn spawn_app(questions: Vec<Question>) -> TestApp {
    let attempts = Arc::new(InMemoryTestAttemptRepository::new());
    let state = AppState::from_repositories(
        Arc::new(InMemoryQuestionRepository::with_questions(questions)),
        attempts.clone(),
        Arc::new(InMemoryTestRepository::new()),
        test_config(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();

    let data = web::Data::new(state.clone());
    let jwt_service = web::Data::from(state.jwt_service.clone());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .app_data(jwt_service.clone())
            .wrap(AuthMiddleware)
            .wrap(ClientMetadataMiddleware)
            .configure(handlers::configure)
    })
    .workers(1)
    .listen(listener)
    .expect("listen on ephemeral port")
    .run();

    tokio::spawn(server);

    TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        state,
        attempts,
    }
}
