use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::{Question, TestAttemptRecord, TestDefinition},
};

/// Where each stored resource lives inside the exam database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionNames {
    pub questions: String,
    pub test_attempts: String,
    pub tests: String,
}

impl CollectionNames {
    pub fn from_config(config: &Config) -> Self {
        Self {
            questions: config.questions_collection.clone(),
            test_attempts: config.test_attempts_collection.clone(),
            tests: config.tests_collection.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
    collections: CollectionNames,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        client_options.app_name = Some("certify-server".to_string());
        client_options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let database = Self {
            client,
            db_name: config.mongo_db_name.clone(),
            collections: CollectionNames::from_config(config),
        };

        database.health_check().await?;

        log::info!(
            "Connected to exam database '{}' (questions: '{}', attempts: '{}', tests: '{}')",
            database.db_name,
            database.collections.questions,
            database.collections.test_attempts,
            database.collections.tests,
        );

        Ok(database)
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(&self.db_name).collection(name)
    }

    /// The shared question pool.
    pub fn questions(&self) -> Collection<Question> {
        self.collection(&self.collections.questions)
    }

    /// Completed exam attempts, one document per submission.
    pub fn test_attempts(&self) -> Collection<TestAttemptRecord> {
        self.collection(&self.collections.test_attempts)
    }

    /// Staff-assembled tests.
    pub fn tests(&self) -> Collection<TestDefinition> {
        self.collection(&self.collections.tests)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
