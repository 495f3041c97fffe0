use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::TestDefinition};

#[async_trait]
pub trait TestRepository: Send + Sync {
    async fn create(&self, test: TestDefinition) -> AppResult<TestDefinition>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestDefinition>>;
    /// Newest first. Returns the page and the total number of tests.
    async fn find_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<TestDefinition>, i64)>;
}

pub struct MongoTestRepository {
    collection: Collection<TestDefinition>,
}

impl MongoTestRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.tests(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for tests collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(created_at_index).await?;

        log::info!("Successfully created indexes for tests collection");
        Ok(())
    }
}

#[async_trait]
impl TestRepository for MongoTestRepository {
    async fn create(&self, test: TestDefinition) -> AppResult<TestDefinition> {
        self.collection.insert_one(&test).await?;
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestDefinition>> {
        let test = self.collection.find_one(doc! { "id": id }).await?;
        Ok(test)
    }

    async fn find_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<TestDefinition>, i64)> {
        let total = self.collection.count_documents(doc! {}).await? as i64;

        let find_options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .build();

        let cursor = self.collection.find(doc! {}).with_options(find_options).await?;
        let tests: Vec<TestDefinition> = cursor.try_collect().await?;

        Ok((tests, total))
    }
}
