use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::TestAttemptRecord};

/// Narrows an attempt listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptFilter {
    pub user: Option<String>,
    pub test: Option<String>,
}

impl AttemptFilter {
    pub fn matches(&self, record: &TestAttemptRecord) -> bool {
        self.user.as_deref().map_or(true, |u| u == record.user)
            && self.test.as_deref().map_or(true, |t| t == record.test)
    }

    fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(user) = &self.user {
            filter.insert("user", user);
        }
        if let Some(test) = &self.test {
            filter.insert("test", test);
        }
        filter
    }
}

#[async_trait]
pub trait TestAttemptRepository: Send + Sync {
    async fn create(&self, record: TestAttemptRecord) -> AppResult<TestAttemptRecord>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestAttemptRecord>>;
    /// Most recently finished first. Returns the page and the total matching `filter`.
    async fn find_page(
        &self,
        filter: &AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestAttemptRecord>, i64)>;
}

pub struct MongoTestAttemptRepository {
    collection: Collection<TestAttemptRecord>,
}

impl MongoTestAttemptRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.test_attempts(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for test attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user": 1, "endTime": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_end_time".to_string())
                    .build(),
            )
            .build();

        let test_index = IndexModel::builder()
            .keys(doc! { "test": 1 })
            .options(IndexOptions::builder().name("test".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_index).await?;
        self.collection.create_index(test_index).await?;

        log::info!("Successfully created indexes for test attempts collection");
        Ok(())
    }
}

#[async_trait]
impl TestAttemptRepository for MongoTestAttemptRepository {
    async fn create(&self, record: TestAttemptRecord) -> AppResult<TestAttemptRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestAttemptRecord>> {
        let record = self.collection.find_one(doc! { "id": id }).await?;
        Ok(record)
    }

    async fn find_page(
        &self,
        filter: &AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestAttemptRecord>, i64)> {
        let filter = filter.to_document();

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .sort(doc! { "endTime": -1 })
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .build();

        let cursor = self.collection.find(filter).with_options(find_options).await?;
        let records: Vec<TestAttemptRecord> = cursor.try_collect().await?;

        Ok((records, total))
    }
}
