use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Question, Subject},
};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Newest first. Returns the page and the total matching `subject`.
    async fn find_page(
        &self,
        subject: Option<Subject>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Question>, i64)>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    async fn create(&self, question: Question) -> AppResult<Question>;
    /// Inserts every question in one batch, in order.
    async fn create_many(&self, questions: Vec<Question>) -> AppResult<Vec<Question>>;
    /// Replaces the stored question with the same id.
    async fn update(&self, question: Question) -> AppResult<Question>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn count_by_subject(&self, subject: Subject) -> AppResult<u64>;
    async fn health_check(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    db: Database,
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.questions(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let subject_index = IndexModel::builder()
            .keys(doc! { "subject": 1, "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("subject_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(subject_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}

fn subject_filter(subject: Option<Subject>) -> Document {
    match subject {
        Some(subject) => doc! { "subject": subject.as_str() },
        None => doc! {},
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn find_page(
        &self,
        subject: Option<Subject>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Question>, i64)> {
        let filter = subject_filter(subject);

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .build();

        let cursor = self.collection.find(filter).with_options(find_options).await?;
        let questions: Vec<Question> = cursor.try_collect().await?;

        Ok((questions, total))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn create_many(&self, questions: Vec<Question>) -> AppResult<Vec<Question>> {
        if questions.is_empty() {
            return Ok(questions);
        }
        self.collection.insert_many(&questions).await?;
        Ok(questions)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let result = self
            .collection
            .replace_one(doc! { "id": question.id.as_str() }, &question)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            )));
        }

        Ok(question)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn count_by_subject(&self, subject: Subject) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(subject_filter(Some(subject)))
            .await?;
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
