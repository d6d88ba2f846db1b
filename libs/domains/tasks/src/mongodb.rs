//! MongoDB implementation of TaskRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc, to_document},
    options::ReturnDocument,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{Task, TaskChanges};
use crate::repository::TaskRepository;

pub const DEFAULT_COLLECTION: &str = "tasks";

/// MongoDB implementation of the TaskRepository
#[derive(Clone)]
pub struct MongoTaskRepository {
    collection: Collection<Task>,
}

impl MongoTaskRepository {
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoTaskRepository::new(client.database("todo"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    /// Create a new MongoTaskRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Task>(collection_name);
        Self { collection }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Task> {
        &self.collection
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.to_string() }
    }

    fn set_document(changes: &TaskChanges) -> TaskResult<Document> {
        Ok(doc! { "$set": to_document(changes)? })
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    #[instrument(skip(self, task), fields(task_id = %task.id, user = %task.user))]
    async fn create(&self, task: Task) -> TaskResult<Task> {
        self.collection.insert_one(&task).await?;

        tracing::info!(task_id = %task.id, "Task created successfully");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user: &str) -> TaskResult<Vec<Task>> {
        let cursor = self.collection.find(doc! { "user": user }).await?;
        let tasks: Vec<Task> = cursor.try_collect().await?;
        Ok(tasks)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: Uuid, changes: TaskChanges) -> TaskResult<Option<Task>> {
        let update = Self::set_document(&changes)?;

        let updated = self
            .collection
            .find_one_and_update(Self::id_filter(id), update)
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(task_id = %id, "Task updated successfully");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
