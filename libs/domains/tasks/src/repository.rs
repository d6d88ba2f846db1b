use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{Task, TaskChanges};

/// Repository trait for Task persistence
///
/// Each method maps to a single datastore call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a fully built task
    async fn create(&self, task: Task) -> TaskResult<Task>;

    /// All tasks whose `user` equals `user`, in store order
    async fn list_by_user(&self, user: &str) -> TaskResult<Vec<Task>>;

    /// Write `changes` and return the task as it is after the write,
    /// or `None` if no task has this id
    async fn update(&self, id: Uuid, changes: TaskChanges) -> TaskResult<Option<Task>>;

    /// Remove a task; `true` if a document was deleted
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}
