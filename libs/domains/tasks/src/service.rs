//! Task Service - Business logic layer

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, DeleteResponse, Task, TaskChanges, TaskFilter, UpdateTask};
use crate::repository::TaskRepository;

/// Task service: validates input, applies defaults and delegates each
/// operation to a single repository call.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new task
    #[instrument(skip(self, input), fields(user = %input.user))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository.create(Task::new(input)).await
    }

    /// List every task owned by `filter.user`
    #[instrument(skip(self))]
    pub async fn list_tasks(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let user = filter
            .user
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| TaskError::Validation("user query parameter is required".into()))?;

        self.repository.list_by_user(&user).await
    }

    /// Apply the fields present in `input` and return the updated task
    #[instrument(skip(self, input))]
    pub async fn update_task(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let changes = TaskChanges::from_update(input, Utc::now());
        self.repository
            .update(id, changes)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// Delete a task. Succeeds whether or not the task existed.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: Uuid) -> TaskResult<DeleteResponse> {
        if self.repository.delete(id).await? {
            tracing::info!(task_id = %id, "Task deleted successfully");
        } else {
            tracing::info!(task_id = %id, "Delete requested for unknown task");
        }
        Ok(DeleteResponse::task_deleted())
    }
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
