//! Wires the tasks domain to its MongoDB collection.

use axum::Router;
use domain_tasks::{MongoTaskRepository, TaskService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoTaskRepository::new(state.db.clone());
    handlers::router(TaskService::new(repository))
}
