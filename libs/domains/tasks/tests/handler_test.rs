//! Handler tests for the Tasks domain
//!
//! These drive the tasks router end to end over an in-memory repository:
//! - Request deserialization and validation
//! - Response bodies and HTTP status codes
//! - Partial update semantics
//! - Error responses

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_tasks::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Mutex;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

/// Keeps tasks in insertion order, like a collection without a sort.
#[derive(Default)]
struct InMemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> TaskResult<Task> {
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn list_by_user(&self, user: &str) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().filter(|t| t.user == user).cloned().collect())
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> TaskResult<Option<Task>> {
        let mut tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.apply(changes);
            task.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() < before)
    }
}

fn app() -> Router {
    handlers::router(TaskService::new(InMemoryTaskRepository::default()))
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, body: Value) -> Task {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn list(app: &Router, user: &str) -> Vec<Task> {
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/?user={}", user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_task_applies_defaults() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "user": "alice", "title": "Buy milk" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["user"], "alice");
    assert_eq!(body["title"], "Buy milk");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["description"], "");
    assert!(body["dueDate"].is_null());
    assert!(Uuid::parse_str(body["_id"].as_str().unwrap()).is_ok());
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_task_without_title_persists_nothing() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("create_without_title");
    let user = builder.user("alice");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/", json!({ "user": user })))
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "user": user, "title": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["title"].is_array());

    assert!(list(&app, &user).await.is_empty());
}

#[tokio::test]
async fn test_create_task_rejects_unknown_status() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "user": "alice", "title": "Buy milk", "status": "archived" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_returns_only_the_users_tasks() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("list_by_user");
    let alice = builder.user("alice");
    let bob = builder.user("bob");

    let first = create(&app, json!({ "user": alice, "title": "one" })).await;
    let second = create(&app, json!({ "user": alice, "title": "two" })).await;
    create(&app, json!({ "user": bob, "title": "three" })).await;

    let tasks = list(&app, &alice).await;
    let ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();

    assert_eq!(ids, vec![first.id, second.id]);
    assert!(tasks.iter().all(|t| t.user == alice));
}

#[tokio::test]
async fn test_list_unknown_user_is_empty() {
    assert!(list(&app(), "nobody").await.is_empty());
}

#[tokio::test]
async fn test_list_without_user_is_400() {
    let response = app().oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let app = app();

    let created = create(
        &app,
        json!({
            "user": "carol",
            "title": "File taxes",
            "description": "before April",
            "status": "in-progress",
            "dueDate": "2025-04-15T00:00:00Z"
        }),
    )
    .await;

    let tasks = list(&app, "carol").await;
    assert_eq!(tasks, vec![created.clone()]);
    assert_eq!(created.status, TaskStatus::InProgress);
    assert_eq!(created.description, "before April");
    assert!(created.due_date.is_some());
}

#[tokio::test]
async fn test_user_label_is_stored_and_matched_as_given() {
    let app = app();

    for (label, encoded) in [(" alice ", "%20alice%20"), ("a+b", "a%2Bb")] {
        let created = create(&app, json!({ "user": label, "title": "Buy milk" })).await;
        assert_eq!(created.user, label);

        let tasks = list(&app, encoded).await;
        assert_eq!(tasks, vec![created]);
    }

    assert!(list(&app, "alice").await.is_empty());
}

#[tokio::test]
async fn test_create_with_null_description_and_status_applies_defaults() {
    let app = app();

    let created = create(
        &app,
        json!({
            "user": "dave",
            "title": "Walk dog",
            "description": null,
            "status": null
        }),
    )
    .await;

    assert_eq!(created.description, "");
    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(list(&app, "dave").await, vec![created]);
}

#[tokio::test]
async fn test_update_status_only_leaves_other_fields() {
    let app = app();
    let task = create(
        &app,
        json!({
            "user": "alice",
            "title": "Buy milk",
            "description": "two litres",
            "dueDate": "2025-06-01T12:00:00Z"
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/{}", task.id),
            json!({ "status": "done" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Task = json_body(response.into_body()).await;
    assert_eq!(updated.status, TaskStatus::Done);
    assert_eq!(updated.title, task.title);
    assert_eq!(updated.description, task.description);
    assert_eq!(updated.due_date, task.due_date);
    assert!(updated.updated_at >= task.updated_at);
    assert_eq!(updated.created_at, task.created_at);
}

#[tokio::test]
async fn test_update_applies_empty_values_when_present() {
    let app = app();
    let task = create(
        &app,
        json!({
            "user": "alice",
            "title": "Buy milk",
            "description": "two litres",
            "dueDate": "2025-06-01T12:00:00Z"
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/{}", task.id),
            json!({ "description": "", "dueDate": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Task = json_body(response.into_body()).await;
    assert_eq!(updated.description, "");
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.title, "Buy milk");
}

#[tokio::test]
async fn test_update_with_unknown_status_leaves_record_unchanged() {
    let app = app();
    let task = create(&app, json!({ "user": "dave", "title": "Walk dog" })).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/{}", task.id),
            json!({ "status": "archived" }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    assert_eq!(list(&app, "dave").await, vec![task]);
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            &format!("/{}", Uuid::now_v7()),
            json!({ "status": "done" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/42", json!({ "status": "done" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(empty_request("DELETE", "/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_UUID");
}

#[tokio::test]
async fn test_delete_removes_task_from_list() {
    let app = app();
    let task = create(&app, json!({ "user": "erin", "title": "Call mom" })).await;

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/{}", task.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: DeleteResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Task deleted");

    assert!(list(&app, "erin").await.is_empty());
}

#[tokio::test]
async fn test_delete_unknown_id_still_succeeds() {
    let response = app()
        .oneshot(empty_request("DELETE", &format!("/{}", Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Task deleted" }));
}
