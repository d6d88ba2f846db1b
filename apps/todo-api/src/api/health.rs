//! Root banner and readiness endpoints

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

pub const ROOT_BANNER: &str = "ToDo API running";

/// `GET /ready`, mounted under `/api`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// `GET /` answering with a plaintext banner
pub fn root_router() -> Router {
    Router::new().route("/", get(root))
}

async fn root() -> &'static str {
    ROOT_BANNER
}

/// Readiness check - pings MongoDB
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let client = state.mongo_client.clone();
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async move {
            database::mongodb::ping(&client)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}
