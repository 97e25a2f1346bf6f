//! Task API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::model::{Task, TaskKey};
use crate::storage::TaskStore;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Create task request
///
/// Clients may post a whole task; only `description` is read.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// Body returned by complete and delete
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a path id; an id the backend cannot represent cannot exist either.
fn parse_id<I: TaskKey>(raw: &str) -> Result<I, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/tasks
/// List all tasks
pub async fn list_tasks<S: TaskStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Task<S::Id>>>, ApiError> {
    let tasks = state.store.list().await?;
    Ok(Json(tasks))
}

/// POST /api/create
/// Create a new task
pub async fn create_task<S: TaskStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task<S::Id>>), ApiError> {
    let Json(req) = payload?;

    // Missing, null and "" all end up as the store's empty-description error
    let description = req.description.unwrap_or_default();
    let task = state.store.insert(description).await?;
    tracing::info!(id = %task.id, "task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/update/{id}
/// Mark a task completed
pub async fn complete_task<S: TaskStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id: S::Id = parse_id(&id)?;
    state.store.complete(&id).await?;
    tracing::info!(%id, "task completed");

    Ok(SuccessResponse::ok())
}

/// DELETE /api/delete/{id}
/// Delete a task
pub async fn delete_task<S: TaskStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id: S::Id = parse_id(&id)?;
    state.store.delete(&id).await?;
    tracing::info!(%id, "task deleted");

    Ok(SuccessResponse::ok())
}
