//! Version API handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::state::AppState;
use crate::storage::{Backend, TaskStore};

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub backend: Backend,
}

/// GET /api/version
pub async fn get_version<S: TaskStore>(State(state): State<AppState<S>>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.store.backend(),
    })
}
