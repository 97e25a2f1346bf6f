//! HTTP error responses
//!
//! Every failure leaves the API as `{"error": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::TaskError;

pub const TASK_NOT_FOUND: &str = "Task not found";
pub const ROUTE_NOT_FOUND: &str = "Not found";
const INTERNAL_ERROR: &str = "Internal server error";

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request failure as seen by the client
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a message
    BadRequest(String),
    /// The request body could not be decoded
    Rejected { status: StatusCode, message: String },
    /// 404 `Task not found` (absent or malformed id)
    NotFound,
    /// 404 for a path under `/api` that names no endpoint
    UnknownRoute,
    /// 500; details are logged, not returned
    Internal(TaskError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::NotFound | ApiError::UnknownRoute => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(_) => ApiError::NotFound,
            TaskError::InvalidData(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Rejected { message, .. } => message,
            ApiError::NotFound => TASK_NOT_FOUND.to_string(),
            ApiError::UnknownRoute => ROUTE_NOT_FOUND.to_string(),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                INTERNAL_ERROR.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
