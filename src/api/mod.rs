//! Web API module for tasklist

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::error::Result;
use crate::storage::TaskStore;
use error::ApiError;
use state::AppState;

/// Directory checked for a built frontend when none is configured
const DEFAULT_STATIC_DIR: &str = "frontend/dist";

/// Create the API router
pub fn create_api_router<S: TaskStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/tasks", get(handlers::tasks::list_tasks::<S>))
        .route("/create", post(handlers::tasks::create_task::<S>))
        .route("/update/{id}", patch(handlers::tasks::complete_task::<S>))
        .route("/delete/{id}", delete(handlers::tasks::delete_task::<S>))
        .route("/version", get(handlers::version::get_version::<S>))
        // Keep unknown API paths away from the frontend fallback
        .fallback(api_fallback)
}

async fn api_fallback() -> ApiError {
    ApiError::UnknownRoute
}

/// Create the full router with static file serving
pub fn create_router<S: TaskStore>(store: Arc<S>, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest("/api", create_api_router::<S>())
        .with_state(AppState::new(store));

    // Add static file serving if directory is provided
    let router = if let Some(dir) = static_dir {
        let index_file = dir.join("index.html");
        // Unknown paths get index.html so client-side routes resolve
        let serve_dir = ServeDir::new(&dir).fallback(ServeFile::new(&index_file));
        router.fallback_service(serve_dir)
    } else {
        router
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// Pick the frontend directory: the configured one, else `frontend/dist` if present
pub fn resolve_static_dir(configured: Option<PathBuf>) -> Option<PathBuf> {
    match configured {
        Some(dir) if dir.is_dir() => Some(dir),
        Some(dir) => {
            tracing::warn!(dir = %dir.display(), "static directory not found, serving API only");
            None
        }
        None => {
            let fallback = PathBuf::from(DEFAULT_STATIC_DIR);
            fallback.is_dir().then_some(fallback)
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}

/// Start the web server (API + optional static files) and run until shutdown
pub async fn start_server<S: TaskStore>(
    store: Arc<S>,
    addr: &str,
    static_dir: Option<PathBuf>,
) -> Result<()> {
    let backend = store.backend();

    match &static_dir {
        Some(dir) => tracing::info!(dir = %dir.display(), "serving frontend"),
        None => tracing::info!("no frontend directory, API only mode"),
    }

    let app = create_router(store, static_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %backend, "task API listening on http://{}/api", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::model::{DocumentId, Task};
    use crate::storage::{require_description, Backend, MemoryStore};
    use async_trait::async_trait;
    use mongodb::bson::oid::ObjectId;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Store handing out ObjectIds, without a database behind it
    #[derive(Default)]
    struct ObjectIdStore {
        tasks: tokio::sync::Mutex<Vec<Task<DocumentId>>>,
    }

    #[async_trait]
    impl TaskStore for ObjectIdStore {
        type Id = DocumentId;

        fn backend(&self) -> Backend {
            Backend::Document
        }

        async fn list(&self) -> crate::error::Result<Vec<Task<DocumentId>>> {
            Ok(self.tasks.lock().await.clone())
        }

        async fn insert(&self, description: String) -> crate::error::Result<Task<DocumentId>> {
            require_description(&description)?;
            let task = Task::new(DocumentId::from(ObjectId::new()), description);
            self.tasks.lock().await.push(task.clone());
            Ok(task)
        }

        async fn complete(&self, id: &DocumentId) -> crate::error::Result<()> {
            let mut tasks = self.tasks.lock().await;
            let task = tasks
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| TaskError::not_found(format!("task {}", id)))?;
            task.mark_completed();
            Ok(())
        }

        async fn delete(&self, id: &DocumentId) -> crate::error::Result<()> {
            let mut tasks = self.tasks.lock().await;
            let index = tasks
                .iter()
                .position(|t| &t.id == id)
                .ok_or_else(|| TaskError::not_found(format!("task {}", id)))?;
            tasks.remove(index);
            Ok(())
        }

        async fn ping(&self) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn app() -> Router {
        create_router(Arc::new(MemoryStore::new()), None)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_full_task_lifecycle() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/api/create", Some(r#"{"description":"buy milk"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": 1, "completed": false, "description": "buy milk"}));

        let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": 1, "completed": false, "description": "buy milk"}]));

        let (status, body) = send(&app, Method::PATCH, "/api/update/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body, json!([{"id": 1, "completed": true, "description": "buy milk"}]));

        let (status, body) = send(&app, Method::DELETE, "/api/delete/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_without_description_is_rejected() {
        let app = app();

        for payload in [r#"{}"#, r#"{"description":""}"#, r#"{"description":null}"#] {
            let (status, body) = send(&app, Method::POST, "/api/create", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
            assert_eq!(body, json!({"error": "Task description is required"}));
        }

        let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_ignores_client_id_and_completed() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/create",
            Some(r#"{"id": 42, "completed": true, "description": "walk dog"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": 1, "completed": false, "description": "walk dog"}));
    }

    #[tokio::test]
    async fn test_create_with_malformed_json() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/create", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_without_content_type() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/create")
            .body(Body::from(r#"{"description":"buy milk"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_complete_missing_task() {
        let app = app();
        let (status, body) = send(&app, Method::PATCH, "/api/update/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Task not found"}));
    }

    #[tokio::test]
    async fn test_malformed_ids_are_not_found() {
        let app = app();
        send(&app, Method::POST, "/api/create", Some(r#"{"description":"a"}"#)).await;

        for (method, uri) in [
            (Method::PATCH, "/api/update/abc"),
            (Method::DELETE, "/api/delete/abc"),
            (Method::PATCH, "/api/update/-1"),
            (Method::PATCH, "/api/update/+1"),
            (Method::PATCH, "/api/update/01"),
            (Method::DELETE, "/api/delete/001"),
            (Method::DELETE, "/api/delete/65a1f0c2e4b0a1b2c3d4e5f6"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body, json!({"error": "Task not found"}));
        }

        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body, json!([{"id": 1, "completed": false, "description": "a"}]));
    }

    #[tokio::test]
    async fn test_complete_twice_is_idempotent() {
        let app = app();
        send(&app, Method::POST, "/api/create", Some(r#"{"description":"a"}"#)).await;

        for _ in 0..2 {
            let (status, body) = send(&app, Method::PATCH, "/api/update/1", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"success": true}));
        }

        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body[0]["completed"], json!(true));
    }

    #[tokio::test]
    async fn test_deleted_task_stays_gone() {
        let app = app();
        send(&app, Method::POST, "/api/create", Some(r#"{"description":"a"}"#)).await;

        let (status, _) = send(&app, Method::DELETE, "/api/delete/1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, "/api/delete/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::PATCH, "/api/update/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::POST, "/api/create", Some(r#"{"description":"b"}"#)).await;
        assert_eq!(body["id"], json!(2));
    }

    #[tokio::test]
    async fn test_object_id_tasks_over_http() {
        let app = create_router(Arc::new(ObjectIdStore::default()), None);

        let (status, created) = send(&app, Method::POST, "/api/create", Some(r#"{"description":"buy milk"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.get("id").is_none());
        let hex = created["_id"].as_str().unwrap().to_string();
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(created["completed"], json!(false));
        assert_eq!(created["description"], json!("buy milk"));

        let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"_id": hex, "completed": false, "description": "buy milk"}]));

        for (method, uri) in [
            (Method::PATCH, "/api/update/zzz".to_string()),
            (Method::DELETE, "/api/delete/1234".to_string()),
            (Method::PATCH, "/api/update/1".to_string()),
            (Method::DELETE, format!("/api/delete/{}", ObjectId::new().to_hex())),
        ] {
            let (status, body) = send(&app, method, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body, json!({"error": "Task not found"}));
        }

        let (status, body) = send(&app, Method::PATCH, &format!("/api/update/{}", hex), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body[0]["completed"], json!(true));

        let (_, body) = send(&app, Method::GET, "/api/version", None).await;
        assert_eq!(body["backend"], json!("document"));

        let (status, _) = send(&app, Method::DELETE, &format!("/api/delete/{}", hex), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_version_reports_backend() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/version", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], json!("memory"));
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/api/tasks")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_static_frontend_with_index_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
        let app = create_router(
            Arc::new(MemoryStore::new()),
            Some(dir.path().to_path_buf()),
        );

        for uri in ["/", "/some/client/route"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(String::from_utf8_lossy(&bytes).contains("root"));
        }

        // the API still wins over the fallback
        let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        for uri in ["/api/nope", "/api/tasks/extra"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body, json!({"error": "Not found"}));
        }
    }

    #[test]
    fn test_resolve_static_dir_missing_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("dist");
        assert_eq!(resolve_static_dir(Some(missing)), None);
        assert_eq!(
            resolve_static_dir(Some(dir.path().to_path_buf())),
            Some(dir.path().to_path_buf())
        );
    }
}
