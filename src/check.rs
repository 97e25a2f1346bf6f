//! Startup checks: configuration and backend reachability

use crate::storage::config::Config;
use crate::storage::{Backend, DocumentStore, MemoryStore, TaskStore};

pub struct CheckResult {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Validate the resolved configuration and ping the configured backend.
pub async fn check_environment(config: &Config) -> CheckResult {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push("server.port must not be 0".to_string());
    }

    if let Some(dir) = &config.server.static_dir {
        if !dir.join("index.html").is_file() {
            errors.push(format!(
                "static directory {} has no index.html",
                dir.display()
            ));
        }
    }

    if let Err(e) = check_backend(config).await {
        errors.push(e);
    }

    CheckResult {
        ok: errors.is_empty(),
        errors,
    }
}

async fn check_backend(config: &Config) -> Result<(), String> {
    match config.storage.backend {
        Backend::Memory => MemoryStore::new().ping().await.map_err(|e| e.to_string()),
        Backend::Document => {
            let settings = config
                .storage
                .document_settings()
                .map_err(|e| e.to_string())?;
            // connect() already pings
            DocumentStore::connect(&settings)
                .await
                .map(|_| ())
                .map_err(|e| format!("cannot reach MongoDB: {}", e))
        }
    }
}
