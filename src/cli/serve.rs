//! `tasklist serve`: open the configured store and run the API server

use std::path::PathBuf;
use std::sync::Arc;

use crate::api;
use crate::error::Result;
use crate::storage::config::Config;
use crate::storage::{Backend, DocumentStore, MemoryStore};

/// Flags given on the command line; they win over env and file.
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub backend: Option<Backend>,
    pub static_dir: Option<PathBuf>,
}

impl ServeOverrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(dir) = self.static_dir {
            config.server.static_dir = Some(dir);
        }
    }
}

/// Execute the web server
pub async fn execute(config: Config) -> Result<()> {
    let static_dir = api::resolve_static_dir(config.server.static_dir.clone());
    let addr = config.listen_addr();

    match config.storage.backend {
        Backend::Memory => {
            tracing::info!("using in-memory storage; tasks are lost on restart");
            api::start_server(Arc::new(MemoryStore::new()), &addr, static_dir).await
        }
        Backend::Document => {
            let settings = config.storage.document_settings()?;
            let store = DocumentStore::connect(&settings).await?;
            api::start_server(Arc::new(store), &addr, static_dir).await
        }
    }
}
