//! Application configuration
//!
//! Layers, lowest precedence first: built-in defaults, the TOML config file,
//! environment variables (after `.env` is loaded), then CLI flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::Backend;
use crate::error::{Result, TaskError};

pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "HOST";
pub const ENV_MONGODB_URI: &str = "MONGODB_URI";
pub const ENV_BACKEND: &str = "TASKLIST_BACKEND";
pub const ENV_STATIC_DIR: &str = "TASKLIST_STATIC_DIR";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Built frontend to serve next to the API (index.html fallback)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Storage backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    /// MongoDB connection string (document backend only)
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_database() -> String {
    "todolist_db".to_string()
}

fn default_collection() -> String {
    "tasks".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            uri: None,
            database: default_database(),
            collection: default_collection(),
        }
    }
}

/// Everything the document backend needs to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl StorageConfig {
    /// Resolve the document backend settings; the connection string is required.
    pub fn document_settings(&self) -> Result<DocumentSettings> {
        let uri = self
            .uri
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                TaskError::config(format!(
                    "the document backend needs a connection string ({} or storage.uri)",
                    ENV_MONGODB_URI
                ))
            })?;

        Ok(DocumentSettings {
            uri: uri.to_string(),
            database: self.database.clone(),
            collection: self.collection.clone(),
        })
    }
}

impl Config {
    /// Override fields from environment variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| TaskError::config(format!("{} is not a valid port: {}", ENV_PORT, port)))?;
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        if let Some(uri) = lookup(ENV_MONGODB_URI).filter(|v| !v.trim().is_empty()) {
            self.storage.uri = Some(uri);
        }
        if let Some(backend) = lookup(ENV_BACKEND).filter(|v| !v.trim().is_empty()) {
            self.storage.backend = backend.parse()?;
        }
        if let Some(dir) = lookup(ENV_STATIC_DIR).filter(|v| !v.trim().is_empty()) {
            self.server.static_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Address to bind, e.g. `0.0.0.0:4000`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// ~/.tasklist/
pub fn tasklist_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tasklist"))
}

/// Default config file path (~/.tasklist/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    tasklist_dir().map(|dir| dir.join("config.toml"))
}

/// Parse a config file. Unknown keys are ignored, missing keys take defaults.
pub fn load_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        TaskError::config(format!("cannot read config file {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration from file and process environment.
///
/// An explicit `path` must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => match default_config_path() {
            Some(default) if default.exists() => load_file(&default)?,
            _ => Config::default(),
        },
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}
