//! Unified error type for tasklist
//!
//! Built on `thiserror`; storage backends, configuration loading and the
//! CLI all return [`TaskError`] so errors propagate with `?`.

use std::io;
use thiserror::Error;

/// tasklist error type
#[derive(Debug, Error)]
pub enum TaskError {
    /// I/O error (config file reads, socket binding, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid or incomplete configuration
    #[error("Config error: {0}")]
    Config(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// MongoDB driver error (connection loss, decode failure, ...)
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Storage error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client supplied invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// tasklist Result alias
pub type Result<T> = std::result::Result<T, TaskError>;

impl TaskError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }
}
