//! Task storage strategies
//!
//! Both backends implement [`TaskStore`]; the HTTP layer is generic over it and
//! never touches the underlying container directly.

pub mod config;
pub mod document;
pub mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};
use crate::model::{Task, TaskKey};

pub use document::DocumentStore;
pub use memory::MemoryStore;

/// Message for a create request without a usable description
pub const DESCRIPTION_REQUIRED: &str = "Task description is required";

/// Every stored task has a non-empty description.
pub(crate) fn require_description(description: &str) -> Result<()> {
    if description.is_empty() {
        return Err(TaskError::invalid_data(DESCRIPTION_REQUIRED));
    }
    Ok(())
}

/// Which storage strategy is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local list, lost on restart
    #[default]
    Memory,
    /// MongoDB collection
    Document,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Document => "document",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "document" | "mongo" | "mongodb" => Ok(Backend::Document),
            other => Err(TaskError::config(format!("unknown storage backend: {}", other))),
        }
    }
}

/// Collection operations every storage strategy provides.
///
/// Each call is a single storage operation; implementations own their own
/// synchronization.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    /// Id type this backend assigns
    type Id: TaskKey;

    /// Which strategy this is
    fn backend(&self) -> Backend;

    /// All stored tasks, in backend order (insertion order for both backends)
    async fn list(&self) -> Result<Vec<Task<Self::Id>>>;

    /// Store a new incomplete task and return it with its assigned id.
    ///
    /// An empty description is rejected with [`TaskError::InvalidData`].
    async fn insert(&self, description: String) -> Result<Task<Self::Id>>;

    /// Mark a task completed. Completing an already completed task succeeds.
    ///
    /// Returns [`TaskError::NotFound`] when no task has this id.
    async fn complete(&self, id: &Self::Id) -> Result<()>;

    /// Remove a task.
    ///
    /// Returns [`TaskError::NotFound`] when no task has this id.
    async fn delete(&self, id: &Self::Id) -> Result<()>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;
}
