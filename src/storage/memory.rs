//! In-memory task storage.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{require_description, Backend, TaskStore};
use crate::error::{Result, TaskError};
use crate::model::{SequentialId, Task};

/// Everything behind the lock.
struct MemoryState {
    /// Next id to assign; only ever grows.
    next_id: SequentialId,
    /// Tasks in insertion order.
    tasks: Vec<Task<SequentialId>>,
}

/// Task list held in process memory.
///
/// A single mutex guards the whole collection, so concurrent requests are
/// applied one at a time.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: SequentialId::FIRST,
                tasks: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(id: &SequentialId) -> TaskError {
    TaskError::not_found(format!("task {}", id))
}

#[async_trait]
impl TaskStore for MemoryStore {
    type Id = SequentialId;

    fn backend(&self) -> Backend {
        Backend::Memory
    }

    async fn list(&self) -> Result<Vec<Task<SequentialId>>> {
        let state = self.state.lock().await;
        Ok(state.tasks.clone())
    }

    async fn insert(&self, description: String) -> Result<Task<SequentialId>> {
        require_description(&description)?;
        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id = id.next();

        let task = Task::new(id, description);
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn complete(&self, id: &SequentialId) -> Result<()> {
        let mut state = self.state.lock().await;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| missing(id))?;
        task.mark_completed();
        Ok(())
    }

    async fn delete(&self, id: &SequentialId) -> Result<()> {
        let mut state = self.state.lock().await;
        let index = state
            .tasks
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| missing(id))?;
        // remove, not swap_remove: list order must stay insertion order
        state.tasks.remove(index);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
