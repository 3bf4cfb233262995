//! In-memory result store

use crate::storage::ResultStore;
use crate::task::TaskResult;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory result store backed by a read/write-locked map
pub struct MemoryStore {
    results: RwLock<HashMap<String, TaskResult>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            results: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn set(&self, task_id: &str, result: TaskResult) -> crate::Result<()> {
        let mut results = self.results.write().await;
        results.insert(task_id.to_string(), result);
        Ok(())
    }

    async fn get(&self, task_id: &str) -> Option<TaskResult> {
        let results = self.results.read().await;
        results.get(task_id).cloned()
    }
}
