//! Result store trait and implementations

/// In-memory result store
pub mod memory;

use crate::task::TaskResult;
use async_trait::async_trait;

/// Trait for result store implementations.
///
/// Maps a task identifier to its current status/result snapshot. Workers
/// write status transitions; the ingress side reads them concurrently.
/// Replacement is atomic per key; independent keys have no ordering
/// relative to each other.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert or overwrite the record for the given task identifier
    async fn set(&self, task_id: &str, result: TaskResult) -> crate::Result<()>;

    /// Get the current record for the given task identifier
    async fn get(&self, task_id: &str) -> Option<TaskResult>;
}
