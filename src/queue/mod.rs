//! Task queue trait and implementations

/// In-memory FIFO queue
pub mod memory;

use crate::task::Task;
use async_trait::async_trait;

/// Trait for queue implementations.
///
/// The queue is a strict FIFO shared by the submitting side (producers) and
/// the worker pool (consumers). Each pushed task is delivered to exactly one
/// consumer.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Add a task to the tail of the queue
    async fn push(&self, task: Task) -> crate::Result<()>;

    /// Remove and return the task at the head of the queue, waiting until
    /// one is available. Returns [`TaskRunnerError::QueueClosed`] once the
    /// queue has been closed and drained.
    ///
    /// [`TaskRunnerError::QueueClosed`]: crate::TaskRunnerError::QueueClosed
    async fn pop(&self) -> crate::Result<Task>;

    /// Get the current number of queued tasks
    async fn size(&self) -> usize;

    /// Check if the queue is empty
    async fn is_empty(&self) -> bool {
        self.size().await == 0
    }

    /// Close the queue: pushes are rejected, blocked `pop` calls are woken,
    /// and remaining tasks are drained before `pop` reports closure.
    async fn close(&self);
}
