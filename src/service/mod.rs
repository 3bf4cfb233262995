//! Submission and query operations exposed to the ingress layer

use crate::queue::TaskQueue;
use crate::storage::ResultStore;
use crate::task::{ParamMap, Task, TaskResult, TaskStatus};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a result query
#[derive(Debug, Clone)]
pub enum ResultLookup {
    /// No task with this identifier was ever submitted
    NotFound,

    /// The task exists but has not reached a terminal status yet
    NotReady(TaskStatus),

    /// The task is terminal; the full record is readable
    Ready(TaskResult),
}

/// The three core operations: submit, status, result.
///
/// Holds the queue and result store; cheap to clone and share with the
/// HTTP layer. Places no constraints on transport or encoding.
#[derive(Clone)]
pub struct TaskService {
    queue: Arc<dyn TaskQueue>,
    store: Arc<dyn ResultStore>,
}

impl TaskService {
    /// Create a new service over the given queue and store
    pub fn new(queue: Arc<dyn TaskQueue>, store: Arc<dyn ResultStore>) -> Self {
        Self { queue, store }
    }

    /// Create a task and enqueue it, returning its identifier.
    ///
    /// A `pending` record is written to the store before the push so that
    /// a query for a queued-but-unstarted task is distinguishable from a
    /// query for an unknown identifier.
    pub async fn submit(&self, task_type: impl Into<String>, params: ParamMap) -> crate::Result<String> {
        let task = Task::new(task_type, params);
        let task_id = task.id.clone();

        self.store.set(&task_id, TaskResult::pending(&task)).await?;
        self.queue.push(task).await?;

        debug!("Task {} submitted", task_id);
        Ok(task_id)
    }

    /// Get the current status of a task
    pub async fn status(&self, task_id: &str) -> Option<TaskStatus> {
        self.store.get(task_id).await.map(|r| r.status)
    }

    /// Get the full result record of a task.
    ///
    /// The record is only handed out once the task is terminal; before
    /// that the caller gets an explicit not-ready indication carrying the
    /// current status.
    pub async fn result(&self, task_id: &str) -> ResultLookup {
        match self.store.get(task_id).await {
            None => ResultLookup::NotFound,
            Some(record) if record.status.is_terminal() => ResultLookup::Ready(record),
            Some(record) => ResultLookup::NotReady(record.status),
        }
    }
}
