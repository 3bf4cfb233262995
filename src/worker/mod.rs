/// Worker pool implementation
pub mod pool;

use crate::handler::HandlerRegistry;
use crate::queue::TaskQueue;
use crate::storage::ResultStore;
use crate::task::{Task, TaskResult};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Error message recorded when no handler is bound to a task's type
pub const UNKNOWN_TASK_TYPE: &str = "unknown task type";

/// A single sequential loop consuming tasks from the shared queue.
///
/// Each worker pops one task at a time, executes it to completion, and
/// writes status transitions to the result store. Parallelism comes from
/// the pool running several such loops concurrently.
pub struct Worker {
    id: usize,
    queue: Arc<dyn TaskQueue>,
    store: Arc<dyn ResultStore>,
    registry: Arc<HandlerRegistry>,
}

impl Worker {
    /// Create a new worker with the given ID
    pub fn new(
        id: usize,
        queue: Arc<dyn TaskQueue>,
        store: Arc<dyn ResultStore>,
        registry: Arc<HandlerRegistry>,
    ) -> Self {
        Self {
            id,
            queue,
            store,
            registry,
        }
    }

    /// Consume tasks until the queue closes or a shutdown signal arrives.
    ///
    /// A shutdown signal is only acted on between tasks; a handler that is
    /// already running is allowed to finish.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        info!("Worker {} started", self.id);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Worker {} received shutdown signal", self.id);
                    break;
                }
                popped = self.queue.pop() => match popped {
                    Ok(task) => self.process(task).await,
                    Err(crate::TaskRunnerError::QueueClosed) => {
                        info!("Worker {} exiting: queue closed", self.id);
                        break;
                    }
                    Err(e) => {
                        error!("Worker {} failed to pop task: {}", self.id, e);
                        break;
                    }
                },
            }
        }

        info!("Worker {} stopped", self.id);
    }

    /// Execute one task: mark it processing, resolve its handler, run it,
    /// and record exactly one terminal result.
    async fn process(&self, task: Task) {
        info!(
            "Worker {} processing task {} of type {}",
            self.id, task.id, task.task_type
        );

        // First write makes the in-progress task visible to queriers
        // before execution completes.
        let record = TaskResult::processing(&task);
        if let Err(e) = self.store.set(&task.id, record.clone()).await {
            error!("Failed to record processing status for {}: {}", task.id, e);
        }

        let Some(handler) = self.registry.resolve(&task.task_type).await else {
            warn!("Task {} failed: unknown type {}", task.id, task.task_type);
            if let Err(e) = self.store.set(&task.id, record.failed(UNKNOWN_TASK_TYPE)).await {
                error!("Failed to record result for {}: {}", task.id, e);
            }
            return;
        };

        let terminal = match handler.execute(&task.params).await {
            Ok(payload) => record.completed(payload),
            Err(e) => record.failed(e.to_string()),
        };

        let status = terminal.status;
        if let Err(e) = self.store.set(&task.id, terminal).await {
            error!("Failed to record result for {}: {}", task.id, e);
        }

        info!("Task {} processed with status {}", task.id, status);
    }
}
