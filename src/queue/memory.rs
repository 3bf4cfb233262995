//! In-memory FIFO queue with waiting consumers

use crate::queue::TaskQueue;
use crate::task::Task;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::{Mutex, Notify};
use tracing::debug;

struct Inner {
    tasks: VecDeque<Task>,
    closed: bool,
}

/// Unbounded in-memory FIFO queue.
///
/// A mutex-protected deque plus a [`Notify`] used to wake consumers waiting
/// in [`pop`]. Multiple consumers may wait concurrently; every pushed task
/// is handed to exactly one of them, in push order.
///
/// [`pop`]: TaskQueue::pop
pub struct MemoryQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl MemoryQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks: VecDeque::new(),
                closed: false,
            }),
            notify: Notify::new(),
        }
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskQueue for MemoryQueue {
    async fn push(&self, task: Task) -> crate::Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return Err(crate::TaskRunnerError::QueueClosed);
        }

        debug!("Task {} pushed (queue size: {})", task.id, inner.tasks.len() + 1);
        inner.tasks.push_back(task);
        drop(inner);

        self.notify.notify_one();
        Ok(())
    }

    async fn pop(&self) -> crate::Result<Task> {
        loop {
            // Register interest before inspecting the queue so a push
            // between the check and the await is not missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut inner = self.inner.lock().await;
                if let Some(task) = inner.tasks.pop_front() {
                    debug!("Task {} popped (queue size: {})", task.id, inner.tasks.len());
                    return Ok(task);
                }
                if inner.closed {
                    return Err(crate::TaskRunnerError::QueueClosed);
                }
            }

            notified.await;
        }
    }

    async fn size(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.tasks.len()
    }

    async fn close(&self) {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        drop(inner);

        debug!("Queue closed");
        self.notify.notify_waiters();
    }
}
