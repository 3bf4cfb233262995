use crate::handler::HandlerRegistry;
use crate::queue::TaskQueue;
use crate::storage::ResultStore;
use crate::worker::Worker;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

/// A pool of workers that process tasks concurrently.
///
/// The queue, result store and handler registry are passed in at
/// construction; the pool owns nothing else. Throughput is bounded by
/// the worker count times the average handler duration, since each
/// worker runs one handler at a time.
pub struct WorkerPool {
    worker_count: usize,
    queue: Arc<dyn TaskQueue>,
    store: Arc<dyn ResultStore>,
    registry: Arc<HandlerRegistry>,
    handles: Vec<JoinHandle<()>>,
    shutdown_tx: Option<broadcast::Sender<()>>,
}

impl WorkerPool {
    /// Create a new worker pool with the specified number of workers
    pub fn new(
        worker_count: usize,
        queue: Arc<dyn TaskQueue>,
        store: Arc<dyn ResultStore>,
        registry: Arc<HandlerRegistry>,
    ) -> Self {
        Self {
            worker_count,
            queue,
            store,
            registry,
            handles: Vec::new(),
            shutdown_tx: None,
        }
    }

    /// Launch the worker loops
    pub fn start(&mut self) {
        let (shutdown_tx, _) = broadcast::channel(1);
        self.shutdown_tx = Some(shutdown_tx.clone());

        info!("Starting worker pool with {} workers", self.worker_count);

        for i in 0..self.worker_count {
            let worker = Worker::new(
                i,
                Arc::clone(&self.queue),
                Arc::clone(&self.store),
                Arc::clone(&self.registry),
            );
            let shutdown_rx = shutdown_tx.subscribe();

            let handle = tokio::spawn(async move {
                worker.run(shutdown_rx).await;
            });

            self.handles.push(handle);
        }
    }

    /// Stop all workers and wait for them to finish.
    ///
    /// Closes the queue so that no worker stays blocked in `pop`, signals
    /// the loops to exit, and joins them. Workers finish the task they are
    /// currently executing, so a handler that exceeds the timeout leaves
    /// its worker running.
    pub async fn shutdown(&mut self, timeout_duration: Duration) -> crate::Result<()> {
        info!("Initiating graceful shutdown...");

        self.queue.close().await;
        if let Some(shutdown_tx) = &self.shutdown_tx {
            let _ = shutdown_tx.send(());
        }

        info!(
            "Waiting for {} workers to complete (timeout: {}s)...",
            self.handles.len(),
            timeout_duration.as_secs()
        );

        let shutdown_result = timeout(timeout_duration, async {
            for (idx, handle) in self.handles.drain(..).enumerate() {
                match handle.await {
                    Ok(()) => info!("Worker {} stopped gracefully", idx),
                    Err(e) => warn!("Worker {} panicked: {}", idx, e),
                }
            }
        })
        .await;

        match shutdown_result {
            Ok(()) => {
                info!("All workers stopped successfully");
                Ok(())
            }
            Err(_) => {
                warn!("Shutdown timeout exceeded, some workers may still be running");
                Err(crate::TaskRunnerError::WorkerPool(
                    "Shutdown timeout exceeded".to_string(),
                ))
            }
        }
    }

    /// Get the number of workers in the pool
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Check if the pool is running
    pub fn is_running(&self) -> bool {
        !self.handles.is_empty()
    }
}
