//! Task Runner - an in-process asynchronous task execution service
//!
//! This library provides a FIFO task queue, a bounded pool of concurrent
//! workers, a task-type handler registry, and an in-memory result store.
//! Work is submitted with a type name and an untyped parameter bag, and
//! its status and result are retrievable by task identifier.

/// HTTP ingress layer
pub mod api;
/// Configuration management
pub mod config;
/// Task handlers and the type-name registry
pub mod handler;
/// Queue trait and implementations
pub mod queue;
/// Submission and query operations
pub mod service;
/// Result store trait and implementations
pub mod storage;
/// Task, result and status definitions
pub mod task;
/// Worker loop and worker pool
pub mod worker;

pub use config::Config;
pub use handler::{Handler, HandlerRegistry};
pub use queue::memory::MemoryQueue;
pub use service::TaskService;
pub use storage::memory::MemoryStore;
pub use task::{ParamMap, Task, TaskResult, TaskStatus};
pub use worker::pool::WorkerPool;

use thiserror::Error;

/// Result type for task runner operations
pub type Result<T> = std::result::Result<T, TaskRunnerError>;

/// Error types for the task runner
#[derive(Error, Debug)]
pub enum TaskRunnerError {
    /// Queue has been closed, no more tasks will be delivered
    #[error("Queue is closed")]
    QueueClosed,

    /// Task with the specified ID was not found
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Task execution failed with an error
    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Worker pool encountered an error
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
