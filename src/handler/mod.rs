//! Task handlers and the type-name registry

/// Reference long-running computation handler
pub mod long_computation;

use crate::task::ParamMap;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Executable capability bound to a task type.
///
/// A handler receives the task's parameter bag and returns either a result
/// payload or an error. It is responsible for its own parameter validation
/// and type coercion; execution may take arbitrarily long.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Execute the handler with the given parameters
    async fn execute(&self, params: &ParamMap) -> crate::Result<ParamMap>;
}

/// Registry mapping task-type names to handlers.
///
/// Constructed explicitly and shared by reference with the worker pool.
/// Registrations may happen concurrently with resolution; a resolve after
/// a register always observes the registered handler, and registering an
/// already-bound name replaces the previous handler.
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with the default handlers pre-registered
    pub async fn with_defaults() -> Self {
        let registry = Self::new();
        registry
            .register(
                "long_computation",
                Arc::new(long_computation::LongComputationHandler::new()),
            )
            .await;
        registry
    }

    /// Bind a handler to a task-type name, replacing any previous binding
    pub async fn register(&self, task_type: impl Into<String>, handler: Arc<dyn Handler>) {
        let task_type = task_type.into();
        debug!("Registering handler for task type '{}'", task_type);
        let mut handlers = self.handlers.write().await;
        handlers.insert(task_type, handler);
    }

    /// Look up the handler for a task-type name
    pub async fn resolve(&self, task_type: &str) -> Option<Arc<dyn Handler>> {
        let handlers = self.handlers.read().await;
        handlers.get(task_type).cloned()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
