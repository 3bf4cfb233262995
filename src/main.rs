//! Task Runner binary entry point

use std::sync::Arc;
use tokio::time::Duration;

use task_runner::{
    api, Config, HandlerRegistry, MemoryQueue, MemoryStore, TaskService, WorkerPool,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Task Runner");

    let config = Config::load()?;
    config.validate()?;

    info!(
        "Initialized with {} workers, listening on {}",
        config.worker_count, config.bind_addr
    );

    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let registry = Arc::new(HandlerRegistry::with_defaults().await);

    let mut pool = WorkerPool::new(
        config.worker_count,
        queue.clone(),
        store.clone(),
        registry,
    );
    pool.start();

    let service = TaskService::new(queue, store);
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Starting server on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down server...");
    pool.shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await?;
    info!("Server stopped");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
