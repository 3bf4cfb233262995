use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use task_runner::handler::{Handler, HandlerRegistry};
use task_runner::queue::memory::MemoryQueue;
use task_runner::storage::memory::MemoryStore;
use task_runner::storage::ResultStore;
use task_runner::task::{ParamMap, TaskResult, TaskStatus};
use task_runner::worker::pool::WorkerPool;
use task_runner::worker::UNKNOWN_TASK_TYPE;
use task_runner::TaskService;
use tokio::time::{sleep, timeout, Duration, Instant};

struct SleepHandler {
    duration: Duration,
}

#[async_trait]
impl Handler for SleepHandler {
    async fn execute(&self, _params: &ParamMap) -> task_runner::Result<ParamMap> {
        sleep(self.duration).await;
        let mut result = ParamMap::new();
        result.insert("slept_ms".to_string(), json!(self.duration.as_millis() as u64));
        Ok(result)
    }
}

struct FailingHandler;

#[async_trait]
impl Handler for FailingHandler {
    async fn execute(&self, _params: &ParamMap) -> task_runner::Result<ParamMap> {
        Err(task_runner::TaskRunnerError::ExecutionFailed(
            "boom".to_string(),
        ))
    }
}

struct CountingHandler {
    invocations: Arc<AtomicUsize>,
}

#[async_trait]
impl Handler for CountingHandler {
    async fn execute(&self, _params: &ParamMap) -> task_runner::Result<ParamMap> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(ParamMap::new())
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    service: TaskService,
    pool: WorkerPool,
}

fn fixture(worker_count: usize, registry: HandlerRegistry) -> Fixture {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let pool = WorkerPool::new(
        worker_count,
        queue.clone(),
        store.clone(),
        Arc::new(registry),
    );
    let service = TaskService::new(queue, store.clone());
    Fixture {
        store,
        service,
        pool,
    }
}

/// Poll the store until the task reaches a terminal status
async fn wait_terminal(store: &Arc<MemoryStore>, task_id: &str) -> TaskResult {
    timeout(Duration::from_secs(5), async {
        loop {
            if let Some(record) = store.get(task_id).await {
                if record.status.is_terminal() {
                    return record;
                }
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("task did not reach a terminal status in time")
}

#[tokio::test]
async fn test_worker_pool_creation() {
    let f = fixture(4, HandlerRegistry::new());
    assert_eq!(f.pool.worker_count(), 4);
    assert!(!f.pool.is_running());
}

#[tokio::test]
async fn test_task_completes_with_payload() {
    let registry = HandlerRegistry::new();
    registry
        .register(
            "quick",
            Arc::new(SleepHandler {
                duration: Duration::from_millis(20),
            }),
        )
        .await;

    let mut f = fixture(2, registry);
    f.pool.start();

    let task_id = f.service.submit("quick", ParamMap::new()).await.unwrap();
    let record = wait_terminal(&f.store, &task_id).await;

    assert_eq!(record.status, TaskStatus::Completed);
    assert_eq!(record.result.unwrap()["slept_ms"], json!(20));
    assert!(record.error.is_none());
    assert!(record.started_at.is_some());
    assert!(record.ended_at.is_some());
    assert!(record.created_at <= record.started_at.unwrap());
    assert!(record.started_at.unwrap() <= record.ended_at.unwrap());

    f.pool.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_unknown_type_fails_without_invoking_handlers() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let registry = HandlerRegistry::new();
    registry
        .register(
            "known",
            Arc::new(CountingHandler {
                invocations: invocations.clone(),
            }),
        )
        .await;

    let mut f = fixture(1, registry);
    f.pool.start();

    let task_id = f
        .service
        .submit("does_not_exist", ParamMap::new())
        .await
        .unwrap();
    let record = wait_terminal(&f.store, &task_id).await;

    assert_eq!(record.status, TaskStatus::Failed);
    assert_eq!(record.error.as_deref(), Some(UNKNOWN_TASK_TYPE));
    assert!(record.result.is_none());
    assert!(record.ended_at.is_some());
    assert_eq!(invocations.load(Ordering::SeqCst), 0);

    f.pool.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_handler_error_recorded_as_failed() {
    let registry = HandlerRegistry::new();
    registry.register("failing", Arc::new(FailingHandler)).await;

    let mut f = fixture(1, registry);
    f.pool.start();

    let task_id = f.service.submit("failing", ParamMap::new()).await.unwrap();
    let record = wait_terminal(&f.store, &task_id).await;

    assert_eq!(record.status, TaskStatus::Failed);
    assert!(record.error.unwrap().contains("boom"));
    assert!(record.result.is_none());

    f.pool.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_processing_visible_before_completion() {
    let registry = HandlerRegistry::new();
    registry
        .register(
            "slow",
            Arc::new(SleepHandler {
                duration: Duration::from_millis(300),
            }),
        )
        .await;

    let mut f = fixture(1, registry);
    f.pool.start();

    let task_id = f.service.submit("slow", ParamMap::new()).await.unwrap();
    sleep(Duration::from_millis(100)).await;

    let record = f.store.get(&task_id).await.unwrap();
    assert_eq!(record.status, TaskStatus::Processing);
    assert!(record.started_at.is_some());
    assert!(record.ended_at.is_none());

    let record = wait_terminal(&f.store, &task_id).await;
    assert_eq!(record.status, TaskStatus::Completed);

    f.pool.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_status_never_regresses() {
    let registry = HandlerRegistry::new();
    registry
        .register(
            "slow",
            Arc::new(SleepHandler {
                duration: Duration::from_millis(200),
            }),
        )
        .await;

    let mut f = fixture(1, registry);
    f.pool.start();

    let task_id = f.service.submit("slow", ParamMap::new()).await.unwrap();

    fn rank(status: TaskStatus) -> u8 {
        match status {
            TaskStatus::Pending => 0,
            TaskStatus::Processing => 1,
            TaskStatus::Completed | TaskStatus::Failed => 2,
        }
    }

    let mut observed = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let record = f.store.get(&task_id).await.unwrap();
        observed.push(record.status);
        if record.status.is_terminal() || Instant::now() > deadline {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    assert!(observed.last().unwrap().is_terminal());
    assert!(observed.windows(2).all(|w| rank(w[0]) <= rank(w[1])));

    f.pool.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_throughput_bounded_by_worker_count() {
    let task_time = Duration::from_millis(100);
    let workers = 3;
    let tasks = 6;

    let registry = HandlerRegistry::new();
    registry
        .register(
            "timed",
            Arc::new(SleepHandler {
                duration: task_time,
            }),
        )
        .await;

    let mut f = fixture(workers, registry);
    f.pool.start();

    let started = Instant::now();
    let mut task_ids = Vec::new();
    for _ in 0..tasks {
        task_ids.push(f.service.submit("timed", ParamMap::new()).await.unwrap());
    }

    for task_id in &task_ids {
        let record = wait_terminal(&f.store, task_id).await;
        assert_eq!(record.status, TaskStatus::Completed);
    }
    let elapsed = started.elapsed();

    // 6 tasks over 3 workers means two sequential batches: the wall-clock
    // time cannot be less than ceil(M/N) * T.
    let batches = (tasks + workers - 1) / workers;
    assert!(
        elapsed >= task_time * batches as u32 - Duration::from_millis(20),
        "completed faster than the worker count allows: {:?}",
        elapsed
    );
    assert!(
        elapsed < task_time * tasks as u32,
        "tasks were not processed concurrently: {:?}",
        elapsed
    );

    f.pool.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_shutdown_joins_all_workers() {
    let registry = HandlerRegistry::new();
    registry
        .register(
            "quick",
            Arc::new(SleepHandler {
                duration: Duration::from_millis(50),
            }),
        )
        .await;

    let mut f = fixture(4, registry);
    f.pool.start();
    assert!(f.pool.is_running());

    let task_id = f.service.submit("quick", ParamMap::new()).await.unwrap();
    wait_terminal(&f.store, &task_id).await;

    f.pool.shutdown(Duration::from_secs(5)).await.unwrap();
    assert!(!f.pool.is_running());
}
