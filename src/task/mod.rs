use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Untyped key/value bag used for task parameters and result payloads.
/// Only handlers interpret its contents; the queue and pool carry it opaquely.
pub type ParamMap = serde_json::Map<String, serde_json::Value>;

/// Status of a task in its lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is queued and waiting to be picked up
    Pending,

    /// Task is currently being executed by a worker
    Processing,

    /// Task completed successfully
    Completed,

    /// Task failed (unknown type or handler error)
    Failed,
}

impl TaskStatus {
    /// Whether the status is terminal (no further transitions follow)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A unit of submitted work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: String,

    /// Type name used to resolve a handler in the registry
    #[serde(rename = "type")]
    pub task_type: String,

    /// Handler-specific parameters
    pub params: ParamMap,

    /// Current status of the task
    pub status: TaskStatus,

    /// Task creation timestamp
    pub created_at: DateTime<Utc>,

    /// Execution start time, set when a worker picks the task up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Execution end time, set on reaching a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new pending task with a fresh identifier
    pub fn new(task_type: impl Into<String>, params: ParamMap) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_type: task_type.into(),
            params,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }
}

/// Status/result snapshot for a task, keyed by task identifier.
///
/// Exactly one record exists per task once submitted; workers replace it
/// whole as the status advances. Readers never see a partially-written
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Identifier of the task this record belongs to
    pub task_id: String,

    /// Current status
    pub status: TaskStatus,

    /// Payload returned by the handler on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ParamMap>,

    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Carried over from the task
    pub created_at: DateTime<Utc>,

    /// Execution start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Execution end time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl TaskResult {
    /// Initial record written at submission time
    pub fn pending(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            status: TaskStatus::Pending,
            result: None,
            error: None,
            created_at: task.created_at,
            started_at: None,
            ended_at: None,
        }
    }

    /// Record written when a worker picks the task up
    pub fn processing(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            status: TaskStatus::Processing,
            result: None,
            error: None,
            created_at: task.created_at,
            started_at: Some(Utc::now()),
            ended_at: None,
        }
    }

    /// Terminal record for a successful execution
    pub fn completed(mut self, result: ParamMap) -> Self {
        self.status = TaskStatus::Completed;
        self.result = Some(result);
        self.ended_at = Some(Utc::now());
        self
    }

    /// Terminal record for a failed execution
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.ended_at = Some(Utc::now());
        self
    }
}
