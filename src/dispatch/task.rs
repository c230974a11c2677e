//! Task descriptors, handles and execution options.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::registry::ComputeValue;

use super::error::DispatchError;

/// A pure, idempotent, side-effect-free invocation: module + function name +
/// JSON arguments. Everything in it is an owned value, so a descriptor can
/// cross the worker isolation boundary as a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl TaskDescriptor {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument, serialized to JSON.
    pub fn arg(mut self, value: impl Serialize) -> Self {
        self.args.push(
            serde_json::to_value(value).expect("task arguments must be JSON-serializable"),
        );
        self
    }
}

/// Task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

/// Progress callback invoked on the caller side for every forwarded tick.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Per-submission options.
#[derive(Clone, Default)]
pub struct ExecuteOptions {
    /// Per-task budget; the pool default applies when unset.
    pub timeout: Option<Duration>,
    /// Observer for progress ticks.
    pub on_progress: Option<ProgressCallback>,
}

impl ExecuteOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_progress(mut self, callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }
}

/// Caller-side view of a submitted task.
///
/// Status and progress are observable while the task runs; [`TaskHandle::wait`]
/// consumes the handle and resolves with the outcome. Progress is monotone
/// non-decreasing and ends at 1.0 on every successful path.
pub struct TaskHandle {
    pub(crate) id: Uuid,
    pub(crate) submitted_at: DateTime<Utc>,
    pub(crate) cancel: CancellationToken,
    pub(crate) status_rx: watch::Receiver<TaskStatus>,
    pub(crate) progress_rx: watch::Receiver<f64>,
    pub(crate) outcome_rx: oneshot::Receiver<Result<ComputeValue, DispatchError>>,
}

impl TaskHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TaskStatus {
        *self.status_rx.borrow()
    }

    /// Last observed progress fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        *self.progress_rx.borrow()
    }

    /// Watch channel for progress ticks (for callers that await them).
    pub fn progress_watch(&self) -> watch::Receiver<f64> {
        self.progress_rx.clone()
    }

    /// Watch channel for status transitions.
    pub fn status_watch(&self) -> watch::Receiver<TaskStatus> {
        self.status_rx.clone()
    }

    /// Request cancellation. Cancelling an already-terminal task is a no-op;
    /// other tasks are never disturbed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Await the task outcome.
    pub async fn wait(self) -> Result<ComputeValue, DispatchError> {
        match self.outcome_rx.await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Shutdown),
        }
    }
}
