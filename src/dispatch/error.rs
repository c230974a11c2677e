//! Dispatch-layer error taxonomy.

use std::time::Duration;

use crate::algorithms::ComputeError;

/// Why a task failed to produce a value.
///
/// Retry policy: deterministic computations reproduce their failure, so
/// nothing here is auto-retried — only a timeout may be retried once on a
/// fresh worker, at the caller's discretion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    /// Malformed task: unknown algorithm name, missing or mis-shaped
    /// arguments. Surfaced before the task occupies a worker.
    #[error("invalid task input: {0}")]
    Input(String),
    /// An upstream computation the algorithm depends on is missing.
    #[error("precondition not met: {0}")]
    Precondition(String),
    /// The task exceeded its budget; its worker was torn down and replaced.
    #[error("task exceeded its {0:?} budget")]
    Timeout(Duration),
    /// The compute function raised an uncaught error; wraps its message.
    #[error("compute function failed: {0}")]
    WorkerFailure(String),
    /// The caller aborted the task.
    #[error("task was cancelled")]
    Cancelled,
    /// The dispatcher went away before the task resolved.
    #[error("dispatcher shut down before the task resolved")]
    Shutdown,
}

impl DispatchError {
    /// Only timeouts are worth retrying (once, on a fresh worker).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<ComputeError> for DispatchError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::Input(message) => Self::Input(message),
            ComputeError::Precondition(message) => Self::Precondition(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_timeout_is_retryable() {
        assert!(DispatchError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!DispatchError::Input("x".into()).is_retryable());
        assert!(!DispatchError::WorkerFailure("x".into()).is_retryable());
        assert!(!DispatchError::Cancelled.is_retryable());
    }

    #[test]
    fn test_compute_error_mapping() {
        let err: DispatchError = ComputeError::Precondition("needs coords".into()).into();
        assert!(matches!(err, DispatchError::Precondition(_)));
        assert!(err.to_string().contains("needs coords"));
    }
}
