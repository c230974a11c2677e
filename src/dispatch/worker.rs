//! Isolated compute workers.
//!
//! One worker = one dedicated OS thread draining a private job channel. No
//! memory is shared with the caller: a job carries an owned descriptor in
//! and sends owned progress/result messages out. Each job deserializes its
//! own private graph copy, so tasks never contend on shared state.
//!
//! A panic inside a compute function is caught and reported as a failed
//! task; the thread itself survives and keeps serving its slot. A worker
//! that stops answering (timeout) is simply dropped by the pool — its
//! channels close and any late sends land nowhere.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::algorithms::ProgressReporter;
use crate::registry::{self, ComputeValue};

use super::error::DispatchError;
use super::task::TaskDescriptor;

/// One unit of work shipped to a worker thread.
pub(crate) struct Job {
    pub descriptor: TaskDescriptor,
    pub cancel: CancellationToken,
    pub progress_tx: mpsc::UnboundedSender<f64>,
    pub result_tx: oneshot::Sender<Result<ComputeValue, DispatchError>>,
}

/// Pool-side handle to a worker thread.
pub(crate) struct Worker {
    pub id: usize,
    pub busy: bool,
    sender: std::sync::mpsc::Sender<Job>,
}

impl Worker {
    /// Spawn a worker thread and return its handle.
    pub fn spawn(id: usize) -> Self {
        let (sender, receiver) = std::sync::mpsc::channel::<Job>();
        std::thread::Builder::new()
            .name(format!("graph-worker-{id}"))
            .spawn(move || worker_loop(id, receiver))
            .expect("worker thread spawn");
        debug!(worker = id, "worker thread started");
        Self {
            id,
            busy: false,
            sender,
        }
    }

    /// Hand a job to the thread. A dead thread returns the job so the
    /// caller can re-route it.
    pub fn submit(&self, job: Job) -> Result<(), Job> {
        self.sender.send(job).map_err(|failed| failed.0)
    }
}

fn worker_loop(id: usize, receiver: std::sync::mpsc::Receiver<Job>) {
    while let Ok(job) = receiver.recv() {
        run_job(id, job);
    }
    debug!(worker = id, "worker thread shutting down");
}

fn run_job(worker_id: usize, job: Job) {
    let Job {
        descriptor,
        cancel,
        progress_tx,
        result_tx,
    } = job;

    // A task cancelled while queued never starts computing.
    if cancel.is_cancelled() {
        let _ = result_tx.send(Err(DispatchError::Cancelled));
        return;
    }

    let algorithm = match registry::resolve(&descriptor.module, &descriptor.function) {
        Some(algorithm) => algorithm,
        None => {
            let _ = result_tx.send(Err(DispatchError::Input(format!(
                "unknown compute function `{}::{}`",
                descriptor.module, descriptor.function
            ))));
            return;
        }
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut progress = ProgressReporter::new(move |fraction| {
            // Receiver may be gone (caller cancelled or timed out); drop.
            let _ = progress_tx.send(fraction);
        });
        algorithm.invoke(&descriptor.args, &mut progress)
    }));

    let result = match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(DispatchError::from(err)),
        Err(panic) => {
            let message = panic_message(&panic);
            warn!(
                worker = worker_id,
                module = %descriptor.module,
                function = %descriptor.function,
                %message,
                "compute function panicked"
            );
            Err(DispatchError::WorkerFailure(message))
        }
    };
    let _ = result_tx.send(result);
}

/// Best-effort extraction of a panic payload message.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unidentified panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_json() -> serde_json::Value {
        serde_json::json!({
            "nodes": ["a", "b"],
            "edges": [{"source": "a", "target": "b"}],
        })
    }

    #[tokio::test]
    async fn test_worker_computes_and_reports_progress() {
        let worker = Worker::spawn(0);
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();
        let job = Job {
            descriptor: TaskDescriptor::new("statistics", "degree")
                .arg(graph_json())
                .arg(serde_json::Value::Null),
            cancel: CancellationToken::new(),
            progress_tx,
            result_tx,
        };
        assert!(worker.submit(job).is_ok());

        let result = result_rx.await.unwrap().unwrap();
        assert_eq!(result.as_node_scalars().unwrap().len(), 2);

        let mut last = 0.0;
        while let Ok(tick) = progress_rx.try_recv() {
            assert!(tick >= last, "progress must be monotone");
            last = tick;
        }
        assert_eq!(last, 1.0, "terminal 1.0 must be reported");
    }

    #[tokio::test]
    async fn test_unknown_function_is_input_error() {
        let worker = Worker::spawn(1);
        let (progress_tx, _progress_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();
        let job = Job {
            descriptor: TaskDescriptor::new("statistics", "does_not_exist"),
            cancel: CancellationToken::new(),
            progress_tx,
            result_tx,
        };
        assert!(worker.submit(job).is_ok());
        let err = result_rx.await.unwrap().unwrap_err();
        assert!(matches!(err, DispatchError::Input(_)));
        assert!(err.to_string().contains("does_not_exist"));
    }

    #[tokio::test]
    async fn test_panic_is_caught_and_worker_survives() {
        let worker = Worker::spawn(2);

        // First job panics before any progress tick.
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();
        let submitted = worker.submit(Job {
            descriptor: TaskDescriptor::new("diagnostics", "fail"),
            cancel: CancellationToken::new(),
            progress_tx,
            result_tx,
        });
        assert!(submitted.is_ok());
        let err = result_rx.await.unwrap().unwrap_err();
        assert!(matches!(err, DispatchError::WorkerFailure(_)));
        assert!(
            progress_rx.try_recv().is_err(),
            "a fail-fast function must not report progress"
        );

        // The same worker thread still serves jobs.
        let (progress_tx, _progress_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();
        let submitted = worker.submit(Job {
            descriptor: TaskDescriptor::new("diagnostics", "echo").arg(serde_json::json!(5)),
            cancel: CancellationToken::new(),
            progress_tx,
            result_tx,
        });
        assert!(submitted.is_ok());
        assert!(result_rx.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_pre_cancelled_job_never_runs() {
        let worker = Worker::spawn(3);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();
        let submitted = worker.submit(Job {
            descriptor: TaskDescriptor::new("statistics", "degree").arg(graph_json()),
            cancel,
            progress_tx,
            result_tx,
        });
        assert!(submitted.is_ok());
        let err = result_rx.await.unwrap().unwrap_err();
        assert!(matches!(err, DispatchError::Cancelled));
        assert!(progress_rx.try_recv().is_err());
    }
}
