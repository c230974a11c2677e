//! Bounded worker pool and task dispatcher.
//!
//! Submission is async and never blocks the orchestrating context: a
//! [`ComputeDispatcher::execute`] call validates the descriptor, returns a
//! [`TaskHandle`], and a driver task takes over. Admission is a counting
//! semaphore with capacity = pool size (tokio's semaphore is FIFO, so
//! excess demand queues in submission order). Once a worker starts a job it
//! runs it to completion synchronously; there is no intra-task preemption.
//!
//! Timeouts assume the executing worker is unrecoverably stuck: the worker
//! is detached and a fresh thread takes its slot immediately. Cancellation
//! of a running task resolves the caller right away while the slot stays
//! occupied until the compute function returns, so other tasks are never
//! disturbed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::registry::{self, ComputeValue};

use super::error::DispatchError;
use super::task::{ExecuteOptions, ProgressCallback, TaskDescriptor, TaskHandle, TaskStatus};
use super::worker::{Job, Worker};

/// Pool sizing and budgets.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Number of parallel workers (pool capacity).
    pub workers: usize,
    /// Budget applied when a submission does not carry its own.
    pub default_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4);
        Self {
            workers,
            default_timeout: Duration::from_secs(30),
        }
    }
}

/// Async facade over the engine, for consumers that want to mock it.
#[async_trait]
pub trait ComputeEngine: Send + Sync {
    /// Submit a task and await its outcome.
    async fn submit(
        &self,
        descriptor: TaskDescriptor,
        opts: ExecuteOptions,
    ) -> Result<ComputeValue, DispatchError>;
}

struct PoolInner {
    semaphore: Arc<Semaphore>,
    workers: Mutex<Vec<Worker>>,
    next_worker_id: AtomicUsize,
    default_timeout: Duration,
}

/// The production dispatcher: fixed worker pool + FIFO admission.
#[derive(Clone)]
pub struct ComputeDispatcher {
    inner: Arc<PoolInner>,
}

impl ComputeDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        let workers = config.workers.max(1);
        let pool: Vec<Worker> = (0..workers).map(Worker::spawn).collect();
        info!(workers, timeout = ?config.default_timeout, "compute dispatcher started");
        Self {
            inner: Arc::new(PoolInner {
                semaphore: Arc::new(Semaphore::new(workers)),
                workers: Mutex::new(pool),
                next_worker_id: AtomicUsize::new(workers),
                default_timeout: config.default_timeout,
            }),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.inner.workers.lock().expect("pool lock").len()
    }

    /// Currently idle pool capacity.
    pub fn available_permits(&self) -> usize {
        self.inner.semaphore.available_permits()
    }

    /// Submit a task. Returns a handle immediately; the work is driven by a
    /// background task. Input errors are surfaced on the handle without ever
    /// occupying a worker.
    pub fn execute(&self, descriptor: TaskDescriptor, opts: ExecuteOptions) -> TaskHandle {
        let id = Uuid::new_v4();
        let submitted_at = chrono::Utc::now();
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(TaskStatus::Pending);
        let (progress_watch_tx, progress_rx) = watch::channel(0.0_f64);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        debug!(task = %id, module = %descriptor.module, function = %descriptor.function, "task submitted");

        if let Err(err) = validate(&descriptor) {
            let _ = status_tx.send(TaskStatus::Failed);
            let _ = outcome_tx.send(Err(err));
            return TaskHandle {
                id,
                submitted_at,
                cancel,
                status_rx,
                progress_rx,
                outcome_rx,
            };
        }

        let timeout = opts.timeout.unwrap_or(self.inner.default_timeout);
        tokio::spawn(drive(
            self.inner.clone(),
            descriptor,
            timeout,
            opts.on_progress,
            cancel.clone(),
            status_tx,
            progress_watch_tx,
            outcome_tx,
        ));

        TaskHandle {
            id,
            submitted_at,
            cancel,
            status_rx,
            progress_rx,
            outcome_rx,
        }
    }

    /// Submit and await in one call.
    pub async fn run(
        &self,
        descriptor: TaskDescriptor,
        opts: ExecuteOptions,
    ) -> Result<ComputeValue, DispatchError> {
        self.execute(descriptor, opts).wait().await
    }

    /// Submit and await, retrying once on a fresh worker after a timeout.
    /// Deterministic failures are returned as-is: retrying them would only
    /// reproduce the identical failure.
    pub async fn run_with_retry(
        &self,
        descriptor: TaskDescriptor,
        opts: ExecuteOptions,
    ) -> Result<ComputeValue, DispatchError> {
        match self.run(descriptor.clone(), opts.clone()).await {
            Err(err) if err.is_retryable() => {
                warn!(module = %descriptor.module, function = %descriptor.function,
                      "task timed out, retrying once on a fresh worker");
                self.run(descriptor, opts).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl ComputeEngine for ComputeDispatcher {
    async fn submit(
        &self,
        descriptor: TaskDescriptor,
        opts: ExecuteOptions,
    ) -> Result<ComputeValue, DispatchError> {
        self.run(descriptor, opts).await
    }
}

/// Cheap descriptor checks done before the task can occupy a worker.
fn validate(descriptor: &TaskDescriptor) -> Result<(), DispatchError> {
    if registry::resolve(&descriptor.module, &descriptor.function).is_none() {
        return Err(DispatchError::Input(format!(
            "unknown compute function `{}::{}`",
            descriptor.module, descriptor.function
        )));
    }
    if descriptor.module != "diagnostics" {
        match descriptor.args.first() {
            Some(value) if value.is_object() => {}
            Some(_) => {
                return Err(DispatchError::Input(
                    "first argument must be a {nodes, edges} graph object".into(),
                ))
            }
            None => return Err(DispatchError::Input("missing graph argument".into())),
        }
    }
    Ok(())
}

/// Drives one task through admission, worker assignment, progress relay and
/// outcome resolution.
#[allow(clippy::too_many_arguments)]
async fn drive(
    inner: Arc<PoolInner>,
    descriptor: TaskDescriptor,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
    cancel: CancellationToken,
    status_tx: watch::Sender<TaskStatus>,
    progress_watch_tx: watch::Sender<f64>,
    outcome_tx: oneshot::Sender<Result<ComputeValue, DispatchError>>,
) {
    // Admission: FIFO queue on the pool semaphore. A cancellation while
    // queued abandons the task without ever touching a worker.
    let permit = tokio::select! {
        _ = cancel.cancelled() => {
            let _ = status_tx.send(TaskStatus::Cancelled);
            let _ = outcome_tx.send(Err(DispatchError::Cancelled));
            return;
        }
        permit = inner.semaphore.clone().acquire_owned() => {
            permit.expect("pool semaphore is never closed")
        }
    };

    let (progress_tx, mut progress_source) = mpsc::unbounded_channel::<f64>();
    let (result_tx, mut result_rx) = oneshot::channel();
    let worker_index = assign_job(
        &inner,
        Job {
            descriptor,
            cancel: cancel.clone(),
            progress_tx,
            result_tx,
        },
    );
    let _ = status_tx.send(TaskStatus::Running);

    // Relay worker progress to the handle's watch and the caller callback.
    let pump = tokio::spawn(async move {
        while let Some(fraction) = progress_source.recv().await {
            let _ = progress_watch_tx.send(fraction);
            if let Some(callback) = &on_progress {
                callback(fraction);
            }
        }
    });

    let outcome = tokio::select! {
        _ = cancel.cancelled() => {
            pump.abort();
            // The function cannot be preempted; park the permit until it
            // returns so the slot is not double-booked.
            let reaper_inner = inner.clone();
            tokio::spawn(async move {
                let _ = result_rx.await;
                release_worker(&reaper_inner, worker_index);
                drop(permit);
            });
            Err(DispatchError::Cancelled)
        }
        result = tokio::time::timeout(timeout, &mut result_rx) => match result {
            Ok(Ok(task_result)) => {
                // Worker dropped its progress sender before resolving, so
                // the pump drains and exits on its own.
                let _ = pump.await;
                release_worker(&inner, worker_index);
                drop(permit);
                task_result
            }
            Ok(Err(_)) => {
                pump.abort();
                replace_worker(&inner, worker_index, "result channel closed");
                drop(permit);
                Err(DispatchError::WorkerFailure(
                    "worker disappeared before resolving the task".into(),
                ))
            }
            Err(_) => {
                pump.abort();
                replace_worker(&inner, worker_index, "task timeout");
                drop(permit);
                Err(DispatchError::Timeout(timeout))
            }
        }
    };

    let status = match &outcome {
        Ok(_) => TaskStatus::Completed,
        Err(DispatchError::Cancelled) => TaskStatus::Cancelled,
        Err(DispatchError::Timeout(_)) => TaskStatus::TimedOut,
        Err(_) => TaskStatus::Failed,
    };
    let _ = status_tx.send(status);
    let _ = outcome_tx.send(outcome);
}

/// Claim an idle worker (one exists: permits == workers) and hand it the
/// job. A dead worker thread is replaced on the spot.
fn assign_job(inner: &Arc<PoolInner>, job: Job) -> usize {
    let mut workers = inner.workers.lock().expect("pool lock");
    let index = workers
        .iter()
        .position(|w| !w.busy)
        .expect("an admission permit guarantees an idle worker");
    workers[index].busy = true;
    if let Err(job) = workers[index].submit(job) {
        // Thread is gone (corrupted slot): recreate it lazily and re-route
        // the job to the fresh thread, whose channel cannot be closed yet.
        let id = inner.next_worker_id.fetch_add(1, Ordering::Relaxed);
        warn!(worker = workers[index].id, replacement = id, "worker thread was dead at assignment");
        workers[index] = Worker::spawn(id);
        workers[index].busy = true;
        let _ = workers[index].submit(job);
    }
    index
}

fn release_worker(inner: &Arc<PoolInner>, index: usize) {
    let mut workers = inner.workers.lock().expect("pool lock");
    workers[index].busy = false;
}

/// Tear down an unresponsive worker and put a fresh thread in its slot. The
/// detached thread's channels are closed, so anything it still sends is
/// discarded.
fn replace_worker(inner: &Arc<PoolInner>, index: usize, reason: &str) {
    let mut workers = inner.workers.lock().expect("pool lock");
    let id = inner.next_worker_id.fetch_add(1, Ordering::Relaxed);
    warn!(worker = workers[index].id, replacement = id, reason, "worker torn down");
    workers[index] = Worker::spawn(id);
}

// ============================================================================
// Tests
// ============================================================================
