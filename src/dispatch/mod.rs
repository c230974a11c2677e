//! Asynchronous dispatch layer.
//!
//! Runs compute functions in isolated parallel workers with progress
//! reporting, per-task timeouts and cancellation:
//!
//! ```text
//! caller ──execute()──► ComputeDispatcher ──Job──► worker thread
//!    ▲                        │                        │
//!    │   TaskHandle           │  semaphore admission   │  registry::resolve
//!    │   (status, progress,   │  (FIFO, capacity =     │  Graph::from_wire
//!    │    cancel, outcome)    │   pool size)           │  algorithm.invoke
//!    └────────────────────────┴────────────────────────┘
//! ```
//!
//! - [`task`] — [`TaskDescriptor`], [`TaskHandle`], [`ExecuteOptions`]
//! - `worker` — dedicated worker threads, panic isolation
//! - [`pool`] — [`ComputeDispatcher`], admission, timeout, replacement
//! - [`error`] — [`DispatchError`] taxonomy

pub mod error;
pub mod pool;
pub mod task;
pub(crate) mod worker;

pub use error::DispatchError;
pub use pool::{ComputeDispatcher, ComputeEngine, DispatchConfig};
pub use task::{ExecuteOptions, ProgressCallback, TaskDescriptor, TaskHandle, TaskStatus};
