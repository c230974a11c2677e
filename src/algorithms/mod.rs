//! Pure compute algorithms.
//!
//! Every function here is pure over a reconstructed [`crate::graph::Graph`]
//! (plus an optional node subset), never mutates its input, reports progress
//! at bounded intervals, and terminates or errors — timeouts are enforced
//! outside, by the dispatch layer.
//!
//! ## Modules
//!
//! - [`progress`] — monotone bounded-granularity [`ProgressReporter`]
//! - `primitives` — indexed graph view, BFS, triangles, vector helpers
//! - [`statistics`] — degree, closeness, ego-density, clustering
//! - [`centrality`] — betweenness (Brandes), eigenvector (power iteration)
//! - [`cliques`] — Bron–Kerbosch maximal-clique enumeration
//! - [`spectral`] — approximate Laplacian spectral coordinates
//! - [`graph_metrics`] — density, diameter, path lengths, components
//! - [`community`] — Louvain modularity optimization

pub mod centrality;
pub mod cliques;
pub mod community;
pub mod graph_metrics;
pub(crate) mod primitives;
pub mod progress;
pub mod spectral;
pub mod statistics;

use serde::{Deserialize, Serialize};

pub use progress::ProgressReporter;

/// Failures a compute function can raise on its own (everything else —
/// timeouts, panics, cancellation — is the dispatch layer's business).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputeError {
    /// Malformed input: missing or mis-shaped arguments, unknown names.
    #[error("invalid input: {0}")]
    Input(String),
    /// An upstream computation this algorithm depends on is missing.
    #[error("precondition not met: {0}")]
    Precondition(String),
}

/// Common options for the statistic algorithms. Unset fields fall back to
/// per-algorithm defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatOptions {
    /// Scale closeness by `reachable / (n - 1)`.
    pub normalized: bool,
    /// Convergence tolerance for the iterative algorithms.
    pub tolerance: Option<f64>,
    /// Iteration cap for the iterative algorithms.
    pub max_iterations: Option<usize>,
    /// PRNG seed for the randomized fallbacks.
    pub seed: Option<u64>,
}
