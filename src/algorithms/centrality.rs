//! Betweenness and eigenvector centrality.
//!
//! Both are implemented from scratch: the dispatch layer needs progress
//! reports from inside the iteration, which rules out delegating to closed
//! library implementations.

use std::collections::{HashMap, VecDeque};

use crate::graph::{Graph, NodeId};

use super::primitives::{l1_delta, normalize_l2, IndexedGraph};
use super::progress::ProgressReporter;
use super::StatOptions;

/// Default eigenvector convergence tolerance (L1 delta between passes).
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Default eigenvector iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

// ============================================================================
// Betweenness (Brandes)
// ============================================================================

/// Betweenness centrality via Brandes' algorithm.
///
/// One BFS per source builds distances, shortest-path counts and predecessor
/// lists; a single reverse-order pass accumulates per-node dependency. Path
/// endpoints receive no credit. For n > 2 the unordered pair counts are
/// normalized by `2 / ((n-1)(n-2))`; smaller graphs score all zero.
pub fn betweenness_centrality(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    _opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, f64> {
    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    let mut centrality = vec![0.0; n];

    if n > 2 {
        for s in 0..n {
            accumulate_from_source(&ig, s, &mut centrality);
            progress.report_ratio(s + 1, n);
        }
        // The accumulation counts ordered (s, t) pairs; halve to unordered,
        // then apply the pair-count normalization.
        let scale = 2.0 / ((n - 1) as f64 * (n - 2) as f64);
        for c in centrality.iter_mut() {
            *c = (*c / 2.0) * scale;
        }
    }

    ig.to_result_map(&centrality, selection)
}

/// One Brandes source iteration: BFS forward pass, then dependency
/// accumulation in reverse finish order.
fn accumulate_from_source(ig: &IndexedGraph, s: usize, centrality: &mut [f64]) {
    let n = ig.len();
    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<i64> = vec![-1; n];
    sigma[s] = 1.0;
    dist[s] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(s);
    while let Some(v) = queue.pop_front() {
        stack.push(v);
        for &(w, _) in &ig.adj[v] {
            if dist[w] < 0 {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
            if dist[w] == dist[v] + 1 {
                sigma[w] += sigma[v];
                preds[w].push(v);
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    while let Some(w) = stack.pop() {
        for &v in &preds[w] {
            delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
        }
        if w != s {
            centrality[w] += delta[w];
        }
    }
}

// ============================================================================
// Eigenvector centrality (power iteration)
// ============================================================================

/// Eigenvector centrality over the weighted adjacency operator.
///
/// Scores start uniform at `1/n`; each pass sums the weighted neighbor
/// contributions and L2-normalizes the result. Iteration stops when the L1
/// delta between passes drops below the tolerance or the iteration cap is
/// reached (defaults 1e-6 / 100). The returned vector is non-negative with
/// `Σ xᵢ² ≈ 1` whenever the graph has edges.
pub fn eigenvector_centrality(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, f64> {
    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    if n == 0 {
        return HashMap::new();
    }

    let tolerance = opts.tolerance.unwrap_or(DEFAULT_TOLERANCE);
    let max_iterations = opts.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);

    let mut scores = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];

    for pass in 0..max_iterations {
        for x in next.iter_mut() {
            *x = 0.0;
        }
        for v in 0..n {
            for &(w, weight) in &ig.adj[v] {
                next[w] += scores[v] * weight;
            }
        }
        normalize_l2(&mut next);

        let delta = l1_delta(&scores, &next);
        std::mem::swap(&mut scores, &mut next);
        progress.report_ratio(pass + 1, max_iterations);
        if delta < tolerance {
            break;
        }
    }

    // Power iteration preserves the non-negative cone; normalize once more
    // so early exits still satisfy the unit-length contract.
    normalize_l2(&mut scores);
    ig.to_result_map(&scores, selection)
}

// ============================================================================
// Tests
// ============================================================================
