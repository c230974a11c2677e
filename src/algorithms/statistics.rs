//! Per-node statistics: degree, closeness, ego-network density, clustering.
//!
//! All functions are pure over `&Graph` plus an optional node subset, never
//! mutate their input, and report bounded-granularity progress. Degenerate
//! nodes (isolated, degree < 2) score 0.0 — never NaN or infinity.

use std::collections::HashMap;

use crate::graph::{Graph, NodeId};

use super::primitives::IndexedGraph;
use super::progress::ProgressReporter;
use super::StatOptions;

/// Degree centrality: raw neighbor count per node.
pub fn degree_centrality(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    _opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, f64> {
    let ig = IndexedGraph::new(graph);
    let targets = ig.selected_indices(selection);
    let total = targets.len();
    let mut scores = vec![0.0; ig.len()];
    for (done, &i) in targets.iter().enumerate() {
        scores[i] = ig.degree(i) as f64;
        progress.report_ratio(done + 1, total);
    }
    ig.to_result_map(&scores, selection)
}

/// Closeness centrality.
///
/// `closeness(v) = reachable / Σ distances`, where `reachable` counts the
/// other nodes v can reach. With `normalized`, the value is additionally
/// scaled by `reachable / (n - 1)`. Isolated and disconnected nodes score
/// 0.0.
pub fn closeness_centrality(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, f64> {
    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    let targets = ig.selected_indices(selection);
    let total = targets.len();
    let mut scores = vec![0.0; n];

    for (done, &v) in targets.iter().enumerate() {
        let dist = ig.bfs_distances(v);
        let mut reachable = 0usize;
        let mut sum = 0u64;
        for (w, d) in dist.iter().enumerate() {
            if w == v {
                continue;
            }
            if let Some(d) = d {
                reachable += 1;
                sum += u64::from(*d);
            }
        }
        if sum > 0 {
            let mut score = reachable as f64 / sum as f64;
            if opts.normalized && n > 1 {
                score *= reachable as f64 / (n - 1) as f64;
            }
            scores[v] = score;
        }
        progress.report_ratio(done + 1, total);
    }
    ig.to_result_map(&scores, selection)
}

/// Ego-network density.
///
/// For the neighbor set N of v: `edges_within(N) / C(|N|, 2)`; 0.0 when
/// |N| < 2.
pub fn ego_density(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    _opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, f64> {
    let ig = IndexedGraph::new(graph);
    let targets = ig.selected_indices(selection);
    let total = targets.len();
    let mut scores = vec![0.0; ig.len()];
    for (done, &v) in targets.iter().enumerate() {
        let k = ig.degree(v);
        if k >= 2 {
            let within = ig.triangles(v) as f64;
            let possible = (k * (k - 1) / 2) as f64;
            scores[v] = within / possible;
        }
        progress.report_ratio(done + 1, total);
    }
    ig.to_result_map(&scores, selection)
}

/// Local clustering coefficient: `2·triangles(v) / (deg(v)·(deg(v)−1))`;
/// 0.0 when the degree is below 2.
pub fn clustering_coefficient(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    _opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, f64> {
    let ig = IndexedGraph::new(graph);
    let targets = ig.selected_indices(selection);
    let total = targets.len();
    let mut scores = vec![0.0; ig.len()];
    for (done, &v) in targets.iter().enumerate() {
        let k = ig.degree(v);
        if k >= 2 {
            let triangles = ig.triangles(v) as f64;
            scores[v] = 2.0 * triangles / (k as f64 * (k as f64 - 1.0));
        }
        progress.report_ratio(done + 1, total);
    }
    ig.to_result_map(&scores, selection)
}

// ============================================================================
// Tests
// ============================================================================
