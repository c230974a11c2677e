//! Graph-level statistics.
//!
//! Density, diameter, average clustering, average shortest path, connected
//! components and the aggregate summary record. Path-based metrics count
//! only reachable pairs — unreachable pairs are excluded, never treated as
//! infinite, so disconnected graphs report per-component values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId};

use super::primitives::IndexedGraph;
use super::progress::ProgressReporter;
use super::statistics::clustering_coefficient;
use super::StatOptions;

/// Connected-components result: component count plus per-node component id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentsResult {
    pub count: usize,
    pub components: HashMap<NodeId, u32>,
}

/// One-pass aggregate of the cheap whole-graph measures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub average_degree: f64,
    pub component_count: usize,
}

/// Graph density: `2E / (n(n-1))`; 0.0 below two nodes.
pub fn density(graph: &Graph) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }
    2.0 * graph.edge_count() as f64 / (n as f64 * (n as f64 - 1.0))
}

/// Mean degree: `2E / n`; 0.0 for the empty graph.
pub fn average_degree(graph: &Graph) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        return 0.0;
    }
    2.0 * graph.edge_count() as f64 / n as f64
}

/// Diameter: maximum BFS eccentricity over all sources, counting only
/// reachable pairs. An edgeless graph reports 0.
pub fn diameter(graph: &Graph, progress: &mut ProgressReporter) -> f64 {
    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    let mut max_distance = 0u32;
    for source in 0..n {
        for d in ig.bfs_distances(source).into_iter().flatten() {
            max_distance = max_distance.max(d);
        }
        progress.report_ratio(source + 1, n);
    }
    f64::from(max_distance)
}

/// Mean of the per-node clustering coefficients; 0.0 for the empty graph.
pub fn average_clustering(graph: &Graph, progress: &mut ProgressReporter) -> f64 {
    let scores = clustering_coefficient(graph, None, &StatOptions::default(), progress);
    if scores.is_empty() {
        return 0.0;
    }
    scores.values().sum::<f64>() / scores.len() as f64
}

/// Mean shortest-path length over ordered reachable pairs, self-pairs
/// excluded; 0.0 when no such pair exists.
pub fn average_shortest_path(graph: &Graph, progress: &mut ProgressReporter) -> f64 {
    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    let mut pair_count = 0u64;
    let mut distance_sum = 0u64;
    for source in 0..n {
        for (target, d) in ig.bfs_distances(source).into_iter().enumerate() {
            if target == source {
                continue;
            }
            if let Some(d) = d {
                pair_count += 1;
                distance_sum += u64::from(d);
            }
        }
        progress.report_ratio(source + 1, n);
    }
    if pair_count == 0 {
        return 0.0;
    }
    distance_sum as f64 / pair_count as f64
}

/// Connected components via BFS: count plus a per-node component id.
/// Component ids are assigned in ascending order of their lowest node id.
pub fn connected_components(graph: &Graph, progress: &mut ProgressReporter) -> ComponentsResult {
    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    let mut component_of: Vec<Option<u32>> = vec![None; n];
    let mut next_id = 0u32;

    for start in 0..n {
        if component_of[start].is_some() {
            continue;
        }
        let mut queue = std::collections::VecDeque::new();
        component_of[start] = Some(next_id);
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            for &(w, _) in &ig.adj[v] {
                if component_of[w].is_none() {
                    component_of[w] = Some(next_id);
                    queue.push_back(w);
                }
            }
        }
        next_id += 1;
        progress.report_ratio(start + 1, n);
    }

    let components = ig
        .ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), component_of[i].unwrap_or(0)))
        .collect();
    ComponentsResult {
        count: next_id as usize,
        components,
    }
}

/// Assemble the aggregate summary in one pass.
pub fn graph_summary(graph: &Graph, progress: &mut ProgressReporter) -> GraphSummary {
    let components = connected_components(graph, progress);
    GraphSummary {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        density: density(graph),
        average_degree: average_degree(graph),
        component_count: components.count,
    }
}

// ============================================================================
// Tests
// ============================================================================
