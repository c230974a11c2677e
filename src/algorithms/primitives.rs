//! Shared compute primitives.
//!
//! Algorithms do not walk the `HashMap`-backed [`Graph`] directly: they
//! first build an [`IndexedGraph`] — node ids sorted ascending and mapped to
//! dense indices, adjacency as `Vec<Vec<(usize, f64)>>`. This gives cheap
//! index arithmetic in the hot loops and, because the id order is total,
//! fully deterministic iteration.

use std::collections::{HashMap, VecDeque};

use crate::graph::{Graph, NodeId};

/// Dense, deterministic view of a [`Graph`].
pub(crate) struct IndexedGraph {
    /// Node ids in ascending order; position = dense index.
    pub ids: Vec<NodeId>,
    /// Reverse map id → dense index.
    pub index: HashMap<NodeId, usize>,
    /// Adjacency lists `(neighbor index, weight)`, sorted by neighbor index.
    pub adj: Vec<Vec<(usize, f64)>>,
}

impl IndexedGraph {
    pub fn new(graph: &Graph) -> Self {
        let ids = graph.sorted_nodes();
        let index: HashMap<NodeId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); ids.len()];
        for (i, id) in ids.iter().enumerate() {
            let mut row: Vec<(usize, f64)> = graph
                .neighbors(id)
                .map(|(n, w)| (index[n], w))
                .collect();
            row.sort_by_key(|(j, _)| *j);
            adj[i] = row;
        }
        Self { ids, index, adj }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn degree(&self, i: usize) -> usize {
        self.adj[i].len()
    }

    /// Adjacency test via binary search on the sorted neighbor row.
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.adj[a].binary_search_by_key(&b, |(j, _)| *j).is_ok()
    }

    /// Unweighted BFS distances from `source`; `None` for unreachable nodes.
    pub fn bfs_distances(&self, source: usize) -> Vec<Option<u32>> {
        let mut dist: Vec<Option<u32>> = vec![None; self.len()];
        dist[source] = Some(0);
        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            let d = dist[v].expect("dequeued nodes have distances");
            for &(w, _) in &self.adj[v] {
                if dist[w].is_none() {
                    dist[w] = Some(d + 1);
                    queue.push_back(w);
                }
            }
        }
        dist
    }

    /// Number of edges among the neighbors of `i` (triangles through `i`).
    pub fn triangles(&self, i: usize) -> usize {
        let neighbors = &self.adj[i];
        let mut count = 0;
        for (a, &(u, _)) in neighbors.iter().enumerate() {
            for &(v, _) in &neighbors[a + 1..] {
                if u != i && v != i && self.are_adjacent(u, v) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Rehydrate a dense score vector into an id-keyed result map,
    /// restricted to `selection` when one is given.
    pub fn to_result_map(
        &self,
        scores: &[f64],
        selection: Option<&[NodeId]>,
    ) -> HashMap<NodeId, f64> {
        match selection {
            None => self
                .ids
                .iter()
                .cloned()
                .zip(scores.iter().copied())
                .collect(),
            Some(ids) => ids
                .iter()
                .map(|id| {
                    let score = self.index.get(id).map(|&i| scores[i]).unwrap_or(0.0);
                    (id.clone(), score)
                })
                .collect(),
        }
    }

    /// Dense indices to compute for: the whole graph, or the known subset.
    pub fn selected_indices(&self, selection: Option<&[NodeId]>) -> Vec<usize> {
        match selection {
            None => (0..self.len()).collect(),
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.index.get(id).copied())
                .collect(),
        }
    }
}

// ============================================================================
// Vector helpers
// ============================================================================

pub(crate) fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub(crate) fn l1_delta(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Normalize to unit L2 length; a zero vector is left untouched.
pub(crate) fn normalize_l2(v: &mut [f64]) {
    let norm = l2_norm(v);
    if norm > f64::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
