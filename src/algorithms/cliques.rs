//! Maximal-clique enumeration (Bron–Kerbosch) and per-node clique counts.
//!
//! The recursion passes explicit candidate/excluded snapshots instead of
//! mutating shared sets, so no set is ever modified while it is being
//! iterated. Worst case is exponential; callers are expected to bound graph
//! size before requesting clique statistics.

use std::collections::HashMap;

use crate::graph::{Graph, NodeId};

use super::primitives::IndexedGraph;
use super::progress::ProgressReporter;
use super::StatOptions;

/// Per-node count of maximal cliques containing the node.
pub fn clique_membership(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    _opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, f64> {
    let ig = IndexedGraph::new(graph);
    let cliques = enumerate_cliques(&ig, progress);
    let mut counts = vec![0.0; ig.len()];
    for clique in &cliques {
        for &v in clique {
            counts[v] += 1.0;
        }
    }
    ig.to_result_map(&counts, selection)
}

/// All maximal cliques, each as a sorted list of node ids.
pub fn maximal_cliques(graph: &Graph) -> Vec<Vec<NodeId>> {
    let ig = IndexedGraph::new(graph);
    let mut progress = ProgressReporter::disabled();
    let cliques = enumerate_cliques(&ig, &mut progress);
    cliques
        .into_iter()
        .map(|clique| {
            let mut ids: Vec<NodeId> = clique.into_iter().map(|v| ig.ids[v].clone()).collect();
            ids.sort();
            ids
        })
        .collect()
}

fn enumerate_cliques(ig: &IndexedGraph, progress: &mut ProgressReporter) -> Vec<Vec<usize>> {
    let n = ig.len();
    let mut found = Vec::new();
    if n == 0 {
        return found;
    }
    // Top-level candidates double as the progress denominator.
    let all: Vec<usize> = (0..n).collect();
    bron_kerbosch(
        ig,
        Vec::new(),
        all,
        Vec::new(),
        &mut found,
        &mut |done_at_top| progress.report_ratio(done_at_top, n),
        0,
    );
    found
}

/// Bron–Kerbosch with pivoting.
///
/// `r` is the growing clique, `p` the candidates, `x` the excluded set; all
/// three are per-call snapshots (sorted index vectors). The pivot is taken
/// from `p ∪ x` and only candidates outside its neighborhood are branched
/// on.
#[allow(clippy::too_many_arguments)]
fn bron_kerbosch(
    ig: &IndexedGraph,
    r: Vec<usize>,
    p: Vec<usize>,
    x: Vec<usize>,
    found: &mut Vec<Vec<usize>>,
    on_top_level: &mut impl FnMut(usize),
    depth: usize,
) {
    if p.is_empty() && x.is_empty() {
        found.push(r);
        return;
    }

    let pivot = *p.iter().chain(x.iter()).next().expect("p ∪ x is non-empty");
    let branch: Vec<usize> = p
        .iter()
        .copied()
        .filter(|&v| !ig.are_adjacent(pivot, v))
        .collect();

    let mut p_rest = p;
    let mut x_rest = x;
    for (i, v) in branch.iter().copied().enumerate() {
        let mut r_next = r.clone();
        r_next.push(v);
        let p_next: Vec<usize> = p_rest
            .iter()
            .copied()
            .filter(|&w| ig.are_adjacent(v, w))
            .collect();
        let x_next: Vec<usize> = x_rest
            .iter()
            .copied()
            .filter(|&w| ig.are_adjacent(v, w))
            .collect();
        bron_kerbosch(ig, r_next, p_next, x_next, found, on_top_level, depth + 1);

        p_rest.retain(|&w| w != v);
        x_rest.push(v);
        if depth == 0 {
            on_top_level(i + 1);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
