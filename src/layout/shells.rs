//! Group-based layouts: concentric shells, bipartite and multipartite
//! columns, BFS-distance layers.
//!
//! Each layout partitions the nodes into ordered groups — an explicit caller
//! partition where given, otherwise the documented automatic fallback — and
//! places every group along a ring or a line with even spacing.

use std::collections::{HashMap, VecDeque};

use crate::algorithms::{ComputeError, ProgressReporter};
use crate::graph::{Graph, NodeId};

use super::{rescale, trivial_layout, LayoutOptions, Point, Positions};

// ============================================================================
// Shell layout
// ============================================================================

/// Concentric rings, one per group.
///
/// Fallback partition: nodes bucketed by distinct degree, ascending. A
/// singleton first group is pinned to the exact center.
pub fn shell_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let groups = match &opts.groups {
        Some(groups) => sanitize_groups(graph, groups),
        None => degree_shells(graph, &ids),
    };

    let mut positions = Positions::with_capacity(ids.len());
    let mut radius = if groups.first().map(Vec::len) == Some(1) {
        0.0
    } else {
        1.0
    };
    let total_groups = groups.len();
    for (gi, group) in groups.into_iter().enumerate() {
        place_ring(&mut positions, &group, radius);
        radius += 1.0;
        progress.report_ratio(gi + 1, total_groups);
    }
    rescale(&mut positions, opts.scale, &opts.center);
    restore_singleton_center(&mut positions, graph, opts);
    progress.finish();
    Ok(positions)
}

/// Nodes of one group evenly spaced on a ring of the given radius.
fn place_ring(positions: &mut Positions, group: &[NodeId], radius: f64) {
    let len = group.len();
    for (i, id) in group.iter().enumerate() {
        let theta = 2.0 * std::f64::consts::PI * i as f64 / len as f64;
        positions.insert(id.clone(), Point::new(radius * theta.cos(), radius * theta.sin()));
    }
}

/// Rescaling shifts by the centroid; re-pin a singleton first shell to the
/// caller's center afterwards so the contract holds exactly.
fn restore_singleton_center(positions: &mut Positions, graph: &Graph, opts: &LayoutOptions) {
    let first = match &opts.groups {
        Some(groups) => sanitize_groups(graph, groups).into_iter().next(),
        None => degree_shells(graph, &graph.sorted_nodes()).into_iter().next(),
    };
    if let Some(group) = first {
        if let [only] = group.as_slice() {
            if let Some(p) = positions.get_mut(only) {
                *p = opts.center;
            }
        }
    }
}

/// Bucket nodes by distinct degree value, ascending.
fn degree_shells(graph: &Graph, ids: &[NodeId]) -> Vec<Vec<NodeId>> {
    let mut by_degree: std::collections::BTreeMap<usize, Vec<NodeId>> =
        std::collections::BTreeMap::new();
    for id in ids {
        by_degree.entry(graph.degree(id)).or_default().push(id.clone());
    }
    by_degree.into_values().collect()
}

/// Keep only known nodes, then append any node the caller left out as a
/// final group.
fn sanitize_groups(graph: &Graph, groups: &[Vec<NodeId>]) -> Vec<Vec<NodeId>> {
    let mut seen: std::collections::HashSet<&NodeId> = std::collections::HashSet::new();
    let mut out: Vec<Vec<NodeId>> = Vec::with_capacity(groups.len());
    for group in groups {
        let kept: Vec<NodeId> = group
            .iter()
            .filter(|id| graph.has_node(id) && seen.insert(*id))
            .cloned()
            .collect();
        if !kept.is_empty() {
            out.push(kept);
        }
    }
    let missing: Vec<NodeId> = graph
        .sorted_nodes()
        .into_iter()
        .filter(|id| !seen.contains(id))
        .collect();
    if !missing.is_empty() {
        out.push(missing);
    }
    out
}

// ============================================================================
// Bipartite layout
// ============================================================================

/// Two vertical columns.
///
/// The first explicit group is one side and everything else the other;
/// without groups, sides come from alternating BFS parity per component.
pub fn bipartite_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let (left, right) = match &opts.groups {
        Some(groups) if !groups.is_empty() => {
            let sanitized = sanitize_groups(graph, groups);
            let mut iter = sanitized.into_iter();
            let left = iter.next().unwrap_or_default();
            let right: Vec<NodeId> = iter.flatten().collect();
            (left, right)
        }
        _ => alternating_bipartition(graph, &ids),
    };

    let mut positions = Positions::with_capacity(ids.len());
    place_column(&mut positions, &left, -1.0);
    place_column(&mut positions, &right, 1.0);
    progress.report(0.9);
    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

/// BFS 2-coloring: even distance → left, odd → right. Deterministic because
/// each component is rooted at its lowest id.
fn alternating_bipartition(graph: &Graph, ids: &[NodeId]) -> (Vec<NodeId>, Vec<NodeId>) {
    let mut parity: HashMap<&NodeId, bool> = HashMap::new();
    for root in ids {
        if parity.contains_key(root) {
            continue;
        }
        parity.insert(root, false);
        let mut queue = VecDeque::new();
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            let side = parity[v];
            for (w, _) in graph.neighbors(v) {
                if !parity.contains_key(w) {
                    parity.insert(w, !side);
                    queue.push_back(w);
                }
            }
        }
    }
    let mut left = Vec::new();
    let mut right = Vec::new();
    for id in ids {
        if parity[id] {
            right.push(id.clone());
        } else {
            left.push(id.clone());
        }
    }
    (left, right)
}

fn place_column(positions: &mut Positions, column: &[NodeId], x: f64) {
    let len = column.len();
    for (i, id) in column.iter().enumerate() {
        let y = if len <= 1 {
            0.0
        } else {
            2.0 * i as f64 / (len - 1) as f64 - 1.0
        };
        positions.insert(id.clone(), Point::new(x, y));
    }
}

// ============================================================================
// Multipartite layout
// ============================================================================

/// One vertical column per explicit layer, layers along the x axis.
/// There is no automatic partition for this layout: missing groups are an
/// input error.
pub fn multipartite_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let groups = opts
        .groups
        .as_ref()
        .filter(|g| !g.is_empty())
        .ok_or_else(|| {
            ComputeError::Input("multipartite layout requires an explicit `groups` partition".into())
        })?;
    let layers = sanitize_groups(graph, groups);

    let mut positions = Positions::with_capacity(ids.len());
    let total = layers.len();
    for (x, layer) in layers.iter().enumerate() {
        place_column(&mut positions, layer, x as f64);
        progress.report_ratio(x + 1, total);
    }
    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

// ============================================================================
// BFS-layer layout
// ============================================================================

/// Columns by BFS distance from a root (the lowest node id when the caller
/// does not pick one). Unreachable nodes form one final layer.
pub fn bfs_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let root = match &opts.root {
        Some(root) if graph.has_node(root) => root.clone(),
        Some(root) => {
            return Err(ComputeError::Input(format!(
                "bfs layout root `{root}` is not a node of the graph"
            )))
        }
        None => ids[0].clone(),
    };

    let mut distance: HashMap<&NodeId, usize> = HashMap::new();
    let root_ref = ids.iter().find(|id| **id == root).expect("root verified above");
    distance.insert(root_ref, 0);
    let mut queue = VecDeque::new();
    queue.push_back(root_ref);
    while let Some(v) = queue.pop_front() {
        let d = distance[v];
        for (w, _) in graph.neighbors(v) {
            if !distance.contains_key(w) {
                distance.insert(w, d + 1);
                queue.push_back(w);
            }
        }
    }

    let mut layers: std::collections::BTreeMap<usize, Vec<NodeId>> =
        std::collections::BTreeMap::new();
    let mut unreachable: Vec<NodeId> = Vec::new();
    for id in &ids {
        match distance.get(id) {
            Some(&d) => layers.entry(d).or_default().push(id.clone()),
            None => unreachable.push(id.clone()),
        }
    }
    let mut ordered: Vec<Vec<NodeId>> = layers.into_values().collect();
    if !unreachable.is_empty() {
        ordered.push(unreachable);
    }

    let mut positions = Positions::with_capacity(ids.len());
    let total = ordered.len();
    for (x, layer) in ordered.iter().enumerate() {
        place_column(&mut positions, layer, x as f64);
        progress.report_ratio(x + 1, total);
    }
    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

// ============================================================================
// Tests
// ============================================================================
