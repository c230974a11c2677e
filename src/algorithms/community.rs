//! Community detection — Louvain modularity optimization.
//!
//! The strategy object runs the classic two-phase loop: greedy local moves
//! until stable, then aggregation of communities into super-nodes (intra
//! weight becomes a self-loop), repeated at coarser levels until aggregation
//! stops improving modularity or the level cap is reached.
//!
//! Determinism: nodes are processed in ascending id order, candidate
//! communities are scanned in ascending community id, and only a strictly
//! positive gain moves a node — so equal-gain ties resolve to the lowest
//! community id. Community ids in the result are renumbered contiguously by
//! first appearance in node id order.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId};

use super::primitives::IndexedGraph;
use super::progress::ProgressReporter;

/// Modularity improvement below this threshold stops the level loop.
const MIN_IMPROVEMENT: f64 = 1e-7;

/// A community assignment plus its quality score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityResult {
    pub communities: HashMap<NodeId, u32>,
    pub modularity: f64,
    pub num_communities: usize,
}

/// Tuning knobs for the Louvain strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainOptions {
    /// Resolution parameter; higher values favor smaller communities.
    pub resolution: f64,
    /// Cap on aggregation levels.
    pub max_levels: usize,
    /// Cap on local-move sweeps per level.
    pub max_sweeps: usize,
}

impl Default for LouvainOptions {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_levels: 10,
            max_sweeps: 100,
        }
    }
}

// ============================================================================
// Level graph — the coarsened view the algorithm iterates on
// ============================================================================

/// Weighted multigraph at one aggregation level. Self-loops carry the
/// intra-community weight accumulated by coarsening.
struct LevelGraph {
    /// Adjacency without self entries, `(neighbor, weight)`.
    adj: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight per node (counted once).
    self_loops: Vec<f64>,
    /// Weighted degree: `Σ w_ij + 2·self_loop`.
    strengths: Vec<f64>,
    /// Total edge weight `m`.
    total_weight: f64,
}

impl LevelGraph {
    fn from_indexed(ig: &IndexedGraph) -> Self {
        let n = ig.len();
        let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut self_loops = vec![0.0; n];
        for (i, row) in ig.adj.iter().enumerate() {
            for &(j, w) in row {
                if i == j {
                    self_loops[i] = w;
                } else {
                    adj[i].push((j, w));
                }
            }
        }
        Self::finish(adj, self_loops)
    }

    fn finish(adj: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let strengths: Vec<f64> = adj
            .iter()
            .zip(&self_loops)
            .map(|(row, s)| row.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * s)
            .collect();
        let total_weight = strengths.iter().sum::<f64>() / 2.0;
        Self {
            adj,
            self_loops,
            strengths,
            total_weight,
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }
}

// ============================================================================
// Louvain strategy
// ============================================================================

/// Louvain community detection strategy.
pub struct Louvain {
    options: LouvainOptions,
}

impl Louvain {
    pub fn new(options: LouvainOptions) -> Self {
        Self { options }
    }

    /// Run the full multi-level optimization.
    pub fn detect(&self, graph: &Graph, progress: &mut ProgressReporter) -> CommunityResult {
        let ig = IndexedGraph::new(graph);
        let n = ig.len();
        if n == 0 {
            progress.finish();
            return CommunityResult {
                communities: HashMap::new(),
                modularity: 0.0,
                num_communities: 0,
            };
        }

        let mut level = LevelGraph::from_indexed(&ig);
        // assignment[i] = community of original node i at the current level.
        let mut assignment: Vec<usize> = (0..n).collect();

        if level.total_weight > 0.0 {
            let mut best_q = level_modularity(
                &level,
                &(0..level.len()).collect::<Vec<_>>(),
                self.options.resolution,
            );
            for level_index in 0..self.options.max_levels {
                let community = self.local_moves(&level);
                let q = level_modularity(&level, &community, self.options.resolution);

                let distinct = renumber(&community);
                let merged = distinct.len() < level.len();
                for a in assignment.iter_mut() {
                    *a = distinct[&community[*a]];
                }
                progress.report_ratio(level_index + 1, self.options.max_levels);

                if !merged || q <= best_q + MIN_IMPROVEMENT {
                    break;
                }
                best_q = q;
                level = aggregate(&level, &community, &distinct);
            }
        }

        // Contiguous ids by first appearance in node id order.
        let final_ids = renumber(&assignment);
        let communities: HashMap<NodeId, u32> = ig
            .ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), final_ids[&assignment[i]] as u32))
            .collect();
        let num_communities = final_ids.len();
        let score = modularity(graph, &communities);
        progress.finish();
        CommunityResult {
            communities,
            modularity: score,
            num_communities,
        }
    }

    /// Phase one: sweep nodes in ascending order, greedily moving each to
    /// the neighboring community with the best strictly positive gain.
    fn local_moves(&self, level: &LevelGraph) -> Vec<usize> {
        let n = level.len();
        let mut community: Vec<usize> = (0..n).collect();
        let mut comm_strength: Vec<f64> = level.strengths.clone();
        let m2 = 2.0 * level.total_weight;
        let resolution = self.options.resolution;

        for _sweep in 0..self.options.max_sweeps {
            let mut moved = false;
            for node in 0..n {
                let current = community[node];
                let ki = level.strengths[node];

                // Weight from `node` to each neighboring community, in
                // ascending community id for deterministic tie-breaks.
                let mut weights_to: BTreeMap<usize, f64> = BTreeMap::new();
                for &(neighbor, w) in &level.adj[node] {
                    *weights_to.entry(community[neighbor]).or_default() += w;
                }

                let w_current = weights_to.get(&current).copied().unwrap_or(0.0);
                let remove_cost = w_current / m2
                    - resolution * ki * (comm_strength[current] - ki) / (m2 * m2);

                let mut best_comm = current;
                let mut best_gain = 0.0;
                for (&target, &w_target) in &weights_to {
                    if target == current {
                        continue;
                    }
                    let insert_cost = w_target / m2
                        - resolution * ki * comm_strength[target] / (m2 * m2);
                    let gain = insert_cost - remove_cost;
                    if gain > best_gain {
                        best_gain = gain;
                        best_comm = target;
                    }
                }

                if best_comm != current {
                    comm_strength[current] -= ki;
                    comm_strength[best_comm] += ki;
                    community[node] = best_comm;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
        community
    }
}

/// Phase two: collapse each community into a super-node. Inter-community
/// weights are summed; intra-community weight (including existing
/// self-loops) becomes the super-node's self-loop.
fn aggregate(
    level: &LevelGraph,
    community: &[usize],
    renumbered: &BTreeMap<usize, usize>,
) -> LevelGraph {
    let size = renumbered.len();
    let mut between: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); size];
    let mut self_loops = vec![0.0; size];

    for (node, row) in level.adj.iter().enumerate() {
        let cu = renumbered[&community[node]];
        self_loops[cu] += level.self_loops[node];
        for &(neighbor, w) in row {
            let cv = renumbered[&community[neighbor]];
            if cu == cv {
                // Each undirected edge appears twice in the adjacency lists.
                self_loops[cu] += w / 2.0;
            } else {
                *between[cu].entry(cv).or_default() += w;
            }
        }
    }

    let adj: Vec<Vec<(usize, f64)>> = between
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect();
    LevelGraph::finish(adj, self_loops)
}

/// Map community labels to contiguous indices ordered by first appearance.
fn renumber(community: &[usize]) -> BTreeMap<usize, usize> {
    let mut map = BTreeMap::new();
    let mut next = 0usize;
    for &c in community {
        map.entry(c).or_insert_with(|| {
            let id = next;
            next += 1;
            id
        });
    }
    map
}

/// Modularity of a community assignment on a level graph (used to decide
/// whether another aggregation round is worthwhile).
fn level_modularity(level: &LevelGraph, community: &[usize], resolution: f64) -> f64 {
    let m = level.total_weight;
    if m == 0.0 {
        return 0.0;
    }
    let distinct = renumber(community);
    let mut sum_in = vec![0.0; distinct.len()];
    let mut sum_tot = vec![0.0; distinct.len()];
    for (node, row) in level.adj.iter().enumerate() {
        let c = distinct[&community[node]];
        sum_tot[c] += level.strengths[node];
        sum_in[c] += level.self_loops[node];
        for &(neighbor, w) in row {
            if distinct[&community[neighbor]] == c {
                sum_in[c] += w / 2.0;
            }
        }
    }
    sum_in
        .iter()
        .zip(&sum_tot)
        .map(|(win, wtot)| win / m - resolution * (wtot / (2.0 * m)).powi(2))
        .sum()
}

/// Newman modularity `Q` of an arbitrary partition of `graph`.
///
/// `Q = Σ_c [ in_c/m − (tot_c/2m)² ]`, the community-aggregated form of
/// `(1/2m)·Σ_{ij same community}(A_ij − k_i k_j / 2m)`. Nodes missing from
/// the partition count as singleton communities.
pub fn modularity(graph: &Graph, partition: &HashMap<NodeId, u32>) -> f64 {
    let m = graph.total_edge_weight();
    if m == 0.0 {
        return 0.0;
    }

    // Stable label per node: the given partition, with fresh singleton
    // labels for unassigned nodes.
    let mut labels: HashMap<&NodeId, u64> = HashMap::new();
    let mut next_free = u64::from(u32::MAX) + 1;
    let nodes = graph.sorted_nodes();
    for id in &nodes {
        match partition.get(id) {
            Some(&c) => {
                labels.insert(id, u64::from(c));
            }
            None => {
                labels.insert(id, next_free);
                next_free += 1;
            }
        }
    }

    let mut sum_in: HashMap<u64, f64> = HashMap::new();
    let mut sum_tot: HashMap<u64, f64> = HashMap::new();
    for id in &nodes {
        let c = labels[id];
        let mut strength = 0.0;
        for (neighbor, w) in graph.neighbors(id) {
            strength += if neighbor == id { 2.0 * w } else { w };
            if labels[neighbor] == c {
                *sum_in.entry(c).or_default() += if neighbor == id { w } else { w / 2.0 };
            }
        }
        *sum_tot.entry(c).or_default() += strength;
    }

    sum_tot
        .iter()
        .map(|(c, tot)| {
            let win = sum_in.get(c).copied().unwrap_or(0.0);
            win / m - (tot / (2.0 * m)).powi(2)
        })
        .sum()
}

/// Registry-facing entry point.
pub fn louvain_communities(
    graph: &Graph,
    options: &LouvainOptions,
    progress: &mut ProgressReporter,
) -> CommunityResult {
    Louvain::new(options.clone()).detect(graph, progress)
}

// ============================================================================
// Tests
// ============================================================================
