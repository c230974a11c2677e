//! Core graph data model.
//!
//! Defines the adjacency-map graph used by every algorithm in the crate:
//!
//! - [`NodeId`] — opaque string-or-number node identifier with a total order
//! - [`Connection`] — an undirected weighted edge record
//! - [`Graph`] — node set + connection list + symmetric adjacency map
//! - [`GraphError`] — strict-mutation failures (missing node/edge)
//!
//! The adjacency map (`node → (neighbor → weight)`) gives O(1) neighbor and
//! weight lookup; the connection list gives O(E) edge enumeration. Edges are
//! undirected: every `add_edge` installs both adjacency directions.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

// ============================================================================
// NodeId
// ============================================================================

/// Opaque node identifier: a string or an integer.
///
/// Integers order before strings; within each kind the natural order applies.
/// This total order is the tie-break used everywhere the engine needs a
/// deterministic node sequence (community detection, shell ordering, BFS
/// roots).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Text(String),
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Text(t) => serializer.serialize_str(t),
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(t) => write!(f, "{}", t),
        }
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

// ============================================================================
// Connection
// ============================================================================

/// An undirected weighted edge record.
///
/// Storage keeps the direction the edge was inserted with; consumers must
/// treat `(a, b)` and `(b, a)` as the same edge, which [`Connection::links`]
/// encodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

impl Connection {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }

    /// Undirected equality on endpoints: true for both `(a, b)` and `(b, a)`.
    pub fn links(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failures raised by the strict mutation operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("node `{0}` does not exist")]
    NodeNotFound(NodeId),
    #[error("edge `{0}` - `{1}` does not exist")]
    EdgeNotFound(NodeId, NodeId),
}

// ============================================================================
// Graph
// ============================================================================

/// Undirected weighted graph backed by an adjacency map.
///
/// Invariants:
/// - every connection endpoint has an adjacency entry (auto-created on
///   `add_edge`)
/// - the adjacency map stays symmetric: `adjacency[u][v] == adjacency[v][u]`
/// - the default edge weight is 1.0
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<NodeId, HashMap<NodeId, f64>>,
    connections: Vec<Connection>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Idempotent: adding an existing id is a no-op.
    pub fn add_node(&mut self, id: impl Into<NodeId>) {
        self.adjacency.entry(id.into()).or_default();
    }

    /// Add an undirected edge, auto-creating missing endpoints.
    ///
    /// Appends a [`Connection`] record and installs both adjacency
    /// directions. Re-adding an existing edge appends another Connection
    /// record while overwriting the adjacency weight; use
    /// [`Graph::update_edge_weight`] to change a weight in place without
    /// duplicating the record.
    pub fn add_edge(&mut self, u: impl Into<NodeId>, v: impl Into<NodeId>, weight: f64) {
        let u = u.into();
        let v = v.into();
        self.adjacency.entry(u.clone()).or_default();
        self.adjacency.entry(v.clone()).or_default();
        self.connections.push(Connection::new(u.clone(), v.clone(), weight));
        self.adjacency
            .get_mut(&u)
            .expect("endpoint just inserted")
            .insert(v.clone(), weight);
        self.adjacency
            .get_mut(&v)
            .expect("endpoint just inserted")
            .insert(u, weight);
    }

    /// Change the weight of an existing edge in place.
    ///
    /// Updates both adjacency directions and every matching Connection
    /// record; never appends a duplicate.
    pub fn update_edge_weight(
        &mut self,
        u: &NodeId,
        v: &NodeId,
        weight: f64,
    ) -> Result<(), GraphError> {
        if !self.has_edge(u, v) {
            return Err(GraphError::EdgeNotFound(u.clone(), v.clone()));
        }
        self.adjacency
            .get_mut(u)
            .expect("edge endpoint present")
            .insert(v.clone(), weight);
        self.adjacency
            .get_mut(v)
            .expect("edge endpoint present")
            .insert(u.clone(), weight);
        for conn in self.connections.iter_mut().filter(|c| c.links(u, v)) {
            conn.weight = weight;
        }
        Ok(())
    }

    /// Remove a node, cascading to its incident connections and the
    /// adjacency entries of its neighbors. Strict: unknown ids error.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<(), GraphError> {
        let neighbors = self
            .adjacency
            .remove(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        for neighbor in neighbors.keys() {
            if let Some(adj) = self.adjacency.get_mut(neighbor) {
                adj.remove(id);
            }
        }
        self.connections
            .retain(|c| &c.source != id && &c.target != id);
        Ok(())
    }

    /// Remove an edge (all duplicate Connection records included).
    /// Strict: a missing edge errors.
    pub fn remove_edge(&mut self, u: &NodeId, v: &NodeId) -> Result<(), GraphError> {
        if !self.has_edge(u, v) {
            return Err(GraphError::EdgeNotFound(u.clone(), v.clone()));
        }
        self.adjacency.get_mut(u).expect("edge endpoint present").remove(v);
        if u != v {
            self.adjacency.get_mut(v).expect("edge endpoint present").remove(u);
        }
        self.connections.retain(|c| !c.links(u, v));
        Ok(())
    }

    /// Neighbor count. Lenient: unknown ids report 0 rather than erroring,
    /// unlike the strict removal operations.
    pub fn degree(&self, id: &NodeId) -> usize {
        self.adjacency.get(id).map(HashMap::len).unwrap_or(0)
    }

    /// Iterate `(neighbor, weight)` pairs. Empty for unknown ids.
    pub fn neighbors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = (&'a NodeId, f64)> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(n, w)| (n, *w)))
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn has_edge(&self, u: &NodeId, v: &NodeId) -> bool {
        self.adjacency
            .get(u)
            .map(|m| m.contains_key(v))
            .unwrap_or(false)
    }

    /// Adjacency weight of the edge `u — v`, if present.
    pub fn edge_weight(&self, u: &NodeId, v: &NodeId) -> Option<f64> {
        self.adjacency.get(u).and_then(|m| m.get(v)).copied()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct undirected edges (duplicate Connection records for
    /// the same endpoint pair count once).
    pub fn edge_count(&self) -> usize {
        let directed: usize = self.adjacency.values().map(HashMap::len).sum();
        (directed + self.self_loop_count()) / 2
    }

    fn self_loop_count(&self) -> usize {
        self.adjacency
            .iter()
            .filter(|(id, adj)| adj.contains_key(id))
            .count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    /// Node ids in ascending order. This is the canonical iteration order
    /// for every deterministic computation in the crate.
    pub fn sorted_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.adjacency.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The raw connection list, duplicates included, in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Total weight over distinct edges (self-loops counted once).
    pub fn total_edge_weight(&self) -> f64 {
        let directed: f64 = self
            .adjacency
            .iter()
            .flat_map(|(u, adj)| adj.iter().map(move |(v, w)| if u == v { 2.0 * w } else { *w }))
            .sum();
        directed / 2.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn node(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_node_id_ordering_numbers_before_strings() {
        let mut ids = vec![node("b"), NodeId::Int(10), node("a"), NodeId::Int(2)];
        ids.sort();
        assert_eq!(
            ids,
            vec![NodeId::Int(2), NodeId::Int(10), node("a"), node("b")]
        );
    }

    #[test]
    fn test_node_id_serde() {
        let text: NodeId = serde_json::from_str("\"alpha\"").unwrap();
        let num: NodeId = serde_json::from_str("42").unwrap();
        assert_eq!(text, node("alpha"));
        assert_eq!(num, NodeId::Int(42));
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"alpha\"");
        assert_eq!(serde_json::to_string(&num).unwrap(), "42");
    }

    #[test]
    fn test_add_node_idempotent() {
        let mut g = Graph::new();
        g.add_node("a");
        g.add_node("a");
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_add_edge_auto_creates_nodes() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge(&node("a"), &node("b")));
        assert!(g.has_edge(&node("b"), &node("a")), "adjacency must stay symmetric");
    }

    #[test]
    fn test_readd_edge_appends_connection_and_overwrites_weight() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("a", "b", 3.0);
        assert_eq!(g.connections().len(), 2, "re-adding appends a duplicate record");
        assert_eq!(g.edge_count(), 1, "distinct edge count is unchanged");
        assert_eq!(g.edge_weight(&node("a"), &node("b")), Some(3.0));
    }

    #[test]
    fn test_update_edge_weight_in_place() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.update_edge_weight(&node("a"), &node("b"), 5.0).unwrap();
        assert_eq!(g.connections().len(), 1, "in-place update must not duplicate");
        assert_eq!(g.edge_weight(&node("b"), &node("a")), Some(5.0));
        assert_eq!(g.connections()[0].weight, 5.0);
    }

    #[test]
    fn test_update_edge_weight_missing_edge_errors() {
        let mut g = Graph::new();
        g.add_node("a");
        g.add_node("b");
        let err = g.update_edge_weight(&node("a"), &node("b"), 2.0).unwrap_err();
        assert_eq!(err, GraphError::EdgeNotFound(node("a"), node("b")));
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("a", "c", 1.0);
        g.add_edge("b", "c", 1.0);
        g.remove_node(&node("a")).unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(!g.has_edge(&node("b"), &node("a")));
        assert!(g.connections().iter().all(|c| !c.links(&node("a"), &node("b"))));
    }

    #[test]
    fn test_remove_node_unknown_errors() {
        let mut g = Graph::new();
        let err = g.remove_node(&node("ghost")).unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound(node("ghost")));
    }

    #[test]
    fn test_remove_edge_strict_and_drops_duplicates() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "a", 2.0);
        g.remove_edge(&node("a"), &node("b")).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert!(g.connections().is_empty(), "duplicates go with the edge");
        assert!(g.remove_edge(&node("a"), &node("b")).is_err());
    }

    #[test]
    fn test_degree_lenient_for_unknown_nodes() {
        let g = Graph::new();
        assert_eq!(g.degree(&node("nowhere")), 0);
        assert_eq!(g.neighbors(&node("nowhere")).count(), 0);
    }

    #[test]
    fn test_degree_matches_neighbors_and_handshake_sum() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "c", 1.0);
        g.add_edge("c", "a", 1.0);
        g.add_edge("c", "d", 1.0);
        for id in g.sorted_nodes() {
            assert_eq!(g.degree(&id), g.neighbors(&id).count());
        }
        let degree_sum: usize = g.sorted_nodes().iter().map(|id| g.degree(id)).sum();
        assert_eq!(degree_sum, 2 * g.edge_count(), "Σ degree(v) = 2|E|");
    }

    #[test]
    fn test_connection_links_is_undirected() {
        let c = Connection::new("a", "b", 1.0);
        assert!(c.links(&node("a"), &node("b")));
        assert!(c.links(&node("b"), &node("a")));
        assert!(!c.links(&node("a"), &node("c")));
    }

    #[test]
    fn test_total_edge_weight() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 2.0);
        g.add_edge("b", "c", 3.0);
        assert!((g.total_edge_weight() - 5.0).abs() < f64::EPSILON);
    }
}
