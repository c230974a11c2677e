//! Transport-neutral wire format.
//!
//! [`GraphData`] is the sole boundary format between the engine and its
//! collaborators (adapters, visualization layers, the worker pool). It is a
//! plain `{nodes, edges}` record with no live references, so it can cross
//! the worker isolation boundary as an owned message.
//!
//! Deserialization is deliberately tolerant:
//! - missing edge weight defaults to 1.0
//! - alternate endpoint field names are accepted (`from`/`to`, `u`/`v`)
//! - absent or malformed collections become empty (with a warning) instead
//!   of failing the whole payload
//! - unknown extra fields on nodes/edges are ignored

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::model::{Graph, NodeId};

// ============================================================================
// Wire types
// ============================================================================

/// An edge as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEdge {
    #[serde(alias = "from", alias = "u")]
    pub source: NodeId,
    #[serde(alias = "to", alias = "v")]
    pub target: NodeId,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// The canonical `{nodes, edges}` wire record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub nodes: Vec<NodeId>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub edges: Vec<WireEdge>,
}

/// Deserialize a collection, mapping a non-array value to empty and
/// filtering out malformed elements with a warning.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => {
            let total = items.len();
            let parsed: Vec<T> = items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect();
            if parsed.len() < total {
                warn!(
                    dropped = total - parsed.len(),
                    "dropping malformed wire entries"
                );
            }
            Ok(parsed)
        }
        serde_json::Value::Null => Ok(Vec::new()),
        other => {
            warn!(found = %kind_of(&other), "expected an array in wire payload, using empty");
            Ok(Vec::new())
        }
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl GraphData {
    /// Parse a wire record out of an arbitrary JSON value. A non-object
    /// value yields an empty record rather than an error.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

// ============================================================================
// Graph ⇄ wire conversion
// ============================================================================

impl Graph {
    /// Rebuild a graph from its wire form. Edge endpoints missing from the
    /// node list are auto-created, so reconstruction never dangles.
    pub fn from_wire(data: &GraphData) -> Self {
        let mut graph = Graph::new();
        for id in &data.nodes {
            graph.add_node(id.clone());
        }
        for edge in &data.edges {
            graph.add_edge(edge.source.clone(), edge.target.clone(), edge.weight);
        }
        graph
    }

    /// Serialize into the wire form: sorted node ids, one entry per distinct
    /// undirected edge with its current adjacency weight.
    pub fn to_wire(&self) -> GraphData {
        let nodes = self.sorted_nodes();
        let mut edges = Vec::with_capacity(self.edge_count());
        for u in &nodes {
            for (v, weight) in self.neighbors(u) {
                if u <= v {
                    edges.push(WireEdge {
                        source: u.clone(),
                        target: v.clone(),
                        weight,
                    });
                }
            }
        }
        edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        GraphData { nodes, edges }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_weight_defaults_to_one() {
        let data: GraphData = serde_json::from_str(
            r#"{"nodes": ["a", "b"], "edges": [{"source": "a", "target": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(data.edges[0].weight, 1.0);
    }

    #[test]
    fn test_alternate_endpoint_field_names() {
        let data: GraphData = serde_json::from_str(
            r#"{"nodes": [1, 2, 3],
                "edges": [{"from": 1, "to": 2}, {"u": 2, "v": 3, "weight": 2.5}]}"#,
        )
        .unwrap();
        assert_eq!(data.edges.len(), 2);
        assert_eq!(data.edges[0].source, NodeId::Int(1));
        assert_eq!(data.edges[1].target, NodeId::Int(3));
        assert_eq!(data.edges[1].weight, 2.5);
    }

    #[test]
    fn test_absent_collections_become_empty() {
        let data: GraphData = serde_json::from_str("{}").unwrap();
        assert!(data.nodes.is_empty());
        assert!(data.edges.is_empty());
    }

    #[test]
    fn test_malformed_collections_become_empty() {
        let data: GraphData =
            serde_json::from_str(r#"{"nodes": "oops", "edges": 7}"#).unwrap();
        assert!(data.nodes.is_empty());
        assert!(data.edges.is_empty());
    }

    #[test]
    fn test_malformed_elements_are_filtered() {
        let data: GraphData = serde_json::from_str(
            r#"{"nodes": ["a", {"bad": true}, "b"],
                "edges": [{"source": "a", "target": "b"}, {"weightless": 1}]}"#,
        )
        .unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.edges.len(), 1);
    }

    #[test]
    fn test_unknown_extra_fields_ignored() {
        let data: GraphData = serde_json::from_str(
            r#"{"nodes": ["a", "b"],
                "edges": [{"source": "a", "target": "b", "weight": 2.0, "color": "red"}],
                "metadata": {"origin": "test"}}"#,
        )
        .unwrap();
        assert_eq!(data.edges[0].weight, 2.0);
    }

    #[test]
    fn test_from_value_tolerates_non_object() {
        let data = GraphData::from_value(&serde_json::json!(42));
        assert!(data.nodes.is_empty());
    }

    #[test]
    fn test_reconstruction_auto_creates_edge_endpoints() {
        let data: GraphData = serde_json::from_str(
            r#"{"nodes": ["a"], "edges": [{"source": "a", "target": "phantom"}]}"#,
        )
        .unwrap();
        let graph = Graph::from_wire(&data);
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_node(&NodeId::from("phantom")));
    }

    #[test]
    fn test_round_trip_preserves_nodes_edges_weights() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "c", 2.5);
        graph.add_node("isolated");
        graph.add_node(NodeId::Int(7));

        let rebuilt = Graph::from_wire(&graph.to_wire());
        assert_eq!(rebuilt.node_count(), graph.node_count());
        assert_eq!(rebuilt.edge_count(), graph.edge_count());
        assert_eq!(
            rebuilt.edge_weight(&NodeId::from("b"), &NodeId::from("c")),
            Some(2.5)
        );
        assert!(rebuilt.has_node(&NodeId::from("isolated")));
        assert_eq!(rebuilt.to_wire(), graph.to_wire());
    }
}
