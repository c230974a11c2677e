//! Algorithm registry.
//!
//! Dispatch is by `(module, function)` name: the factory resolves the pair
//! into a tagged [`Algorithm`] variant and [`Algorithm::invoke`] gives every
//! call site a uniform signature over JSON arguments. The registry also
//! exposes a static metadata [`catalog`] (id, name, description, complexity
//! class, result scope, minimum size, upstream requirements) as a stable
//! enumeration contract for UI discovery.
//!
//! Argument conventions (preserved because dispatch is by name):
//! - statistics: `args = [graph, nodeIds | null, options?]`
//! - layouts and community: `args = [graph, options?]`
//! - diagnostics: function-specific

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::algorithms::community::{self, CommunityResult, LouvainOptions};
use crate::algorithms::graph_metrics::{self, ComponentsResult, GraphSummary};
use crate::algorithms::{centrality, cliques, spectral, statistics};
use crate::algorithms::{ComputeError, ProgressReporter, StatOptions};
use crate::graph::{Graph, GraphData, NodeId};
use crate::layout::{basic, force, kamada, shells, spectral as spectral_layout};
use crate::layout::{LayoutOptions, Positions};

// ============================================================================
// Result values
// ============================================================================

/// Whether an algorithm produces a per-node or a whole-graph result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultScope {
    Node,
    Graph,
}

/// Typed result of a compute invocation. Serializes untagged, so consumers
/// see the plain map / scalar / record shapes of the wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ComputeValue {
    NodeScalars(HashMap<NodeId, f64>),
    NodePoints(Positions),
    GraphScalar(f64),
    Components(ComponentsResult),
    Summary(GraphSummary),
    Community(CommunityResult),
    Raw(Value),
}

impl ComputeValue {
    pub fn as_node_scalars(&self) -> Option<&HashMap<NodeId, f64>> {
        match self {
            Self::NodeScalars(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_node_points(&self) -> Option<&Positions> {
        match self {
            Self::NodePoints(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_graph_scalar(&self) -> Option<f64> {
        match self {
            Self::GraphScalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_community(&self) -> Option<&CommunityResult> {
        match self {
            Self::Community(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_components(&self) -> Option<&ComponentsResult> {
        match self {
            Self::Components(c) => Some(c),
            _ => None,
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Static description of one registered algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmInfo {
    pub module: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub complexity: &'static str,
    pub scope: ResultScope,
    /// Smallest graph the algorithm is meaningful for.
    pub min_nodes: usize,
    /// Statistics that must be computed upstream and passed via options.
    pub requires: &'static [&'static str],
}

// ============================================================================
// Variants
// ============================================================================

/// Per-node and per-graph statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Degree,
    Closeness,
    EgoDensity,
    Betweenness,
    Clustering,
    Eigenvector,
    Cliques,
    LaplacianCoordinates,
    Density,
    AverageDegree,
    Diameter,
    AverageClustering,
    AverageShortestPath,
    ConnectedComponents,
    GraphSummary,
}

/// Layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Random,
    Circular,
    Spiral,
    Shell,
    Bipartite,
    Multipartite,
    BfsLayers,
    FruchtermanReingold,
    KamadaKawai,
    Spectral,
}

/// Community detection algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityAlgorithm {
    Louvain,
}

/// Pool-verification functions exercised by the dispatch tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    Echo,
    Fail,
    SleepMs,
}

/// Tagged union over every dispatchable compute function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Statistic(Statistic),
    Layout(Layout),
    Community(CommunityAlgorithm),
    Diagnostic(Diagnostic),
}

/// Name → variant factory. `None` for unknown pairs.
pub fn resolve(module: &str, function: &str) -> Option<Algorithm> {
    match module {
        "statistics" => Statistic::from_name(function).map(Algorithm::Statistic),
        "layouts" => Layout::from_name(function).map(Algorithm::Layout),
        "community" => match function {
            "louvain" => Some(Algorithm::Community(CommunityAlgorithm::Louvain)),
            _ => None,
        },
        "diagnostics" => match function {
            "echo" => Some(Algorithm::Diagnostic(Diagnostic::Echo)),
            "fail" => Some(Algorithm::Diagnostic(Diagnostic::Fail)),
            "sleep_ms" => Some(Algorithm::Diagnostic(Diagnostic::SleepMs)),
            _ => None,
        },
        _ => None,
    }
}

impl Statistic {
    const ALL: [Statistic; 15] = [
        Statistic::Degree,
        Statistic::Closeness,
        Statistic::EgoDensity,
        Statistic::Betweenness,
        Statistic::Clustering,
        Statistic::Eigenvector,
        Statistic::Cliques,
        Statistic::LaplacianCoordinates,
        Statistic::Density,
        Statistic::AverageDegree,
        Statistic::Diameter,
        Statistic::AverageClustering,
        Statistic::AverageShortestPath,
        Statistic::ConnectedComponents,
        Statistic::GraphSummary,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.info().id == name)
    }

    pub fn info(&self) -> AlgorithmInfo {
        let (id, name, description, complexity, scope, min_nodes): (
            &'static str,
            &'static str,
            &'static str,
            &'static str,
            ResultScope,
            usize,
        ) = match self {
            Self::Degree => (
                "degree",
                "Degree",
                "Neighbor count per node",
                "O(V)",
                ResultScope::Node,
                1,
            ),
            Self::Closeness => (
                "closeness",
                "Closeness centrality",
                "Inverse mean distance to the reachable nodes",
                "O(V·(V + E))",
                ResultScope::Node,
                2,
            ),
            Self::EgoDensity => (
                "ego_density",
                "Ego-network density",
                "Edge density among each node's neighbors",
                "O(V·d²)",
                ResultScope::Node,
                2,
            ),
            Self::Betweenness => (
                "betweenness",
                "Betweenness centrality",
                "Fraction of shortest paths crossing each node",
                "O(V·E)",
                ResultScope::Node,
                3,
            ),
            Self::Clustering => (
                "clustering",
                "Clustering coefficient",
                "Triangle density around each node",
                "O(V·d²)",
                ResultScope::Node,
                2,
            ),
            Self::Eigenvector => (
                "eigenvector",
                "Eigenvector centrality",
                "Power-iteration importance over the weighted adjacency",
                "O(iter·E)",
                ResultScope::Node,
                2,
            ),
            Self::Cliques => (
                "cliques",
                "Clique membership",
                "Maximal cliques containing each node (exponential worst case)",
                "exponential",
                ResultScope::Node,
                1,
            ),
            Self::LaplacianCoordinates => (
                "laplacian_coordinates",
                "Laplacian coordinates",
                "Approximate 2D spectral embedding (power iteration with deflation)",
                "O(iter·V²)",
                ResultScope::Node,
                3,
            ),
            Self::Density => (
                "density",
                "Density",
                "2E / (n(n-1))",
                "O(1)",
                ResultScope::Graph,
                2,
            ),
            Self::AverageDegree => (
                "average_degree",
                "Average degree",
                "2E / n",
                "O(1)",
                ResultScope::Graph,
                1,
            ),
            Self::Diameter => (
                "diameter",
                "Diameter",
                "Maximum eccentricity over reachable pairs",
                "O(V·(V + E))",
                ResultScope::Graph,
                2,
            ),
            Self::AverageClustering => (
                "average_clustering",
                "Average clustering",
                "Mean node clustering coefficient",
                "O(V·d²)",
                ResultScope::Graph,
                1,
            ),
            Self::AverageShortestPath => (
                "average_shortest_path",
                "Average shortest path",
                "Mean distance over ordered reachable pairs",
                "O(V·(V + E))",
                ResultScope::Graph,
                2,
            ),
            Self::ConnectedComponents => (
                "connected_components",
                "Connected components",
                "Component count and per-node component id",
                "O(V + E)",
                ResultScope::Graph,
                1,
            ),
            Self::GraphSummary => (
                "graph_summary",
                "Graph summary",
                "Node/edge counts, density, average degree, components",
                "O(V + E)",
                ResultScope::Graph,
                0,
            ),
        };
        AlgorithmInfo {
            module: "statistics",
            id,
            name,
            description,
            complexity,
            scope,
            min_nodes,
            requires: &[],
        }
    }

    fn invoke(
        &self,
        args: &[Value],
        progress: &mut ProgressReporter,
    ) -> Result<ComputeValue, ComputeError> {
        let graph = parse_graph(args)?;
        let selection = parse_selection(args.get(1))?;
        let selection = selection.as_deref();
        let opts: StatOptions = parse_options(args.get(2))?;

        let value = match self {
            Self::Degree => ComputeValue::NodeScalars(statistics::degree_centrality(
                &graph, selection, &opts, progress,
            )),
            Self::Closeness => ComputeValue::NodeScalars(statistics::closeness_centrality(
                &graph, selection, &opts, progress,
            )),
            Self::EgoDensity => ComputeValue::NodeScalars(statistics::ego_density(
                &graph, selection, &opts, progress,
            )),
            Self::Betweenness => ComputeValue::NodeScalars(centrality::betweenness_centrality(
                &graph, selection, &opts, progress,
            )),
            Self::Clustering => ComputeValue::NodeScalars(statistics::clustering_coefficient(
                &graph, selection, &opts, progress,
            )),
            Self::Eigenvector => ComputeValue::NodeScalars(centrality::eigenvector_centrality(
                &graph, selection, &opts, progress,
            )),
            Self::Cliques => ComputeValue::NodeScalars(cliques::clique_membership(
                &graph, selection, &opts, progress,
            )),
            Self::LaplacianCoordinates => ComputeValue::NodePoints(
                spectral::laplacian_coordinates(&graph, selection, &opts, progress),
            ),
            Self::Density => ComputeValue::GraphScalar(graph_metrics::density(&graph)),
            Self::AverageDegree => {
                ComputeValue::GraphScalar(graph_metrics::average_degree(&graph))
            }
            Self::Diameter => {
                ComputeValue::GraphScalar(graph_metrics::diameter(&graph, progress))
            }
            Self::AverageClustering => {
                ComputeValue::GraphScalar(graph_metrics::average_clustering(&graph, progress))
            }
            Self::AverageShortestPath => ComputeValue::GraphScalar(
                graph_metrics::average_shortest_path(&graph, progress),
            ),
            Self::ConnectedComponents => ComputeValue::Components(
                graph_metrics::connected_components(&graph, progress),
            ),
            Self::GraphSummary => {
                ComputeValue::Summary(graph_metrics::graph_summary(&graph, progress))
            }
        };
        Ok(value)
    }
}

impl Layout {
    const ALL: [Layout; 10] = [
        Layout::Random,
        Layout::Circular,
        Layout::Spiral,
        Layout::Shell,
        Layout::Bipartite,
        Layout::Multipartite,
        Layout::BfsLayers,
        Layout::FruchtermanReingold,
        Layout::KamadaKawai,
        Layout::Spectral,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.info().id == name)
    }

    pub fn info(&self) -> AlgorithmInfo {
        let (id, name, description, complexity, requires): (
            &'static str,
            &'static str,
            &'static str,
            &'static str,
            &'static [&'static str],
        ) = match self {
            Self::Random => (
                "random",
                "Random",
                "Uniform random placement",
                "O(V)",
                &[],
            ),
            Self::Circular => (
                "circular",
                "Circular",
                "Evenly spaced on one ring",
                "O(V)",
                &[],
            ),
            Self::Spiral => (
                "spiral",
                "Spiral",
                "Archimedean spiral in id order",
                "O(V)",
                &[],
            ),
            Self::Shell => (
                "shell",
                "Shell",
                "Concentric rings per group (degree shells by default)",
                "O(V)",
                &[],
            ),
            Self::Bipartite => (
                "bipartite",
                "Bipartite",
                "Two columns (alternating BFS parity by default)",
                "O(V + E)",
                &[],
            ),
            Self::Multipartite => (
                "multipartite",
                "Multipartite",
                "One column per explicit layer",
                "O(V)",
                &[],
            ),
            Self::BfsLayers => (
                "bfs_layers",
                "BFS layers",
                "Columns by BFS distance from a root",
                "O(V + E)",
                &[],
            ),
            Self::FruchtermanReingold => (
                "fruchterman_reingold",
                "Force-directed",
                "Fruchterman–Reingold force simulation",
                "O(iter·V²)",
                &[],
            ),
            Self::KamadaKawai => (
                "kamada_kawai",
                "Kamada–Kawai",
                "Stress descent over all-pairs graph distances",
                "O(V·(V + E) + iter·V²)",
                &[],
            ),
            Self::Spectral => (
                "spectral",
                "Spectral",
                "Placement from precomputed Laplacian coordinates",
                "O(V)",
                &["laplacian_coordinates"],
            ),
        };
        AlgorithmInfo {
            module: "layouts",
            id,
            name,
            description,
            complexity,
            scope: ResultScope::Node,
            min_nodes: 0,
            requires,
        }
    }

    fn invoke(
        &self,
        args: &[Value],
        progress: &mut ProgressReporter,
    ) -> Result<ComputeValue, ComputeError> {
        let graph = parse_graph(args)?;
        let opts: LayoutOptions = parse_options(args.get(1))?;
        let positions = match self {
            Self::Random => basic::random_layout(&graph, &opts, progress)?,
            Self::Circular => basic::circular_layout(&graph, &opts, progress)?,
            Self::Spiral => basic::spiral_layout(&graph, &opts, progress)?,
            Self::Shell => shells::shell_layout(&graph, &opts, progress)?,
            Self::Bipartite => shells::bipartite_layout(&graph, &opts, progress)?,
            Self::Multipartite => shells::multipartite_layout(&graph, &opts, progress)?,
            Self::BfsLayers => shells::bfs_layout(&graph, &opts, progress)?,
            Self::FruchtermanReingold => {
                force::fruchterman_reingold_layout(&graph, &opts, progress)?
            }
            Self::KamadaKawai => kamada::kamada_kawai_layout(&graph, &opts, progress)?,
            Self::Spectral => spectral_layout::spectral_layout(&graph, &opts, progress)?,
        };
        Ok(ComputeValue::NodePoints(positions))
    }
}

impl CommunityAlgorithm {
    pub fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo {
            module: "community",
            id: "louvain",
            name: "Louvain communities",
            description: "Multi-level modularity optimization",
            complexity: "O(iter·E)",
            scope: ResultScope::Graph,
            min_nodes: 1,
            requires: &[],
        }
    }

    fn invoke(
        &self,
        args: &[Value],
        progress: &mut ProgressReporter,
    ) -> Result<ComputeValue, ComputeError> {
        let graph = parse_graph(args)?;
        let opts: LouvainOptions = parse_options(args.get(1))?;
        Ok(ComputeValue::Community(community::louvain_communities(
            &graph, &opts, progress,
        )))
    }
}

impl Diagnostic {
    fn invoke(&self, args: &[Value]) -> Result<ComputeValue, ComputeError> {
        match self {
            Self::Echo => Ok(ComputeValue::Raw(
                args.first().cloned().unwrap_or(Value::Null),
            )),
            Self::Fail => panic!("diagnostic failure requested"),
            Self::SleepMs => {
                let ms = args
                    .first()
                    .and_then(Value::as_u64)
                    .ok_or_else(|| {
                        ComputeError::Input("sleep_ms expects a millisecond count".into())
                    })?;
                std::thread::sleep(std::time::Duration::from_millis(ms));
                Ok(ComputeValue::GraphScalar(ms as f64))
            }
        }
    }
}

impl Algorithm {
    /// Uniform invocation over the variant type. On success the terminal
    /// 1.0 progress report is guaranteed, whichever path the algorithm took.
    pub fn invoke(
        &self,
        args: &[Value],
        progress: &mut ProgressReporter,
    ) -> Result<ComputeValue, ComputeError> {
        let value = match self {
            Algorithm::Statistic(s) => s.invoke(args, progress)?,
            Algorithm::Layout(l) => l.invoke(args, progress)?,
            Algorithm::Community(c) => c.invoke(args, progress)?,
            Algorithm::Diagnostic(d) => d.invoke(args)?,
        };
        progress.finish();
        Ok(value)
    }
}

/// Stable metadata enumeration for UI discovery (diagnostics excluded).
pub fn catalog() -> Vec<AlgorithmInfo> {
    let mut out: Vec<AlgorithmInfo> = Statistic::ALL.iter().map(Statistic::info).collect();
    out.extend(Layout::ALL.iter().map(Layout::info));
    out.push(CommunityAlgorithm::Louvain.info());
    out
}

// ============================================================================
// Argument parsing
// ============================================================================

fn parse_graph(args: &[Value]) -> Result<Graph, ComputeError> {
    let value = args
        .first()
        .ok_or_else(|| ComputeError::Input("missing graph argument".into()))?;
    if !value.is_object() {
        return Err(ComputeError::Input(
            "graph argument must be a {nodes, edges} object".into(),
        ));
    }
    Ok(Graph::from_wire(&GraphData::from_value(value)))
}

fn parse_selection(value: Option<&Value>) -> Result<Option<Vec<NodeId>>, ComputeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|_| {
                    ComputeError::Input(format!("invalid node id in selection: {item}"))
                })
            })
            .collect::<Result<Vec<NodeId>, _>>()
            .map(Some),
        Some(other) => Err(ComputeError::Input(format!(
            "node selection must be an array or null, got {other}"
        ))),
    }
}

fn parse_options<T>(value: Option<&Value>) -> Result<T, ComputeError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ComputeError::Input(format!("invalid options: {e}"))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_args() -> Vec<Value> {
        vec![serde_json::json!({
            "nodes": ["a", "b", "c"],
            "edges": [
                {"source": "a", "target": "b"},
                {"source": "b", "target": "c"},
                {"source": "c", "target": "a"},
            ],
        })]
    }

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(
            resolve("statistics", "betweenness"),
            Some(Algorithm::Statistic(Statistic::Betweenness))
        );
        assert_eq!(
            resolve("layouts", "kamada_kawai"),
            Some(Algorithm::Layout(Layout::KamadaKawai))
        );
        assert_eq!(
            resolve("community", "louvain"),
            Some(Algorithm::Community(CommunityAlgorithm::Louvain))
        );
        assert_eq!(
            resolve("diagnostics", "echo"),
            Some(Algorithm::Diagnostic(Diagnostic::Echo))
        );
    }

    #[test]
    fn test_resolve_unknown_names() {
        assert_eq!(resolve("statistics", "pagerank_v2"), None);
        assert_eq!(resolve("nowhere", "degree"), None);
    }

    #[test]
    fn test_catalog_is_complete_with_unique_ids() {
        let infos = catalog();
        assert_eq!(infos.len(), 15 + 10 + 1);
        let mut ids: Vec<(&str, &str)> = infos.iter().map(|i| (i.module, i.id)).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), infos.len(), "(module, id) pairs must be unique");
        // Every catalog entry must resolve back to a variant.
        for info in &infos {
            assert!(
                resolve(info.module, info.id).is_some(),
                "{}::{} does not resolve",
                info.module,
                info.id
            );
        }
    }

    #[test]
    fn test_spectral_layout_declares_requirement() {
        let info = Layout::Spectral.info();
        assert_eq!(info.requires, &["laplacian_coordinates"]);
    }

    #[test]
    fn test_invoke_statistic_with_defaults() {
        let algo = resolve("statistics", "degree").unwrap();
        let value = algo
            .invoke(&triangle_args(), &mut ProgressReporter::disabled())
            .unwrap();
        let scalars = value.as_node_scalars().unwrap();
        assert_eq!(scalars.len(), 3);
        assert_eq!(scalars[&NodeId::from("a")], 2.0);
    }

    #[test]
    fn test_invoke_with_selection_and_options() {
        let mut args = triangle_args();
        args.push(serde_json::json!(["a", "b"]));
        args.push(serde_json::json!({"normalized": true}));
        let algo = resolve("statistics", "closeness").unwrap();
        let value = algo
            .invoke(&args, &mut ProgressReporter::disabled())
            .unwrap();
        assert_eq!(value.as_node_scalars().unwrap().len(), 2);
    }

    #[test]
    fn test_invoke_layout() {
        let mut args = triangle_args();
        args.push(serde_json::json!({"scale": 2.0, "seed": 3}));
        let algo = resolve("layouts", "circular").unwrap();
        let value = algo
            .invoke(&args, &mut ProgressReporter::disabled())
            .unwrap();
        assert_eq!(value.as_node_points().unwrap().len(), 3);
    }

    #[test]
    fn test_invoke_community() {
        let algo = resolve("community", "louvain").unwrap();
        let value = algo
            .invoke(&triangle_args(), &mut ProgressReporter::disabled())
            .unwrap();
        let result = value.as_community().unwrap();
        assert_eq!(result.communities.len(), 3);
    }

    #[test]
    fn test_missing_graph_argument_is_input_error() {
        let algo = resolve("statistics", "degree").unwrap();
        let err = algo
            .invoke(&[], &mut ProgressReporter::disabled())
            .unwrap_err();
        assert!(matches!(err, ComputeError::Input(_)));

        let err = algo
            .invoke(&[serde_json::json!(17)], &mut ProgressReporter::disabled())
            .unwrap_err();
        assert!(matches!(err, ComputeError::Input(_)));
    }

    #[test]
    fn test_malformed_selection_is_input_error() {
        let mut args = triangle_args();
        args.push(serde_json::json!("not-an-array"));
        let algo = resolve("statistics", "degree").unwrap();
        let err = algo
            .invoke(&args, &mut ProgressReporter::disabled())
            .unwrap_err();
        assert!(matches!(err, ComputeError::Input(_)));
    }

    #[test]
    fn test_invoke_guarantees_terminal_progress() {
        use std::sync::{Arc, Mutex};
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = ticks.clone();
        let mut progress = ProgressReporter::new(move |f| sink.lock().unwrap().push(f));
        let algo = resolve("statistics", "eigenvector").unwrap();
        algo.invoke(&triangle_args(), &mut progress).unwrap();
        assert_eq!(ticks.lock().unwrap().last().copied(), Some(1.0));
    }

    #[test]
    fn test_compute_value_serializes_untagged() {
        let mut map = HashMap::new();
        map.insert(NodeId::from("a"), 1.5);
        let json = serde_json::to_value(ComputeValue::NodeScalars(map)).unwrap();
        assert_eq!(json, serde_json::json!({"a": 1.5}));
        let json = serde_json::to_value(ComputeValue::GraphScalar(0.5)).unwrap();
        assert_eq!(json, serde_json::json!(0.5));
    }

    #[test]
    fn test_diagnostic_echo_and_sleep() {
        let echo = resolve("diagnostics", "echo").unwrap();
        let value = echo
            .invoke(&[serde_json::json!({"k": 1})], &mut ProgressReporter::disabled())
            .unwrap();
        assert!(matches!(value, ComputeValue::Raw(_)));

        let sleep = resolve("diagnostics", "sleep_ms").unwrap();
        let value = sleep
            .invoke(&[serde_json::json!(1)], &mut ProgressReporter::disabled())
            .unwrap();
        assert_eq!(value.as_graph_scalar(), Some(1.0));
    }
}
