//! End-to-end scenario tests for graphmetrics.
//!
//! Exercises the library surface the way a consumer would: build a graph,
//! serialize it to the wire form, dispatch named compute tasks through the
//! worker pool, and check the returned statistics, layouts and communities
//! against known topologies.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use graphmetrics::algorithms::community;
use graphmetrics::algorithms::graph_metrics;
use graphmetrics::algorithms::ProgressReporter;
use graphmetrics::{
    catalog, ComputeDispatcher, ComputeValue, DispatchConfig, DispatchError, ExecuteOptions,
    Graph, NodeId, TaskDescriptor,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .try_init();
}

fn node(s: &str) -> NodeId {
    NodeId::from(s)
}

fn dispatcher() -> ComputeDispatcher {
    init_tracing();
    ComputeDispatcher::new(DispatchConfig {
        workers: 2,
        default_timeout: Duration::from_secs(10),
    })
}

/// Triangle A–B–C.
fn triangle() -> Graph {
    let mut g = Graph::new();
    g.add_edge("A", "B", 1.0);
    g.add_edge("B", "C", 1.0);
    g.add_edge("C", "A", 1.0);
    g
}

/// Path A–B–C–D.
fn path4() -> Graph {
    let mut g = Graph::new();
    g.add_edge("A", "B", 1.0);
    g.add_edge("B", "C", 1.0);
    g.add_edge("C", "D", 1.0);
    g
}

/// Star with hub A and leaves B, C, D.
fn star() -> Graph {
    let mut g = Graph::new();
    g.add_edge("A", "B", 1.0);
    g.add_edge("A", "C", 1.0);
    g.add_edge("A", "D", 1.0);
    g
}

/// Disconnected pairs A–B and C–D.
fn two_pairs() -> Graph {
    let mut g = Graph::new();
    g.add_edge("A", "B", 1.0);
    g.add_edge("C", "D", 1.0);
    g
}

fn stat_task(graph: &Graph, function: &str) -> TaskDescriptor {
    TaskDescriptor::new("statistics", function)
        .arg(graph.to_wire())
        .arg(serde_json::Value::Null)
}

async fn run_stat(pool: &ComputeDispatcher, graph: &Graph, function: &str) -> ComputeValue {
    pool.run(stat_task(graph, function), ExecuteOptions::default())
        .await
        .unwrap_or_else(|e| panic!("statistic `{function}` failed: {e}"))
}

// ============================================================================
// Scenario 1 — triangle
// ============================================================================

#[tokio::test]
async fn test_triangle_degree_clustering_cliques() {
    let pool = dispatcher();
    let graph = triangle();

    let degrees = run_stat(&pool, &graph, "degree").await;
    let degrees = degrees.as_node_scalars().unwrap();
    for id in ["A", "B", "C"] {
        assert_eq!(degrees[&node(id)], 2.0, "triangle degree of {id}");
    }

    let clustering = run_stat(&pool, &graph, "clustering").await;
    let clustering = clustering.as_node_scalars().unwrap();
    for id in ["A", "B", "C"] {
        assert_eq!(clustering[&node(id)], 1.0, "triangle clustering of {id}");
    }

    let cliques = run_stat(&pool, &graph, "cliques").await;
    let cliques = cliques.as_node_scalars().unwrap();
    for id in ["A", "B", "C"] {
        assert_eq!(cliques[&node(id)], 1.0, "triangle clique count of {id}");
    }
}

// ============================================================================
// Scenario 2 — path
// ============================================================================

#[tokio::test]
async fn test_path_diameter_average_path_betweenness() {
    let pool = dispatcher();
    let graph = path4();

    let diameter = run_stat(&pool, &graph, "diameter").await;
    assert_eq!(diameter.as_graph_scalar(), Some(3.0));

    let average = run_stat(&pool, &graph, "average_shortest_path").await;
    let average = average.as_graph_scalar().unwrap();
    assert!(
        (average - 5.0 / 3.0).abs() < 1e-9,
        "expected ≈1.667, got {average}"
    );

    let betweenness = run_stat(&pool, &graph, "betweenness").await;
    let betweenness = betweenness.as_node_scalars().unwrap();
    assert!(
        (betweenness[&node("B")] - betweenness[&node("C")]).abs() < 1e-12,
        "interior nodes tie"
    );
    assert!(betweenness[&node("B")] > 0.0);
    assert_eq!(betweenness[&node("A")], 0.0);
    assert_eq!(betweenness[&node("D")], 0.0);
}

// ============================================================================
// Scenario 3 — star
// ============================================================================

#[tokio::test]
async fn test_star_density_average_degree_components() {
    let pool = dispatcher();
    let graph = star();

    let density = run_stat(&pool, &graph, "density").await;
    assert_eq!(density.as_graph_scalar(), Some(0.5), "3 of 6 possible edges");

    let average_degree = run_stat(&pool, &graph, "average_degree").await;
    assert_eq!(average_degree.as_graph_scalar(), Some(1.5));

    let components = run_stat(&pool, &graph, "connected_components").await;
    let components = components.as_components().unwrap();
    assert_eq!(components.count, 1);
    assert_eq!(components.components.len(), 4);
}

// ============================================================================
// Scenario 4 — disconnected pairs
// ============================================================================

#[tokio::test]
async fn test_disconnected_components_and_diameter() {
    let pool = dispatcher();
    let graph = two_pairs();

    let components = run_stat(&pool, &graph, "connected_components").await;
    let components = components.as_components().unwrap();
    assert_eq!(components.count, 2);

    // Unreachable pairs are excluded, so the diameter is per-component.
    let diameter = run_stat(&pool, &graph, "diameter").await;
    assert_eq!(diameter.as_graph_scalar(), Some(1.0));
}

// ============================================================================
// Scenario 5 — fail-fast compute function
// ============================================================================

#[tokio::test]
async fn test_fail_fast_function_rejects_before_progress() {
    let pool = dispatcher();
    let ticks = Arc::new(Mutex::new(Vec::new()));
    let sink = ticks.clone();
    let opts = ExecuteOptions::default().with_progress(move |f| sink.lock().unwrap().push(f));

    let err = pool
        .run(TaskDescriptor::new("diagnostics", "fail"), opts)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::WorkerFailure(_)));
    assert!(
        ticks.lock().unwrap().is_empty(),
        "no progress may be reported before the failure"
    );
}

// ============================================================================
// Cross-cutting properties
// ============================================================================

#[tokio::test]
async fn test_degree_neighbor_consistency_and_handshake() {
    let graph = {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1.0);
        g.add_edge("B", "C", 2.0);
        g.add_edge("C", "A", 1.0);
        g.add_edge("C", "D", 1.0);
        g.add_node("E");
        g
    };
    let mut degree_sum = 0;
    for id in graph.sorted_nodes() {
        assert_eq!(graph.degree(&id), graph.neighbors(&id).count());
        degree_sum += graph.degree(&id);
    }
    assert_eq!(degree_sum, 2 * graph.edge_count());
}

#[tokio::test]
async fn test_eigenvector_properties_via_dispatch() {
    let pool = dispatcher();
    let graph = path4();
    let scores = run_stat(&pool, &graph, "eigenvector").await;
    let scores = scores.as_node_scalars().unwrap();

    let norm: f64 = scores.values().map(|s| s * s).sum();
    assert!((norm - 1.0).abs() < 1e-6, "Σx² ≈ 1, got {norm}");
    assert!(scores.values().all(|s| *s >= 0.0));
    assert!(scores[&node("B")] > scores[&node("A")], "interior beats endpoint");
    assert!(scores[&node("C")] > scores[&node("D")], "interior beats endpoint");
}

#[tokio::test]
async fn test_louvain_partition_and_modularity_agreement() {
    init_tracing();
    let mut graph = Graph::new();
    for prefix in ["x", "y"] {
        for i in 0..4 {
            for j in (i + 1)..4 {
                graph.add_edge(format!("{prefix}{i}"), format!("{prefix}{j}"), 1.0);
            }
        }
    }
    graph.add_edge("x0", "y0", 1.0);

    let result = community::louvain_communities(
        &graph,
        &community::LouvainOptions::default(),
        &mut ProgressReporter::disabled(),
    );
    assert_eq!(result.communities.len(), graph.node_count(), "partition is total");
    let recomputed = community::modularity(&graph, &result.communities);
    assert!(
        (result.modularity - recomputed).abs() < 1e-9,
        "reported modularity must match the standalone computation"
    );
}

#[tokio::test]
async fn test_wire_round_trip_through_dispatch() {
    let pool = dispatcher();
    let mut graph = Graph::new();
    graph.add_edge("A", "B", 2.5);
    graph.add_edge("B", "C", 1.0);
    graph.add_node(NodeId::Int(9));

    let rebuilt = Graph::from_wire(&graph.to_wire());
    assert_eq!(rebuilt.to_wire(), graph.to_wire());

    // The same wire record is what crosses the worker boundary.
    let summary = run_stat(&pool, &graph, "graph_summary").await;
    match summary {
        ComputeValue::Summary(s) => {
            assert_eq!(s.nodes, 4);
            assert_eq!(s.edges, 2);
            assert_eq!(s.component_count, 2);
        }
        other => panic!("expected a summary record, got {other:?}"),
    }
}

// ============================================================================
// Layout contract, end to end
// ============================================================================

#[tokio::test]
async fn test_every_layout_satisfies_shared_contract() {
    let pool = dispatcher();
    let graph = {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1.0);
        g.add_edge("B", "C", 1.0);
        g.add_edge("C", "D", 1.0);
        g.add_edge("D", "A", 1.0);
        g.add_edge("A", "C", 1.0);
        g
    };
    let scale = 2.0;

    for layout in [
        "random",
        "circular",
        "spiral",
        "shell",
        "bipartite",
        "bfs_layers",
        "fruchterman_reingold",
        "kamada_kawai",
    ] {
        let task = TaskDescriptor::new("layouts", layout)
            .arg(graph.to_wire())
            .arg(serde_json::json!({"scale": scale, "seed": 5}));
        let value = pool
            .run(task, ExecuteOptions::default())
            .await
            .unwrap_or_else(|e| panic!("layout `{layout}` failed: {e}"));
        let positions = value.as_node_points().unwrap();
        assert_eq!(positions.len(), graph.node_count(), "layout `{layout}` cardinality");

        let mut max_abs = 0.0_f64;
        for p in positions.values() {
            assert!(p.x.is_finite() && p.y.is_finite(), "layout `{layout}` finite");
            max_abs = max_abs.max(p.x.abs()).max(p.y.abs());
        }
        assert!(
            (max_abs - scale).abs() < 1e-9,
            "layout `{layout}`: max |coord| should be ≈ {scale}, got {max_abs}"
        );
    }
}

#[tokio::test]
async fn test_spectral_pipeline_stat_feeds_layout() {
    let pool = dispatcher();
    let graph = path4();

    // Missing the upstream statistic: a descriptive precondition error.
    let bare = TaskDescriptor::new("layouts", "spectral").arg(graph.to_wire());
    let err = pool.run(bare, ExecuteOptions::default()).await.unwrap_err();
    match &err {
        DispatchError::Precondition(message) => {
            assert!(message.contains("laplacian_coordinates"))
        }
        other => panic!("expected a precondition error, got {other:?}"),
    }

    // With the statistic's output threaded through the options it works.
    let coords = pool
        .run(
            TaskDescriptor::new("statistics", "laplacian_coordinates")
                .arg(graph.to_wire())
                .arg(serde_json::Value::Null)
                .arg(serde_json::json!({"seed": 13})),
            ExecuteOptions::default(),
        )
        .await
        .unwrap();
    let coords = coords.as_node_points().unwrap().clone();

    let layout = TaskDescriptor::new("layouts", "spectral")
        .arg(graph.to_wire())
        .arg(serde_json::json!({"precomputed": coords}));
    let positions = pool.run(layout, ExecuteOptions::default()).await.unwrap();
    assert_eq!(positions.as_node_points().unwrap().len(), 4);
}

#[tokio::test]
async fn test_single_node_layout_at_center() {
    let pool = dispatcher();
    let mut graph = Graph::new();
    graph.add_node("only");
    let task = TaskDescriptor::new("layouts", "fruchterman_reingold")
        .arg(graph.to_wire())
        .arg(serde_json::json!({"center": {"x": 7.0, "y": -2.0}}));
    let value = pool.run(task, ExecuteOptions::default()).await.unwrap();
    let positions = value.as_node_points().unwrap();
    let p = positions[&node("only")];
    assert_eq!((p.x, p.y), (7.0, -2.0));
}

// ============================================================================
// Registry and graph-metric helpers used directly
// ============================================================================

#[test]
fn test_catalog_stable_enumeration() {
    let infos = catalog();
    assert!(infos.iter().any(|i| i.id == "betweenness"));
    assert!(infos.iter().any(|i| i.id == "kamada_kawai"));
    assert!(infos.iter().any(|i| i.id == "louvain"));
    let spectral = infos.iter().find(|i| i.id == "spectral").unwrap();
    assert_eq!(spectral.requires, &["laplacian_coordinates"]);
}

#[test]
fn test_direct_graph_metrics_match_dispatched_values() {
    let graph = star();
    assert_eq!(graph_metrics::density(&graph), 0.5);
    assert_eq!(graph_metrics::average_degree(&graph), 1.5);
    let components =
        graph_metrics::connected_components(&graph, &mut ProgressReporter::disabled());
    assert_eq!(components.count, 1);
}
