//! Kamada–Kawai layout: gradient descent on spring energy.
//!
//! All-pairs shortest paths (BFS) define ideal spring lengths
//! `l_ij = K·d_ij`, with `K` derived from the largest observed distance so
//! the longest ideal length is 1. Gradient descent on the total spring
//! energy runs until the aggregate gradient magnitude drops below the
//! threshold or the budget is exhausted. Disconnected pairs carry no
//! spring.

use crate::algorithms::primitives::IndexedGraph;
use crate::algorithms::{ComputeError, ProgressReporter};
use crate::graph::Graph;

use super::{rescale, trivial_layout, LayoutOptions, Point, Positions};

/// Default gradient-descent iteration budget.
const DEFAULT_ITERATIONS: usize = 300;
/// Default aggregate-gradient stop threshold.
const DEFAULT_THRESHOLD: f64 = 1e-4;
/// Descent step size.
const LEARNING_RATE: f64 = 0.05;
/// Guard against zero distances between coincident nodes.
const MIN_DISTANCE: f64 = 1e-9;

/// Kamada–Kawai stress-minimizing layout.
pub fn kamada_kawai_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    let iterations = opts.iterations.unwrap_or(DEFAULT_ITERATIONS).max(1);
    let threshold = opts.threshold.unwrap_or(DEFAULT_THRESHOLD);

    // All-pairs BFS. The first half of the progress budget covers this scan.
    let mut distances: Vec<Vec<Option<u32>>> = Vec::with_capacity(n);
    let mut max_distance = 0u32;
    for source in 0..n {
        let row = ig.bfs_distances(source);
        for d in row.iter().flatten() {
            max_distance = max_distance.max(*d);
        }
        distances.push(row);
        progress.report_ratio(source + 1, 2 * n.max(1));
    }

    // Ideal spring length per graph-distance unit.
    let unit = if max_distance == 0 {
        1.0
    } else {
        1.0 / f64::from(max_distance)
    };

    // Deterministic circular start keeps the descent reproducible.
    let mut xs: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos())
        .collect();
    let mut ys: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / n as f64).sin())
        .collect();

    let mut gx = vec![0.0; n];
    let mut gy = vec![0.0; n];
    for pass in 0..iterations {
        for i in 0..n {
            gx[i] = 0.0;
            gy[i] = 0.0;
        }

        // Gradient of Σ k_ij (|p_i − p_j| − l_ij)² / 2 with k_ij = 1/d_ij².
        let mut gradient_magnitude = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let Some(d) = distances[i][j] else { continue };
                if d == 0 {
                    continue;
                }
                let graph_distance = f64::from(d);
                let ideal = unit * graph_distance;
                let stiffness = 1.0 / (graph_distance * graph_distance);

                let (ux, uy) = (xs[i] - xs[j], ys[i] - ys[j]);
                let dist = (ux * ux + uy * uy).sqrt().max(MIN_DISTANCE);
                let magnitude = stiffness * (dist - ideal);
                let (fx, fy) = (ux / dist * magnitude, uy / dist * magnitude);
                gx[i] += fx;
                gy[i] += fy;
                gx[j] -= fx;
                gy[j] -= fy;
            }
        }

        for i in 0..n {
            xs[i] -= LEARNING_RATE * gx[i];
            ys[i] -= LEARNING_RATE * gy[i];
            gradient_magnitude += (gx[i] * gx[i] + gy[i] * gy[i]).sqrt();
        }

        progress.report_ratio(n + (pass + 1) * n / iterations, 2 * n.max(1));
        if gradient_magnitude < threshold {
            break;
        }
    }

    let mut positions: Positions = ig
        .ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), Point::new(xs[i], ys[i])))
        .collect();
    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

// ============================================================================
// Tests
// ============================================================================
