//! Force-directed layout (Fruchterman–Reingold).
//!
//! Pairwise repulsion `k²/d` against edge attraction `d/k`, displacement
//! clamped by a temperature that cools linearly to zero over the iteration
//! budget, with an early stop once the mean displacement falls below the
//! threshold.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithms::{ComputeError, ProgressReporter};
use crate::graph::Graph;

use super::{rescale, trivial_layout, LayoutOptions, Point, Positions};
use crate::algorithms::primitives::IndexedGraph;

/// Default iteration budget.
const DEFAULT_ITERATIONS: usize = 50;
/// Default mean-displacement early-stop threshold.
const DEFAULT_THRESHOLD: f64 = 1e-4;
/// Fixed seed for the deterministic default initialization.
const DEFAULT_SEED: u64 = 0x6772_6170_686d;
/// Guard against zero distances between coincident nodes.
const MIN_DISTANCE: f64 = 1e-9;

/// Fruchterman–Reingold force simulation.
pub fn fruchterman_reingold_layout(
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
    let k = opts.k.unwrap_or_else(|| (1.0 / n as f64).sqrt());
    let iterations = opts.iterations.unwrap_or(DEFAULT_ITERATIONS).max(1);
    let threshold = opts.threshold.unwrap_or(DEFAULT_THRESHOLD);

    // Layouts are deterministic by default; an explicit seed only changes
    // which reproducible start is used.
    let mut rng = StdRng::seed_from_u64(opts.seed.unwrap_or(DEFAULT_SEED));
    let mut xs: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
    let mut ys: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();

    let mut temperature = 0.1;
    let cooling = temperature / iterations as f64;
    let mut dx = vec![0.0; n];
    let mut dy = vec![0.0; n];

    for pass in 0..iterations {
        for i in 0..n {
            dx[i] = 0.0;
            dy[i] = 0.0;
        }

        // Repulsion between every pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let (ux, uy) = (xs[i] - xs[j], ys[i] - ys[j]);
                let dist = (ux * ux + uy * uy).sqrt().max(MIN_DISTANCE);
                let force = k * k / dist;
                let (fx, fy) = (ux / dist * force, uy / dist * force);
                dx[i] += fx;
                dy[i] += fy;
                dx[j] -= fx;
                dy[j] -= fy;
            }
        }

        // Attraction along edges.
        for i in 0..n {
            for &(j, _) in &ig.adj[i] {
                if j <= i {
                    continue;
                }
                let (ux, uy) = (xs[i] - xs[j], ys[i] - ys[j]);
                let dist = (ux * ux + uy * uy).sqrt().max(MIN_DISTANCE);
                let force = dist / k;
                let (fx, fy) = (ux / dist * force, uy / dist * force);
                dx[i] -= fx;
                dy[i] -= fy;
                dx[j] += fx;
                dy[j] += fy;
            }
        }

        // Displace, clamped by the current temperature.
        let mut total_displacement = 0.0;
        for i in 0..n {
            let length = (dx[i] * dx[i] + dy[i] * dy[i]).sqrt().max(MIN_DISTANCE);
            let step = length.min(temperature);
            xs[i] += dx[i] / length * step;
            ys[i] += dy[i] / length * step;
            total_displacement += step;
        }

        temperature -= cooling;
        progress.report_ratio(pass + 1, iterations);
        if total_displacement / (n as f64) < threshold {
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
