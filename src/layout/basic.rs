//! Random, circular and spiral layouts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithms::{ComputeError, ProgressReporter};
use crate::graph::Graph;

use super::{rescale, trivial_layout, LayoutOptions, Point, Positions};

/// Default turn spacing for the spiral layout.
const DEFAULT_SPIRAL_RESOLUTION: f64 = 0.35;

/// Uniform random placement inside the output square.
pub fn random_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let total = ids.len();
    let mut positions = Positions::with_capacity(total);
    for (done, id) in ids.into_iter().enumerate() {
        positions.insert(
            id,
            Point::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
        );
        progress.report_ratio(done + 1, total);
    }
    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

/// Nodes evenly spaced on a single ring, in ascending id order.
pub fn circular_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let total = ids.len();
    let mut positions = Positions::with_capacity(total);
    for (i, id) in ids.into_iter().enumerate() {
        let theta = 2.0 * std::f64::consts::PI * i as f64 / total as f64;
        positions.insert(id, Point::new(theta.cos(), theta.sin()));
        progress.report_ratio(i + 1, total);
    }
    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

/// Archimedean spiral: radius grows linearly with the winding angle.
pub fn spiral_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let resolution = opts.resolution.unwrap_or(DEFAULT_SPIRAL_RESOLUTION);
    let total = ids.len();
    let mut positions = Positions::with_capacity(total);
    for (i, id) in ids.into_iter().enumerate() {
        let theta = resolution * i as f64;
        positions.insert(id, Point::new(theta * theta.cos(), theta * theta.sin()));
        progress.report_ratio(i + 1, total);
    }
    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

// ============================================================================
// Tests
// ============================================================================
