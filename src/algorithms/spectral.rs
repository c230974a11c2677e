//! Approximate Laplacian spectral coordinates.
//!
//! Builds the dense Laplacian `L = D − A` and approximates its 2nd and 3rd
//! smallest eigenvectors by power iteration on the shifted operator
//! `c·I − L` (with `c` above the spectral radius, the smallest modes of `L`
//! become the dominant ones), deflating each pass against the constant
//! vector and any previously extracted mode. This is an approximation, not
//! an exact eigendecomposition.
//!
//! Only meaningful for n ≥ 3; smaller graphs fall back to random
//! coordinates.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::{Graph, NodeId};
use crate::layout::Point;

use super::centrality::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use super::primitives::{l1_delta, normalize_l2, IndexedGraph};
use super::progress::ProgressReporter;
use super::StatOptions;

/// Approximate 2D spectral embedding coordinates per node.
pub fn laplacian_coordinates(
    graph: &Graph,
    selection: Option<&[NodeId]>,
    opts: &StatOptions,
    progress: &mut ProgressReporter,
) -> HashMap<NodeId, Point> {
    let ig = IndexedGraph::new(graph);
    let n = ig.len();
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if n < 3 {
        let coords = ig
            .ids
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    Point {
                        x: rng.random_range(-1.0..1.0),
                        y: rng.random_range(-1.0..1.0),
                    },
                )
            })
            .collect();
        progress.finish();
        return filter_selection(coords, selection);
    }

    let tolerance = opts.tolerance.unwrap_or(DEFAULT_TOLERANCE);
    let max_iterations = opts.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);

    // Weighted degrees; the shift keeps c·I − L positive semidefinite so the
    // smallest Laplacian modes dominate the iteration.
    let degrees: Vec<f64> = ig
        .adj
        .iter()
        .map(|row| row.iter().map(|(_, w)| w).sum())
        .collect();
    let max_degree = degrees.iter().cloned().fold(0.0, f64::max);
    let shift = 1.0 + 2.0 * max_degree;

    // The constant vector spans the trivial kernel mode; every pass deflates
    // against it (and against already extracted modes).
    let uniform = vec![1.0 / (n as f64).sqrt(); n];
    let mut modes: Vec<Vec<f64>> = Vec::with_capacity(2);

    for mode_index in 0..2 {
        let mut v: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
        deflate(&mut v, &uniform);
        for prior in &modes {
            deflate(&mut v, prior);
        }
        normalize_l2(&mut v);

        let mut next = vec![0.0; n];
        for pass in 0..max_iterations {
            apply_shifted_laplacian(&ig, &degrees, shift, &v, &mut next);
            deflate(&mut next, &uniform);
            for prior in &modes {
                deflate(&mut next, prior);
            }
            normalize_l2(&mut next);

            let delta = l1_delta(&v, &next);
            std::mem::swap(&mut v, &mut next);
            progress.report_ratio(
                mode_index * max_iterations + pass + 1,
                2 * max_iterations,
            );
            if delta < tolerance {
                break;
            }
        }
        modes.push(v);
    }

    let coords = ig
        .ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            (
                id.clone(),
                Point {
                    x: modes[0][i],
                    y: modes[1][i],
                },
            )
        })
        .collect();
    progress.finish();
    filter_selection(coords, selection)
}

/// `out = (c·I − L)·v = (c − d_i)·v_i + Σ_j w_ij·v_j`.
fn apply_shifted_laplacian(
    ig: &IndexedGraph,
    degrees: &[f64],
    shift: f64,
    v: &[f64],
    out: &mut [f64],
) {
    for i in 0..v.len() {
        out[i] = (shift - degrees[i]) * v[i];
    }
    for (i, row) in ig.adj.iter().enumerate() {
        for &(j, w) in row {
            out[i] += w * v[j];
        }
    }
}

/// Remove the component of `v` along the unit vector `basis`.
fn deflate(v: &mut [f64], basis: &[f64]) {
    let dot: f64 = v.iter().zip(basis).map(|(a, b)| a * b).sum();
    for (x, b) in v.iter_mut().zip(basis) {
        *x -= dot * b;
    }
}

fn filter_selection(
    coords: HashMap<NodeId, Point>,
    selection: Option<&[NodeId]>,
) -> HashMap<NodeId, Point> {
    match selection {
        None => coords,
        Some(ids) => {
            let mut out = HashMap::with_capacity(ids.len());
            for id in ids {
                if let Some(p) = coords.get(id) {
                    out.insert(id.clone(), p.clone());
                }
            }
            out
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
