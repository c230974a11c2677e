//! Layout algorithms.
//!
//! Every layout maps a graph to `{node → (x, y)}` under a shared contract:
//!
//! - `n = 0` → empty map; `n = 1` → the node sits exactly at the caller's
//!   center (explicit base cases, not emergent behavior)
//! - positions are rescaled into `[-scale, scale]²` around the center via
//!   centroid-subtract → divide-by-max-abs-coordinate → scale-and-offset
//! - deterministic output unless a PRNG is requested; a `seed` makes the
//!   randomized layouts reproducible
//!
//! ## Modules
//!
//! - [`basic`] — random, circular, spiral
//! - [`shells`] — shell, bipartite, multipartite, BFS-layer group placement
//! - [`force`] — Fruchterman–Reingold force simulation
//! - [`kamada`] — Kamada–Kawai stress descent
//! - [`spectral`] — placement from precomputed Laplacian coordinates

pub mod basic;
pub mod force;
pub mod kamada;
pub mod shells;
pub mod spectral;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

// ============================================================================
// Geometry
// ============================================================================

/// A 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Default for Point {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node positions keyed by id — the result shape of every layout.
pub type Positions = HashMap<NodeId, Point>;

// ============================================================================
// Options
// ============================================================================

/// Caller-tunable layout parameters. Unset fields fall back to per-algorithm
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Half-extent of the output square.
    pub scale: f64,
    /// Center the output square around this point.
    pub center: Point,
    /// PRNG seed for the randomized layouts; unseeded when absent.
    pub seed: Option<u64>,
    /// Iteration budget for the iterative layouts.
    pub iterations: Option<usize>,
    /// Optimal pairwise distance override (force-directed).
    pub k: Option<f64>,
    /// Convergence threshold for early termination.
    pub threshold: Option<f64>,
    /// Turn spacing for the spiral layout.
    pub resolution: Option<f64>,
    /// Explicit ordered node groups (shell / multipartite layouts).
    pub groups: Option<Vec<Vec<NodeId>>>,
    /// Start node for the BFS-layer layout.
    pub root: Option<NodeId>,
    /// Precomputed spectral coordinates (spectral layout input).
    pub precomputed: Option<Positions>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            center: Point::default(),
            seed: None,
            iterations: None,
            k: None,
            threshold: None,
            resolution: None,
            groups: None,
            root: None,
            precomputed: None,
        }
    }
}

// ============================================================================
// Shared rescale pipeline
// ============================================================================

/// Rescale positions into `[-scale, scale]²` around `center`.
///
/// Subtracts the centroid, divides by the largest absolute coordinate, then
/// applies scale and offset. Coincident inputs (max extent 0) all land on
/// the center.
pub(crate) fn rescale(positions: &mut Positions, scale: f64, center: &Point) {
    let n = positions.len();
    if n == 0 {
        return;
    }

    let cx: f64 = positions.values().map(|p| p.x).sum::<f64>() / n as f64;
    let cy: f64 = positions.values().map(|p| p.y).sum::<f64>() / n as f64;

    let mut max_abs = 0.0_f64;
    for p in positions.values_mut() {
        p.x -= cx;
        p.y -= cy;
        max_abs = max_abs.max(p.x.abs()).max(p.y.abs());
    }

    for p in positions.values_mut() {
        if max_abs > 0.0 {
            p.x = p.x / max_abs * scale + center.x;
            p.y = p.y / max_abs * scale + center.y;
        } else {
            p.x = center.x;
            p.y = center.y;
        }
    }
}

/// The `n ≤ 1` base cases shared by every layout. Returns `Some` when the
/// graph is small enough to be placed trivially.
pub(crate) fn trivial_layout(ids: &[NodeId], opts: &LayoutOptions) -> Option<Positions> {
    match ids {
        [] => Some(Positions::new()),
        [only] => {
            let mut out = Positions::new();
            out.insert(only.clone(), opts.center);
            Some(out)
        }
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
