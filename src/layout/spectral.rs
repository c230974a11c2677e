//! Spectral layout.
//!
//! Pure placement: consumes the coordinates produced by the
//! `laplacian_coordinates` statistic and rescales them into the output
//! square. No eigen-computation happens here — a missing coordinate is a
//! precondition failure naming the upstream statistic.

use crate::algorithms::{ComputeError, ProgressReporter};
use crate::graph::Graph;

use super::{rescale, trivial_layout, LayoutOptions, Positions};

/// Place nodes at their precomputed Laplacian coordinates.
pub fn spectral_layout(
    graph: &Graph,
    opts: &LayoutOptions,
    progress: &mut ProgressReporter,
) -> Result<Positions, ComputeError> {
    let ids = graph.sorted_nodes();
    if let Some(done) = trivial_layout(&ids, opts) {
        progress.finish();
        return Ok(done);
    }

    let precomputed = opts.precomputed.as_ref().ok_or_else(|| {
        ComputeError::Precondition(
            "spectral layout requires precomputed coordinates; run the \
             `laplacian_coordinates` statistic first"
                .into(),
        )
    })?;

    let total = ids.len();
    let mut positions = Positions::with_capacity(total);
    for (done, id) in ids.into_iter().enumerate() {
        let point = lookup(precomputed, &id).filter(|p| p.x.is_finite() && p.y.is_finite());
        match point {
            Some(p) => {
                positions.insert(id, *p);
            }
            None => {
                return Err(ComputeError::Precondition(format!(
                    "node `{id}` has no precomputed coordinates; run the \
                     `laplacian_coordinates` statistic first"
                )))
            }
        }
        progress.report_ratio(done + 1, total);
    }

    rescale(&mut positions, opts.scale, &opts.center);
    progress.finish();
    Ok(positions)
}

/// Coordinate lookup tolerant of the JSON boundary: an integer node id that
/// crossed the wire as an object key comes back as its string form.
fn lookup<'a>(precomputed: &'a Positions, id: &crate::graph::NodeId) -> Option<&'a super::Point> {
    use crate::graph::NodeId;
    precomputed.get(id).or_else(|| match id {
        NodeId::Int(n) => precomputed.get(&NodeId::Text(n.to_string())),
        NodeId::Text(_) => None,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;
    use crate::layout::Point;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn triangle() -> Graph {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "c", 1.0);
        g.add_edge("c", "a", 1.0);
        g
    }

    #[test]
    fn test_missing_precomputed_is_precondition_error() {
        let g = triangle();
        let err = spectral_layout(&g, &LayoutOptions::default(), &mut ProgressReporter::disabled())
            .unwrap_err();
        match err {
            ComputeError::Precondition(message) => {
                assert!(
                    message.contains("laplacian_coordinates"),
                    "error must name the missing statistic: {message}"
                );
            }
            other => panic!("expected a precondition error, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_precomputed_names_the_node() {
        let g = triangle();
        let mut precomputed = Positions::new();
        precomputed.insert(id("a"), Point::new(0.0, 0.0));
        precomputed.insert(id("b"), Point::new(1.0, 0.0));
        let opts = LayoutOptions {
            precomputed: Some(precomputed),
            ..LayoutOptions::default()
        };
        let err =
            spectral_layout(&g, &opts, &mut ProgressReporter::disabled()).unwrap_err();
        match err {
            ComputeError::Precondition(message) => assert!(message.contains('c')),
            other => panic!("expected a precondition error, got {other:?}"),
        }
    }

    #[test]
    fn test_places_and_rescales() {
        let g = triangle();
        let mut precomputed = Positions::new();
        precomputed.insert(id("a"), Point::new(0.0, 0.0));
        precomputed.insert(id("b"), Point::new(4.0, 0.0));
        precomputed.insert(id("c"), Point::new(0.0, 4.0));
        let opts = LayoutOptions {
            precomputed: Some(precomputed),
            scale: 2.0,
            ..LayoutOptions::default()
        };
        let positions = spectral_layout(&g, &opts, &mut ProgressReporter::disabled()).unwrap();
        assert_eq!(positions.len(), 3);
        let max_abs = positions
            .values()
            .flat_map(|p| [p.x.abs(), p.y.abs()])
            .fold(0.0_f64, f64::max);
        assert!((max_abs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_integer_ids_accept_stringified_keys() {
        // An integer id that crossed a JSON boundary comes back as a string
        // object key; the lookup must still find it.
        let mut g = Graph::new();
        g.add_edge(1_i64, 2_i64, 1.0);
        g.add_edge(2_i64, 3_i64, 1.0);
        let mut precomputed = Positions::new();
        precomputed.insert(NodeId::from("1"), Point::new(0.0, 0.0));
        precomputed.insert(NodeId::from("2"), Point::new(1.0, 0.0));
        precomputed.insert(NodeId::from("3"), Point::new(2.0, 0.5));
        let opts = LayoutOptions {
            precomputed: Some(precomputed),
            ..LayoutOptions::default()
        };
        let positions = spectral_layout(&g, &opts, &mut ProgressReporter::disabled()).unwrap();
        assert_eq!(positions.len(), 3);
        assert!(positions.contains_key(&NodeId::Int(2)));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let g = triangle();
        let mut precomputed = Positions::new();
        precomputed.insert(id("a"), Point::new(0.0, 0.0));
        precomputed.insert(id("b"), Point::new(1.0, 0.0));
        precomputed.insert(id("c"), Point::new(f64::NAN, 0.0));
        let opts = LayoutOptions {
            precomputed: Some(precomputed),
            ..LayoutOptions::default()
        };
        assert!(spectral_layout(&g, &opts, &mut ProgressReporter::disabled()).is_err());
    }
}
