use crate::geometry::{Geometry, GeometryFactory};
use crate::math::Coord;
use crate::topology::PlanarGraph;

use super::select::{is_label_in_result, OverlayOpCode};

/// Collects result points: nodes in the result that are not already
/// part of a result line or area.
///
/// Only isolated nodes can contribute, except for intersection where two
/// geometries may touch at a single node of a larger star.
pub fn build_points(
    graph: &PlanarGraph,
    op: OverlayOpCode,
    factory: &GeometryFactory,
    is_covered_by_line_or_area: impl Fn(&Coord) -> bool,
) -> Vec<Geometry> {
    graph
        .node_ids()
        .into_iter()
        .filter(|id| !graph.is_incident_edge_in_result(*id))
        .map(|id| graph.node(id))
        .filter(|node| node.star.is_empty() || op == OverlayOpCode::Intersection)
        .filter(|node| is_label_in_result(&node.label, op))
        .filter(|node| !is_covered_by_line_or_area(&node.coord))
        .map(|node| factory.create_point(node.coord))
        .collect()
}
