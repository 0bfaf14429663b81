use crate::geometry::{Geometry, GeometryFactory};
use crate::math::Coord;
use crate::topology::{DirEdgeId, EdgeId, PlanarGraph};

use super::select::{is_label_in_result, OverlayOpCode};

/// Collects the result line edges of an overlay graph.
///
/// `is_covered_by_area` tells whether a point lies in the result polygons
/// already built, for line edges whose coverage could not be read off
/// the node stars.
pub fn build_lines(
    graph: &mut PlanarGraph,
    op: OverlayOpCode,
    factory: &GeometryFactory,
    is_covered_by_area: impl Fn(&Coord) -> bool,
) -> Vec<Geometry> {
    find_covered_line_edges(graph, is_covered_by_area);

    let mut line_edges: Vec<EdgeId> = Vec::new();
    for de in graph.dir_edge_ids().to_vec() {
        if collect_line_edge(graph, de, op) || collect_boundary_touch_edge(graph, de, op) {
            line_edges.push(graph.dir_edge(de).edge);
            set_visited_edge(graph, de);
        }
    }

    line_edges
        .into_iter()
        .map(|edge| {
            let e = graph.edge_mut(edge);
            e.in_result = true;
            factory.create_line_string(e.coords().to_vec())
        })
        .collect()
}

fn find_covered_line_edges(graph: &mut PlanarGraph, is_covered_by_area: impl Fn(&Coord) -> bool) {
    for node in graph.node_ids() {
        graph.find_covered_line_edges(node);
    }
    for de in graph.dir_edge_ids().to_vec() {
        let dir_edge = graph.dir_edge(de);
        if !dir_edge.is_line_edge() || graph.parent(de).covered.is_some() {
            continue;
        }
        let covered = is_covered_by_area(&dir_edge.coordinate());
        let edge = dir_edge.edge;
        graph.edge_mut(edge).covered = Some(covered);
    }
}

fn collect_line_edge(graph: &PlanarGraph, de: DirEdgeId, op: OverlayOpCode) -> bool {
    let dir_edge = graph.dir_edge(de);
    dir_edge.is_line_edge()
        && !dir_edge.visited
        && is_label_in_result(dir_edge.label(), op)
        && graph.parent(de).covered != Some(true)
}

/// An area edge that is in the result only as the touching boundary of
/// two intersected areas.
fn collect_boundary_touch_edge(graph: &PlanarGraph, de: DirEdgeId, op: OverlayOpCode) -> bool {
    let dir_edge = graph.dir_edge(de);
    if dir_edge.is_line_edge() || dir_edge.visited || dir_edge.is_interior_area_edge() {
        return false;
    }
    if graph.parent(de).in_result {
        return false;
    }
    op == OverlayOpCode::Intersection && is_label_in_result(dir_edge.label(), op)
}

fn set_visited_edge(graph: &mut PlanarGraph, de: DirEdgeId) {
    let sym = graph.sym(de);
    graph.dir_edge_mut(de).visited = true;
    graph.dir_edge_mut(sym).visited = true;
}
