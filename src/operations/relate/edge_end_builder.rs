use crate::topology::{Edge, EdgeEnd, EdgeIntersection};

/// Creates the edge ends of noded edges: for every intersection along an
/// edge, one end pointing backwards along the edge and one pointing
/// forwards.
///
/// The backward end carries the edge label flipped. Endpoints are added
/// to each edge's intersection list first.
pub fn compute_edge_ends(edges: &mut [Edge]) -> Vec<EdgeEnd> {
    let mut ends = Vec::new();
    for edge in edges.iter_mut() {
        edge.add_endpoint_intersections();
        let nodes: Vec<EdgeIntersection> = edge.intersections.iter().copied().collect();
        for (i, curr) in nodes.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| &nodes[p]);
            let next = nodes.get(i + 1);
            if let Some(end) = edge_end_for_prev(edge, curr, prev) {
                ends.push(end);
            }
            if let Some(end) = edge_end_for_next(edge, curr, next) {
                ends.push(end);
            }
        }
    }
    ends
}

fn edge_end_for_prev(edge: &Edge, curr: &EdgeIntersection, prev: Option<&EdgeIntersection>) -> Option<EdgeEnd> {
    let mut i_prev = curr.segment_index;
    if curr.dist == 0.0 {
        // at the start of the edge
        if i_prev == 0 {
            return None;
        }
        i_prev -= 1;
    }
    let mut p_prev = edge.coord(i_prev);
    if let Some(prev) = prev {
        if prev.segment_index >= i_prev {
            p_prev = prev.coord;
        }
    }
    if p_prev == curr.coord {
        return None;
    }
    Some(EdgeEnd::new(curr.coord, p_prev, edge.label.flipped()))
}

fn edge_end_for_next(edge: &Edge, curr: &EdgeIntersection, next: Option<&EdgeIntersection>) -> Option<EdgeEnd> {
    let i_next = curr.segment_index + 1;
    if i_next >= edge.num_points() && next.is_none() {
        return None;
    }
    let mut p_next = edge.coords().get(i_next).copied()?;
    if let Some(next) = next {
        if next.segment_index == curr.segment_index {
            p_next = next.coord;
        }
    }
    if p_next == curr.coord {
        return None;
    }
    Some(EdgeEnd::new(curr.coord, p_next, edge.label))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Location, Position};
    use crate::math::Coord;
    use crate::topology::Label;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn unsplit_edge_has_two_ends() {
        let mut edges = vec![Edge::new(
            vec![c(0.0, 0.0), c(5.0, 0.0), c(5.0, 5.0)],
            Label::on(0, Location::Interior),
        )];
        let ends = compute_edge_ends(&mut edges);
        assert_eq!(ends.len(), 2);
        assert_eq!(ends[0].coordinate(), c(0.0, 0.0));
        assert_eq!(ends[0].directed_coordinate(), c(5.0, 0.0));
        assert_eq!(ends[1].coordinate(), c(5.0, 5.0));
        assert_eq!(ends[1].directed_coordinate(), c(5.0, 0.0));
    }

    #[test]
    fn interior_intersection_adds_two_ends() {
        let mut edges = vec![Edge::new(
            vec![c(0.0, 0.0), c(10.0, 0.0)],
            Label::area(0, Location::Boundary, Location::Exterior, Location::Interior),
        )];
        edges[0].intersections.add(c(4.0, 0.0), 0, 4.0);
        let ends = compute_edge_ends(&mut edges);
        assert_eq!(ends.len(), 4);
        let at_node: Vec<&EdgeEnd> = ends.iter().filter(|e| e.coordinate() == c(4.0, 0.0)).collect();
        assert_eq!(at_node.len(), 2);
        let backward = at_node.iter().find(|e| e.directed_coordinate() == c(0.0, 0.0)).unwrap();
        assert_eq!(backward.label.location(0, Position::Left), Some(Location::Interior));
    }
}
