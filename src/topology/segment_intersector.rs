//! Intersection of the edges of geometry graphs.

use tracing::trace;

use crate::math::{Coord, LineIntersector};
use crate::noding::ChainIndex;

use super::edge::Edge;

/// An intersection found on edge `edge` of edge set `set`, waiting to be
/// recorded on that edge.
#[derive(Debug, Clone, Copy)]
struct PendingIntersection {
    set: usize,
    edge: usize,
    coord: Coord,
    segment_index: usize,
    dist: f64,
}

/// Computes intersections between graph edges and records them on the
/// edges, tracking whether any proper intersection was found.
#[derive(Debug, Clone)]
pub struct EdgeSegmentIntersector {
    li: LineIntersector,
    include_proper: bool,
    record_isolated: bool,
    boundary_nodes: [Vec<Coord>; 2],
    has_intersection: bool,
    has_proper: bool,
    has_proper_interior: bool,
    proper_intersection_point: Option<Coord>,
    pub num_tests: usize,
    pub num_intersections: usize,
    pending: Vec<PendingIntersection>,
    touched: Vec<(usize, usize)>,
}

impl EdgeSegmentIntersector {
    /// Creates an intersector.
    ///
    /// Proper intersections are only recorded on the edges when
    /// `include_proper` is set; they are always counted. With
    /// `record_isolated`, every edge taking part in an intersection is
    /// marked as not isolated.
    #[must_use]
    pub fn new(li: LineIntersector, include_proper: bool, record_isolated: bool) -> Self {
        Self {
            li,
            include_proper,
            record_isolated,
            boundary_nodes: [Vec::new(), Vec::new()],
            has_intersection: false,
            has_proper: false,
            has_proper_interior: false,
            proper_intersection_point: None,
            num_tests: 0,
            num_intersections: 0,
            pending: Vec::new(),
            touched: Vec::new(),
        }
    }

    /// Boundary nodes of both geometries; a proper intersection at one of
    /// them is not a proper interior intersection.
    #[must_use]
    pub fn with_boundary_nodes(mut self, nodes0: Vec<Coord>, nodes1: Vec<Coord>) -> Self {
        self.boundary_nodes = [nodes0, nodes1];
        self
    }

    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.has_intersection
    }

    #[must_use]
    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    /// `true` if a proper intersection was found that is not a boundary
    /// node of either geometry.
    #[must_use]
    pub fn has_proper_interior_intersection(&self) -> bool {
        self.has_proper_interior
    }

    #[must_use]
    pub fn proper_intersection_point(&self) -> Option<Coord> {
        self.proper_intersection_point
    }

    fn is_trivial_intersection(&self, same_edge: bool, edge: &Edge, seg0: usize, seg1: usize) -> bool {
        if !same_edge || self.li.intersection_num() != 1 {
            return false;
        }
        if seg0.abs_diff(seg1) == 1 {
            return true;
        }
        if edge.is_closed() {
            let max_seg = edge.num_points() - 2;
            if (seg0 == 0 && seg1 == max_seg) || (seg1 == 0 && seg0 == max_seg) {
                return true;
            }
        }
        false
    }

    fn is_boundary_point(&self) -> bool {
        self.boundary_nodes
            .iter()
            .flatten()
            .any(|node| self.li.is_intersection(node))
    }

    fn add_intersections(&mut self, a: (usize, usize, &Edge), seg0: usize, b: (usize, usize, &Edge), seg1: usize) {
        let (set0, idx0, e0) = a;
        let (set1, idx1, e1) = b;
        let same_edge = set0 == set1 && idx0 == idx1;
        if same_edge && seg0 == seg1 {
            return;
        }
        self.num_tests += 1;
        let (p00, p01) = (e0.coord(seg0), e0.coord(seg0 + 1));
        let (p10, p11) = (e1.coord(seg1), e1.coord(seg1 + 1));
        self.li.compute_intersection(&p00, &p01, &p10, &p11);
        if !self.li.has_intersection() {
            return;
        }
        if self.record_isolated {
            self.touched.push((set0, idx0));
            self.touched.push((set1, idx1));
        }
        self.num_intersections += 1;
        if self.is_trivial_intersection(same_edge, e0, seg0, seg1) {
            return;
        }
        self.has_intersection = true;
        if self.include_proper || !self.li.is_proper() {
            for i in 0..self.li.intersection_num() {
                let (coord, segment_index, dist) = e0.normalize_intersection(&self.li, seg0, 0, i);
                self.pending.push(PendingIntersection {
                    set: set0,
                    edge: idx0,
                    coord,
                    segment_index,
                    dist,
                });
                let (coord, segment_index, dist) = e1.normalize_intersection(&self.li, seg1, 1, i);
                self.pending.push(PendingIntersection {
                    set: set1,
                    edge: idx1,
                    coord,
                    segment_index,
                    dist,
                });
            }
        }
        if self.li.is_proper() {
            self.proper_intersection_point = Some(self.li.intersection_point(0));
            self.has_proper = true;
            if !self.is_boundary_point() {
                self.has_proper_interior = true;
            }
        }
    }

    /// Intersects the edges of one set with each other.
    ///
    /// Unless `test_all_segments` is set, segments of the same edge are
    /// not tested against each other.
    pub fn compute_self(&mut self, edges: &mut [Edge], test_all_segments: bool) {
        let coords: Vec<&[Coord]> = edges.iter().map(Edge::coords).collect();
        let index = ChainIndex::new(&coords);
        let pairs = index.candidate_pairs(&coords);
        trace!(edges = edges.len(), pairs = pairs.len(), "self intersection");
        for (s0, seg0, s1, seg1) in pairs {
            if s0 == s1 && !test_all_segments {
                continue;
            }
            self.add_intersections((0, s0, &edges[s0]), seg0, (0, s1, &edges[s1]), seg1);
        }
        self.apply(&mut [edges]);
    }

    /// Intersects every edge of `edges0` with every edge of `edges1`.
    pub fn compute_between(&mut self, edges0: &mut [Edge], edges1: &mut [Edge]) {
        let n0 = edges0.len();
        let coords: Vec<&[Coord]> = edges0.iter().chain(edges1.iter()).map(Edge::coords).collect();
        let index = ChainIndex::new(&coords);
        let pairs = index.candidate_pairs(&coords);
        trace!(edges0 = n0, edges1 = edges1.len(), pairs = pairs.len(), "edge intersection");
        for (s0, seg0, s1, seg1) in pairs {
            match (s0 < n0, s1 < n0) {
                (true, false) => {
                    self.add_intersections((0, s0, &edges0[s0]), seg0, (1, s1 - n0, &edges1[s1 - n0]), seg1);
                }
                (false, true) => {
                    self.add_intersections((0, s1, &edges0[s1]), seg1, (1, s0 - n0, &edges1[s0 - n0]), seg0);
                }
                _ => {}
            }
        }
        self.apply(&mut [edges0, edges1]);
    }

    fn apply(&mut self, sets: &mut [&mut [Edge]]) {
        for p in self.pending.drain(..) {
            sets[p.set][p.edge].intersections.add(p.coord, p.segment_index, p.dist);
        }
        for (set, edge) in self.touched.drain(..) {
            sets[set][edge].isolated = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Location;
    use crate::topology::Label;

    fn edge(pts: &[(f64, f64)]) -> Edge {
        Edge::new(
            pts.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
            Label::on(0, Location::Interior),
        )
    }

    #[test]
    fn crossing_edges_record_proper_intersection() {
        let mut a = vec![edge(&[(0.0, 0.0), (10.0, 10.0)])];
        let mut b = vec![edge(&[(0.0, 10.0), (10.0, 0.0)])];
        let mut si = EdgeSegmentIntersector::new(LineIntersector::new(), true, true);
        si.compute_between(&mut a, &mut b);
        assert!(si.has_proper_intersection());
        assert!(si.has_proper_interior_intersection());
        assert_eq!(si.proper_intersection_point(), Some(Coord::new(5.0, 5.0)));
        assert_eq!(a[0].intersections.len(), 1);
        assert!(!a[0].isolated && !b[0].isolated);
    }

    #[test]
    fn proper_intersections_can_be_left_unrecorded() {
        let mut a = vec![edge(&[(0.0, 0.0), (10.0, 10.0)])];
        let mut b = vec![edge(&[(0.0, 10.0), (10.0, 0.0)])];
        let mut si = EdgeSegmentIntersector::new(LineIntersector::new(), false, true);
        si.compute_between(&mut a, &mut b);
        assert!(si.has_proper_intersection());
        assert!(a[0].intersections.is_empty());
    }

    #[test]
    fn proper_intersection_at_boundary_node_is_not_interior() {
        let mut a = vec![edge(&[(0.0, 0.0), (10.0, 10.0)])];
        let mut b = vec![edge(&[(0.0, 10.0), (10.0, 0.0)])];
        let mut si = EdgeSegmentIntersector::new(LineIntersector::new(), true, false)
            .with_boundary_nodes(vec![Coord::new(5.0, 5.0)], Vec::new());
        si.compute_between(&mut a, &mut b);
        assert!(si.has_proper_intersection());
        assert!(!si.has_proper_interior_intersection());
    }

    #[test]
    fn adjacent_segments_are_trivial() {
        let mut edges = vec![edge(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)])];
        let mut si = EdgeSegmentIntersector::new(LineIntersector::new(), true, false);
        si.compute_self(&mut edges, true);
        assert!(!si.has_intersection());
        assert!(edges[0].intersections.is_empty());
    }

    #[test]
    fn self_crossing_edge_is_noded() {
        let mut edges = vec![edge(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)])];
        let mut si = EdgeSegmentIntersector::new(LineIntersector::new(), true, false);
        si.compute_self(&mut edges, true);
        assert!(si.has_intersection());
        assert_eq!(edges[0].intersections.len(), 2);
    }
}
