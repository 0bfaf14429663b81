//! Graph edges and the intersections found along them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::geometry::Position;
use crate::math::{Coord, LineIntersector};
use crate::operations::relate::IntersectionMatrix;

use super::depth::Depth;
use super::label::Label;

/// A point where an edge is intersected.
///
/// Ordered by segment index, then by distance along the segment.
#[derive(Debug, Clone, Copy)]
pub struct EdgeIntersection {
    pub coord: Coord,
    pub segment_index: usize,
    pub dist: f64,
}

#[derive(Debug, Clone, Copy)]
struct IntersectionKey(usize, f64);

impl PartialEq for IntersectionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IntersectionKey {}

impl PartialOrd for IntersectionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IntersectionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0).then_with(|| self.1.total_cmp(&other.1))
    }
}

/// The distinct intersections of an edge, in order along it.
#[derive(Debug, Clone, Default)]
pub struct EdgeIntersectionList {
    nodes: BTreeMap<IntersectionKey, EdgeIntersection>,
}

impl EdgeIntersectionList {
    /// Adds an intersection unless one already exists at the same position.
    pub fn add(&mut self, coord: Coord, segment_index: usize, dist: f64) {
        self.nodes
            .entry(IntersectionKey(segment_index, dist + 0.0))
            .or_insert(EdgeIntersection {
                coord,
                segment_index,
                dist,
            });
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeIntersection> {
        self.nodes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn is_intersection(&self, pt: &Coord) -> bool {
        self.nodes.values().any(|ei| ei.coord == *pt)
    }

    /// Adds the first and last vertices of `pts`.
    pub fn add_endpoints(&mut self, pts: &[Coord]) {
        let Some(last) = pts.len().checked_sub(1) else {
            return;
        };
        self.add(pts[0], 0, 0.0);
        self.add(pts[last], last, 0.0);
    }
}

/// An edge of a topology graph: a noded run of coordinates with a label.
#[derive(Debug, Clone)]
pub struct Edge {
    pts: Vec<Coord>,
    pub label: Label,
    pub depth: Depth,
    pub intersections: EdgeIntersectionList,
    pub isolated: bool,
    pub in_result: bool,
    pub covered: Option<bool>,
}

impl Edge {
    #[must_use]
    pub fn new(pts: Vec<Coord>, label: Label) -> Self {
        Self {
            pts,
            label,
            depth: Depth::new(),
            intersections: EdgeIntersectionList::default(),
            isolated: true,
            in_result: false,
            covered: None,
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    #[must_use]
    pub fn num_points(&self) -> usize {
        self.pts.len()
    }

    #[must_use]
    pub fn coord(&self, i: usize) -> Coord {
        self.pts[i]
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pts.first() == self.pts.last()
    }

    /// An area edge that doubles back on itself (`A-B-A`).
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.label.is_area() && self.pts.len() == 3 && self.pts[0] == self.pts[2]
    }

    /// The line edge a collapsed area edge reduces to.
    #[must_use]
    pub fn collapsed_edge(&self) -> Edge {
        Edge::new(vec![self.pts[0], self.pts[1]], self.label.to_line_label())
    }

    /// `true` if both edges have the same coordinates in the same order.
    #[must_use]
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.pts == other.pts
    }

    /// Records the intersections computed by `li` on segment `segment_index`,
    /// which was input line `geom_index` of the intersector.
    pub fn add_intersections(&mut self, li: &LineIntersector, segment_index: usize, geom_index: usize) {
        for i in 0..li.intersection_num() {
            let (coord, seg, dist) = self.normalize_intersection(li, segment_index, geom_index, i);
            self.intersections.add(coord, seg, dist);
        }
    }

    /// The position along this edge of intersection `int_index` of `li`.
    ///
    /// A point equal to the next vertex is attributed to the next segment.
    #[must_use]
    pub fn normalize_intersection(
        &self,
        li: &LineIntersector,
        segment_index: usize,
        geom_index: usize,
        int_index: usize,
    ) -> (Coord, usize, f64) {
        let coord = li.intersection_point(int_index);
        let next = segment_index + 1;
        if next < self.pts.len() && coord == self.pts[next] {
            return (coord, next, 0.0);
        }
        (coord, segment_index, li.edge_distance(geom_index, int_index))
    }

    /// Records the first and last vertices as intersections.
    pub fn add_endpoint_intersections(&mut self) {
        self.intersections.add_endpoints(&self.pts);
    }

    /// Splits the edge at its intersections, adding the endpoints first.
    ///
    /// Each piece carries a copy of this edge's label.
    pub fn split_edges(&mut self) -> Vec<Edge> {
        self.add_endpoint_intersections();
        let nodes: Vec<EdgeIntersection> = self.intersections.iter().copied().collect();
        nodes
            .windows(2)
            .map(|pair| self.create_split_edge(&pair[0], &pair[1]))
            .collect()
    }

    fn create_split_edge(&self, ei0: &EdgeIntersection, ei1: &EdgeIntersection) -> Edge {
        let last_seg_start = self.pts[ei1.segment_index];
        let use_int_pt1 = ei1.dist > 0.0 || ei1.coord != last_seg_start;

        let mut pts = Vec::with_capacity(ei1.segment_index - ei0.segment_index + 2);
        pts.push(ei0.coord);
        pts.extend_from_slice(&self.pts[ei0.segment_index + 1..=ei1.segment_index]);
        if use_int_pt1 {
            pts.push(ei1.coord);
        }
        Edge::new(pts, self.label)
    }

    /// Raises `im` for the locations recorded in `label`.
    pub fn update_im(label: &Label, im: &mut IntersectionMatrix) {
        im.set_at_least_if_valid(label.on_location(0), label.on_location(1), 1);
        if label.is_area() {
            for pos in [Position::Left, Position::Right] {
                im.set_at_least_if_valid(label.location(0, pos), label.location(1, pos), 2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Location;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn intersections_are_deduplicated_and_ordered() {
        let mut list = EdgeIntersectionList::default();
        list.add(c(2.0, 0.0), 1, 1.0);
        list.add(c(0.5, 0.0), 0, 0.5);
        list.add(c(2.0, 0.0), 1, 1.0);
        let segs: Vec<usize> = list.iter().map(|ei| ei.segment_index).collect();
        assert_eq!(segs, vec![0, 1]);
    }

    #[test]
    fn split_at_interior_intersection() {
        let label = Label::on(0, Location::Interior);
        let mut edge = Edge::new(vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)], label);
        edge.intersections.add(c(2.0, 0.0), 0, 2.0);
        let parts = edge.split_edges();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].coords(), &[c(0.0, 0.0), c(2.0, 0.0)]);
        assert_eq!(parts[1].coords(), &[c(2.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)]);
        assert_eq!(parts[1].label, label);
    }

    #[test]
    fn split_at_vertex_does_not_duplicate_it() {
        let mut edge = Edge::new(
            vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)],
            Label::on(0, Location::Interior),
        );
        edge.intersections.add(c(4.0, 0.0), 1, 0.0);
        let parts = edge.split_edges();
        assert_eq!(parts[0].coords(), &[c(0.0, 0.0), c(4.0, 0.0)]);
        assert_eq!(parts[1].coords(), &[c(4.0, 0.0), c(4.0, 4.0)]);
    }

    #[test]
    fn collapsed_area_edge_becomes_line() {
        let edge = Edge::new(
            vec![c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)],
            Label::area(0, Location::Boundary, Location::Exterior, Location::Interior),
        );
        assert!(edge.is_collapsed());
        let line = edge.collapsed_edge();
        assert!(line.label.is_line(0));
        assert_eq!(line.num_points(), 2);
    }
}
