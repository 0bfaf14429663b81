use std::cmp::Ordering;

use super::octant::{compare_along_segment, segment_octant};
use crate::math::{Coord, LineIntersector};

/// A node on a segment string: a point plus the index of the segment it
/// lies on.
#[derive(Debug, Clone, Copy)]
pub struct SegmentNode {
    pub coord: Coord,
    pub segment_index: usize,
    octant: u8,
    interior: bool,
}

impl SegmentNode {
    /// Returns `true` if the node is not at the start vertex of its segment.
    #[must_use]
    pub fn is_interior(&self) -> bool {
        self.interior
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| compare_along_segment(self.octant, &self.coord, &other.coord))
    }
}

/// A line string being noded, with the nodes found on it so far.
///
/// `context` is an opaque caller-defined tag carried into every substring.
#[derive(Debug, Clone)]
pub struct NodedSegmentString {
    coords: Vec<Coord>,
    context: usize,
    nodes: Vec<SegmentNode>,
}

impl NodedSegmentString {
    #[must_use]
    pub fn new(coords: Vec<Coord>, context: usize) -> Self {
        Self {
            coords,
            context,
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[must_use]
    pub fn context(&self) -> usize {
        self.context
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.coords.is_empty() && self.coords[0] == self.coords[self.coords.len() - 1]
    }

    /// The nodes recorded so far, unsorted.
    #[must_use]
    pub fn nodes(&self) -> &[SegmentNode] {
        &self.nodes
    }

    fn octant_of(&self, segment_index: usize) -> u8 {
        if segment_index + 1 >= self.coords.len() {
            return 0;
        }
        segment_octant(&self.coords[segment_index], &self.coords[segment_index + 1])
    }

    /// Records every intersection point of the last computation of `li`
    /// on segment `segment_index` of this string.
    pub fn add_intersections(&mut self, li: &LineIntersector, segment_index: usize) {
        for pt in li.intersection_points() {
            self.add_intersection(pt, segment_index);
        }
    }

    /// Records a node at `pt`, which lies on segment `segment_index`.
    ///
    /// A point equal to the next vertex is moved onto the next segment so
    /// that every node has a single representation.
    pub fn add_intersection(&mut self, pt: Coord, segment_index: usize) {
        let mut normalized = segment_index;
        let next = segment_index + 1;
        if next < self.coords.len() && pt == self.coords[next] {
            normalized = next;
        }
        self.add_node(pt, normalized);
    }

    fn add_node(&mut self, coord: Coord, segment_index: usize) {
        let interior = self
            .coords
            .get(segment_index)
            .is_some_and(|start| *start != coord);
        self.nodes.push(SegmentNode {
            coord,
            segment_index,
            octant: self.octant_of(segment_index),
            interior,
        });
    }

    /// Adds nodes where the string doubles back on itself (`A-B-A`), so
    /// that the collapsed spike is split off at its tip.
    fn add_collapsed_nodes(&mut self) {
        let collapsed: Vec<usize> = (0..self.coords.len().saturating_sub(2))
            .filter(|&i| self.coords[i] == self.coords[i + 2])
            .map(|i| i + 1)
            .collect();
        for index in collapsed {
            self.add_node(self.coords[index], index);
        }
    }

    /// Returns the nodes in order along the string, without duplicates,
    /// including both endpoints.
    #[must_use]
    pub fn sorted_nodes(&self) -> Vec<SegmentNode> {
        let mut nodes = self.nodes.clone();
        if !self.coords.is_empty() {
            let last = self.coords.len() - 1;
            nodes.push(SegmentNode {
                coord: self.coords[0],
                segment_index: 0,
                octant: self.octant_of(0),
                interior: false,
            });
            nodes.push(SegmentNode {
                coord: self.coords[last],
                segment_index: last,
                octant: 0,
                interior: false,
            });
        }
        nodes.sort_by(SegmentNode::compare);
        nodes.dedup_by(|a, b| a.compare(b) == Ordering::Equal);
        nodes
    }

    /// Splits the string at every node.
    #[must_use]
    pub fn split(&self) -> Vec<NodedSegmentString> {
        let mut working = self.clone();
        working.add_collapsed_nodes();
        let nodes = working.sorted_nodes();
        nodes
            .windows(2)
            .map(|pair| NodedSegmentString::new(self.split_coords(&pair[0], &pair[1]), self.context))
            .collect()
    }

    fn split_coords(&self, n0: &SegmentNode, n1: &SegmentNode) -> Vec<Coord> {
        let last_seg_start = self.coords[n1.segment_index];
        let use_n1 = n1.interior || n1.coord != last_seg_start;

        let mut pts = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
        pts.push(n0.coord);
        pts.extend_from_slice(&self.coords[n0.segment_index + 1..=n1.segment_index]);
        if use_n1 {
            pts.push(n1.coord);
        }
        pts
    }
}

/// Splits every string at its nodes.
#[must_use]
pub fn noded_substrings(strings: &[NodedSegmentString]) -> Vec<NodedSegmentString> {
    strings.iter().flat_map(NodedSegmentString::split).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn split_at_interior_nodes() {
        let mut ss = NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)], 7);
        ss.add_intersection(c(5.0, 0.0), 0);
        ss.add_intersection(c(10.0, 5.0), 1);
        let parts = ss.split();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].coords(), &[c(0.0, 0.0), c(5.0, 0.0)]);
        assert_eq!(parts[1].coords(), &[c(5.0, 0.0), c(10.0, 0.0), c(10.0, 5.0)]);
        assert_eq!(parts[2].coords(), &[c(10.0, 5.0), c(10.0, 10.0)]);
        assert!(parts.iter().all(|p| p.context() == 7));
    }

    #[test]
    fn node_at_vertex_is_normalized_to_next_segment() {
        let mut ss = NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)], 0);
        ss.add_intersection(c(10.0, 0.0), 0);
        assert_eq!(ss.nodes()[0].segment_index, 1);
        assert!(!ss.nodes()[0].is_interior());
        let parts = ss.split();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].coords(), &[c(0.0, 0.0), c(10.0, 0.0)]);
    }

    #[test]
    fn duplicate_nodes_collapse() {
        let mut ss = NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0)], 0);
        ss.add_intersection(c(3.0, 0.0), 0);
        ss.add_intersection(c(3.0, 0.0), 0);
        ss.add_intersection(c(6.0, 0.0), 0);
        assert_eq!(ss.sorted_nodes().len(), 4);
        assert_eq!(ss.split().len(), 3);
    }

    #[test]
    fn unnoded_string_is_returned_whole() {
        let ss = NodedSegmentString::new(vec![c(0.0, 0.0), c(1.0, 1.0), c(2.0, 0.0)], 0);
        let parts = ss.split();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].coords(), ss.coords());
    }

    #[test]
    fn collapsed_spike_is_split_at_tip() {
        let ss = NodedSegmentString::new(vec![c(0.0, 0.0), c(5.0, 0.0), c(0.0, 0.0)], 0);
        let parts = ss.split();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].coords(), &[c(0.0, 0.0), c(5.0, 0.0)]);
    }
}
