use super::segment_string::NodedSegmentString;
use crate::math::{Coord, LineIntersector};

/// A node to be added to string `string` on segment `segment_index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingNode {
    pub string: usize,
    pub segment_index: usize,
    pub coord: Coord,
}

/// Processes candidate segment pairs found by a noder.
///
/// Implementations push the nodes they want added onto `nodes`; the noder
/// applies them once the search is complete.
pub trait SegmentIntersector {
    fn process_intersections(
        &mut self,
        strings: &[NodedSegmentString],
        string0: usize,
        segment0: usize,
        string1: usize,
        segment1: usize,
        nodes: &mut Vec<PendingNode>,
    );

    /// Returns `true` once no further pairs need to be processed.
    fn is_done(&self) -> bool {
        false
    }
}

fn push_intersections(li: &LineIntersector, string: usize, segment_index: usize, nodes: &mut Vec<PendingNode>) {
    nodes.extend(li.intersection_points().map(|coord| PendingNode {
        string,
        segment_index,
        coord,
    }));
}

/// Records every non-trivial intersection as a node on both strings.
#[derive(Debug, Clone, Default)]
pub struct IntersectionAdder {
    li: LineIntersector,
    has_intersection: bool,
    has_proper: bool,
    has_interior: bool,
    pub num_tests: usize,
    pub num_intersections: usize,
    pub num_interior_intersections: usize,
    pub num_proper_intersections: usize,
}

impl IntersectionAdder {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.has_intersection
    }

    #[must_use]
    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    #[must_use]
    pub fn has_interior_intersection(&self) -> bool {
        self.has_interior
    }

    /// An intersection is trivial when it is the shared vertex of adjacent
    /// segments of one string (including the closing vertex of a ring).
    fn is_trivial_intersection(
        &self,
        strings: &[NodedSegmentString],
        string0: usize,
        segment0: usize,
        string1: usize,
        segment1: usize,
    ) -> bool {
        if string0 != string1 || self.li.intersection_num() != 1 {
            return false;
        }
        if segment0.abs_diff(segment1) == 1 {
            return true;
        }
        let ss = &strings[string0];
        if ss.is_closed() {
            let max_segment = ss.len() - 2;
            if (segment0 == 0 && segment1 == max_segment) || (segment1 == 0 && segment0 == max_segment) {
                return true;
            }
        }
        false
    }
}

impl SegmentIntersector for IntersectionAdder {
    fn process_intersections(
        &mut self,
        strings: &[NodedSegmentString],
        string0: usize,
        segment0: usize,
        string1: usize,
        segment1: usize,
        nodes: &mut Vec<PendingNode>,
    ) {
        if string0 == string1 && segment0 == segment1 {
            return;
        }
        self.num_tests += 1;
        let p = strings[string0].coords();
        let q = strings[string1].coords();
        self.li
            .compute_intersection(&p[segment0], &p[segment0 + 1], &q[segment1], &q[segment1 + 1]);
        if !self.li.has_intersection() {
            return;
        }

        self.num_intersections += 1;
        if self.li.is_interior_intersection() {
            self.num_interior_intersections += 1;
            self.has_interior = true;
        }
        if !self.is_trivial_intersection(strings, string0, segment0, string1, segment1) {
            self.has_intersection = true;
            push_intersections(&self.li, string0, segment0, nodes);
            push_intersections(&self.li, string1, segment1, nodes);
            if self.li.is_proper() {
                self.num_proper_intersections += 1;
                self.has_proper = true;
            }
        }
    }
}

/// Collects interior intersection points and nodes both strings at them.
#[derive(Debug, Clone, Default)]
pub struct InteriorIntersectionFinder {
    li: LineIntersector,
    interior_intersections: Vec<Coord>,
}

impl InteriorIntersectionFinder {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            interior_intersections: Vec::new(),
        }
    }

    /// The interior intersection points found so far.
    #[must_use]
    pub fn interior_intersections(&self) -> &[Coord] {
        &self.interior_intersections
    }
}

impl SegmentIntersector for InteriorIntersectionFinder {
    fn process_intersections(
        &mut self,
        strings: &[NodedSegmentString],
        string0: usize,
        segment0: usize,
        string1: usize,
        segment1: usize,
        nodes: &mut Vec<PendingNode>,
    ) {
        if string0 == string1 && segment0 == segment1 {
            return;
        }
        let p = strings[string0].coords();
        let q = strings[string1].coords();
        self.li
            .compute_intersection(&p[segment0], &p[segment0 + 1], &q[segment1], &q[segment1 + 1]);
        if self.li.has_intersection() && self.li.is_interior_intersection() {
            self.interior_intersections.extend(self.li.intersection_points());
            push_intersections(&self.li, string0, segment0, nodes);
            push_intersections(&self.li, string1, segment1, nodes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn adder_records_crossing_on_both_strings() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 10.0)], 0),
            NodedSegmentString::new(vec![c(0.0, 10.0), c(10.0, 0.0)], 1),
        ];
        let mut adder = IntersectionAdder::default();
        let mut nodes = Vec::new();
        adder.process_intersections(&strings, 0, 0, 1, 0, &mut nodes);
        assert!(adder.has_proper_intersection());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].string, 0);
        assert_eq!(nodes[1].string, 1);
        assert_eq!(nodes[0].coord, c(5.0, 5.0));
    }

    #[test]
    fn adjacent_segments_are_trivial() {
        let strings = vec![NodedSegmentString::new(
            vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 0.0)],
            0,
        )];
        let mut adder = IntersectionAdder::default();
        let mut nodes = Vec::new();
        adder.process_intersections(&strings, 0, 0, 0, 1, &mut nodes);
        adder.process_intersections(&strings, 0, 0, 0, 2, &mut nodes);
        assert!(nodes.is_empty());
        assert!(!adder.has_intersection());
        assert_eq!(adder.num_intersections, 2);
    }

    #[test]
    fn finder_ignores_endpoint_touches() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0)], 0),
            NodedSegmentString::new(vec![c(10.0, 0.0), c(10.0, 10.0)], 1),
            NodedSegmentString::new(vec![c(5.0, -5.0), c(5.0, 5.0)], 2),
        ];
        let mut finder = InteriorIntersectionFinder::default();
        let mut nodes = Vec::new();
        finder.process_intersections(&strings, 0, 0, 1, 0, &mut nodes);
        assert!(finder.interior_intersections().is_empty());
        finder.process_intersections(&strings, 0, 0, 2, 0, &mut nodes);
        assert_eq!(finder.interior_intersections(), &[c(5.0, 0.0)]);
    }
}
