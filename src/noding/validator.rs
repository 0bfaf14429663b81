use std::collections::BTreeSet;

use tracing::warn;

use super::chain::ChainIndex;
use super::segment_string::NodedSegmentString;
use crate::error::{Result, TopologyError};
use crate::math::{Coord, CoordKey, LineIntersector};

/// Checks that a set of noded strings is correctly noded.
pub struct NodingValidator<'a> {
    strings: &'a [NodedSegmentString],
}

impl<'a> NodingValidator<'a> {
    #[must_use]
    pub fn new(strings: &'a [NodedSegmentString]) -> Self {
        Self { strings }
    }

    /// Runs every check: collapses, interior intersections and endpoints
    /// touching interior vertices.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` locating the first defect found.
    pub fn check_valid(&self) -> Result<()> {
        self.check_collapses()?;
        self.check_interior_intersections()?;
        self.check_endpoint_vertex_intersections()
    }

    /// Fails if any string doubles back on itself (`A-B-A`).
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::Invalid` at the collapsed vertex.
    pub fn check_collapses(&self) -> Result<()> {
        for ss in self.strings {
            let pts = ss.coords();
            for i in 0..pts.len().saturating_sub(2) {
                if pts[i] == pts[i + 2] {
                    return Err(TopologyError::invalid("found non-noded collapse", Some(pts[i + 1])).into());
                }
            }
        }
        Ok(())
    }

    /// Fails if two segments intersect at a point interior to either.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NonNodedIntersection` at the intersection.
    pub fn check_interior_intersections(&self) -> Result<()> {
        let coords: Vec<&[Coord]> = self.strings.iter().map(NodedSegmentString::coords).collect();
        let index = ChainIndex::new(&coords);
        let mut li = LineIntersector::new();
        for (s0, i0, s1, i1) in index.candidate_pairs(&coords) {
            if s0 == s1 && i0 == i1 {
                continue;
            }
            let (p0, p1) = (coords[s0][i0], coords[s0][i0 + 1]);
            let (q0, q1) = (coords[s1][i1], coords[s1][i1 + 1]);
            li.compute_intersection(&p0, &p1, &q0, &q1);
            if li.has_intersection() && (li.is_proper() || li.is_interior_intersection()) {
                let at = li.intersection_point(0);
                warn!(x = at.x, y = at.y, "non-noded intersection");
                return Err(TopologyError::NonNodedIntersection { coordinate: Some(at) }.into());
            }
        }
        Ok(())
    }

    /// Fails if the endpoint of one string is an interior vertex of another.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NonNodedIntersection` at the shared point.
    pub fn check_endpoint_vertex_intersections(&self) -> Result<()> {
        let endpoints: BTreeSet<CoordKey> = self
            .strings
            .iter()
            .filter(|ss| !ss.is_empty())
            .flat_map(|ss| [CoordKey(ss.coords()[0]), CoordKey(ss.coords()[ss.len() - 1])])
            .collect();
        for ss in self.strings {
            let pts = ss.coords();
            if pts.len() < 3 {
                continue;
            }
            if let Some(p) = pts[1..pts.len() - 1].iter().find(|p| endpoints.contains(&CoordKey(**p))) {
                return Err(TopologyError::NonNodedIntersection { coordinate: Some(*p) }.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn properly_noded_strings_pass() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(5.0, 5.0)], 0),
            NodedSegmentString::new(vec![c(5.0, 5.0), c(10.0, 10.0)], 0),
            NodedSegmentString::new(vec![c(0.0, 10.0), c(5.0, 5.0)], 1),
        ];
        assert!(NodingValidator::new(&strings).check_valid().is_ok());
    }

    #[test]
    fn crossing_strings_fail() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 10.0)], 0),
            NodedSegmentString::new(vec![c(0.0, 10.0), c(10.0, 0.0)], 1),
        ];
        let err = NodingValidator::new(&strings).check_valid().unwrap_err();
        assert!(err.is_topology());
        assert!(err.to_string().contains("non-noded"));
    }

    #[test]
    fn endpoint_on_interior_vertex_fails() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(5.0, 0.0), c(10.0, 0.0)], 0),
            NodedSegmentString::new(vec![c(5.0, 0.0), c(5.0, 5.0)], 1),
        ];
        let validator = NodingValidator::new(&strings);
        assert!(validator.check_interior_intersections().is_ok());
        assert!(validator.check_endpoint_vertex_intersections().is_err());
    }

    #[test]
    fn collapse_fails() {
        let strings = vec![NodedSegmentString::new(vec![c(0.0, 0.0), c(5.0, 0.0), c(0.0, 0.0)], 0)];
        assert!(NodingValidator::new(&strings).check_collapses().is_err());
    }
}
