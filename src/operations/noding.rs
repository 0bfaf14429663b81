use tracing::debug;

use crate::error::Result;
use crate::geometry::{Geometry, GeometryFactory};
use crate::math::{LineIntersector, PrecisionModel};
use crate::noding::{IntersectionAdder, McIndexNoder, NodedSegmentString, Noder, NodingValidator, ScaledNoder, SnapRoundingNoder};

/// Nodes the linework of a set of geometries, splitting every line and
/// ring at each point where it meets another.
///
/// Floating precision models intersect the linework exactly and check
/// the result; fixed models snap-round it onto the grid.
pub struct GeometryNoder {
    factory: GeometryFactory,
    validity_checked: bool,
}

impl GeometryNoder {
    /// Creates a new `GeometryNoder` for the given precision.
    #[must_use]
    pub fn new(precision: PrecisionModel) -> Self {
        Self {
            factory: GeometryFactory::new(precision),
            validity_checked: true,
        }
    }

    /// Sets whether floating-precision output is checked for remaining
    /// interior intersections.
    #[must_use]
    pub fn with_validity_check(mut self, checked: bool) -> Self {
        self.validity_checked = checked;
        self
    }

    /// Nodes the linework of `geoms` into line strings.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NonNodedIntersection` if floating noding
    /// leaves an interior intersection, or `GeometryError::InvalidPrecision`
    /// for an unusable grid.
    pub fn node(&self, geoms: &[Geometry]) -> Result<Vec<Geometry>> {
        let strings: Vec<NodedSegmentString> = geoms
            .iter()
            .flat_map(Geometry::linear_components)
            .enumerate()
            .map(|(i, pts)| NodedSegmentString::new(pts.to_vec(), i))
            .collect();
        let input = strings.len();

        let noded = match self.factory.precision.scale() {
            None => {
                let li = LineIntersector::new().with_precision(self.factory.precision);
                let mut noder = McIndexNoder::new(IntersectionAdder::new(li));
                noder.compute_nodes(strings)?;
                let noded = noder.noded_substrings();
                if self.validity_checked {
                    NodingValidator::new(&noded).check_interior_intersections()?;
                }
                noded
            }
            Some(scale) => {
                let mut noder = ScaledNoder::new(SnapRoundingNoder::new(PrecisionModel::fixed(1.0)?)?, scale)?;
                noder.compute_nodes(strings)?;
                noder.noded_substrings()
            }
        };
        debug!(input, output = noded.len(), "linework noded");

        Ok(noded
            .into_iter()
            .filter(|ss| ss.len() >= 2)
            .map(|ss| self.factory.create_line_string(ss.coords().to_vec()))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Coord;

    #[test]
    fn crossing_lines_are_split() {
        let a = Geometry::line_string(&[(0.0, 0.0), (10.0, 10.0)]);
        let b = Geometry::line_string(&[(0.0, 10.0), (10.0, 0.0)]);
        let lines = GeometryNoder::new(PrecisionModel::Floating).node(&[a, b]).unwrap();
        assert_eq!(lines.len(), 4);
        let centre = Coord::new(5.0, 5.0);
        for line in &lines {
            let coords = line.coords();
            assert!(coords.first() == Some(&centre) || coords.last() == Some(&centre));
        }
    }

    #[test]
    fn polygon_rings_are_noded_against_lines() {
        let square = Geometry::rectangle(0.0, 0.0, 10.0, 10.0);
        let line = Geometry::line_string(&[(-5.0, 5.0), (15.0, 5.0)]);
        let lines = GeometryNoder::new(PrecisionModel::Floating).node(&[square, line]).unwrap();
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn fixed_precision_snaps_to_grid() {
        let a = Geometry::line_string(&[(0.0, 0.0), (10.0, 3.0)]);
        let b = Geometry::line_string(&[(0.0, 3.0), (10.0, 0.0)]);
        let pm = PrecisionModel::fixed(1.0).unwrap();
        let lines = GeometryNoder::new(pm).node(&[a, b]).unwrap();
        assert_eq!(lines.len(), 4);
        for line in &lines {
            for c in line.coords() {
                assert_eq!(c.x, c.x.round());
                assert_eq!(c.y, c.y.round());
            }
        }
    }

    #[test]
    fn off_grid_input_is_noded_onto_the_grid() {
        let geoms = [
            Geometry::line_string(&[(0.0, 0.0), (0.1, 0.1)]),
            Geometry::line_string(&[(0.0, 0.3), (0.4, 0.0), (5.0, 5.0)]),
            Geometry::line_string(&[(0.123, 4.456), (3.789, 0.345)]),
            Geometry::polygon(&[(0.51, 0.49), (4.27, 0.61), (2.33, 3.97), (0.51, 0.49)], &[]),
        ];
        for scale in [1.0, 100.0] {
            let pm = PrecisionModel::fixed(scale).unwrap();
            let lines = GeometryNoder::new(pm).node(&geoms).unwrap();
            assert!(!lines.is_empty());
            for line in &lines {
                assert!(line.coords().len() >= 2);
                for c in line.coords() {
                    assert_eq!(pm.make_precise_coord(c), c, "scale {scale}: {:?}", line.coords());
                }
            }
        }
    }
}
