use crate::error::{GeometryError, Result};
use crate::geometry::{is_closed, Geometry, Polygon};
use crate::math::Coord;
use crate::noding::{NodedSegmentString, NodingValidator};

/// Validates the structural consistency of a geometry.
///
/// Checks that coordinates are finite, lines have two distinct points,
/// rings are closed with at least four points, and ring linework is
/// correctly noded.
pub struct IsValid<'a> {
    geom: &'a Geometry,
}

impl<'a> IsValid<'a> {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(geom: &'a Geometry) -> Self {
        Self { geom }
    }

    /// Executes the validation, returning `true` if the geometry is valid.
    #[must_use]
    pub fn execute(&self) -> bool {
        self.validate().is_ok()
    }

    /// Executes the validation, reporting the first defect found.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` for malformed components, or a
    /// `TopologyError` for rings that cross or touch in their interiors.
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = self.geom.coords().iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(GeometryError::NonFinite { x: c.x, y: c.y }.into());
        }
        check_structure(self.geom)?;
        check_ring_noding(self.geom)
    }
}

fn check_structure(geom: &Geometry) -> Result<()> {
    match geom {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Ok(()),
        Geometry::LineString(pts) => check_line(pts),
        Geometry::MultiLineString(lines) => lines.iter().try_for_each(|l| check_line(l)),
        Geometry::Polygon(poly) => check_polygon(poly),
        Geometry::MultiPolygon(polys) => polys.iter().try_for_each(check_polygon),
        Geometry::GeometryCollection(members) => members.iter().try_for_each(check_structure),
    }
}

fn check_line(pts: &[Coord]) -> Result<()> {
    if pts.is_empty() || pts.iter().any(|p| *p != pts[0]) {
        return Ok(());
    }
    Err(GeometryError::Degenerate("line string has fewer than 2 distinct points".into()).into())
}

fn check_polygon(poly: &Polygon) -> Result<()> {
    if poly.is_empty() {
        return Ok(());
    }
    for ring in poly.rings() {
        if ring.len() < 4 {
            return Err(GeometryError::Degenerate(format!("ring has {} points, at least 4 required", ring.len())).into());
        }
        if !is_closed(ring) {
            return Err(GeometryError::Degenerate("ring is not closed".into()).into());
        }
    }
    Ok(())
}

fn check_ring_noding(geom: &Geometry) -> Result<()> {
    let rings: Vec<NodedSegmentString> = geom
        .components()
        .iter()
        .filter_map(|c| match c {
            Geometry::Polygon(poly) => Some(poly),
            _ => None,
        })
        .flat_map(Polygon::rings)
        .enumerate()
        .map(|(i, ring)| NodedSegmentString::new(ring.to_vec(), i))
        .collect();
    NodingValidator::new(&rings).check_interior_intersections()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn simple_shapes_are_valid() {
        assert!(IsValid::new(&Geometry::rectangle(0.0, 0.0, 1.0, 1.0)).execute());
        assert!(IsValid::new(&Geometry::line_string(&[(0.0, 0.0), (1.0, 1.0)])).execute());
        assert!(IsValid::new(&Geometry::Point(None)).execute());
    }

    #[test]
    fn bow_tie_is_invalid() {
        let bow_tie = Geometry::polygon(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)], &[]);
        assert!(!IsValid::new(&bow_tie).execute());
    }

    #[test]
    fn degenerate_components_are_invalid() {
        let line = Geometry::line_string(&[(1.0, 1.0), (1.0, 1.0)]);
        assert!(!IsValid::new(&line).execute());
        let open = Geometry::Polygon(Polygon::new(
            vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(1.0, 1.0), Coord::new(0.0, 1.0)],
            Vec::new(),
        ));
        assert!(!IsValid::new(&open).execute());
    }

    #[test]
    fn non_finite_coordinates_are_reported() {
        let pt = Geometry::point(f64::NAN, 0.0);
        let err = IsValid::new(&pt).validate().unwrap_err();
        assert!(err.to_string().starts_with("non-finite coordinate"));
    }
}
