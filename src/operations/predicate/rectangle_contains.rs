use crate::geometry::{Envelope, Geometry, Polygon};
use crate::math::Coord;

/// Tests whether a rectangle contains a geometry using only envelope
/// comparisons.
///
/// A geometry inside the rectangle envelope is contained unless it lies
/// wholly in the rectangle's boundary.
pub struct RectangleContains {
    rect_env: Envelope,
}

impl RectangleContains {
    /// Creates a new `RectangleContains` test for an axis-aligned
    /// rectangle polygon.
    #[must_use]
    pub fn new(rectangle: &Polygon) -> Self {
        Self {
            rect_env: Envelope::from_coords(&rectangle.exterior),
        }
    }

    /// Returns `true` if the rectangle contains `geom`.
    #[must_use]
    pub fn contains(&self, geom: &Geometry) -> bool {
        if !self.rect_env.contains(&geom.envelope()) {
            return false;
        }
        !self.is_contained_in_boundary(geom)
    }

    fn is_contained_in_boundary(&self, geom: &Geometry) -> bool {
        match geom {
            Geometry::Polygon(_) => false,
            Geometry::Point(Some(p)) => self.is_point_in_boundary(p),
            Geometry::LineString(pts) => self.is_line_in_boundary(pts),
            Geometry::MultiPolygon(polys) => polys.is_empty(),
            Geometry::MultiPoint(pts) => pts.iter().all(|p| self.is_point_in_boundary(p)),
            Geometry::MultiLineString(lines) => lines.iter().all(|l| self.is_line_in_boundary(l)),
            Geometry::GeometryCollection(members) => members.iter().all(|m| self.is_contained_in_boundary(m)),
            Geometry::Point(None) => true,
        }
    }

    fn is_point_in_boundary(&self, p: &Coord) -> bool {
        let env = &self.rect_env;
        p.x == env.min_x() || p.x == env.max_x() || p.y == env.min_y() || p.y == env.max_y()
    }

    fn is_line_in_boundary(&self, pts: &[Coord]) -> bool {
        pts.windows(2).all(|seg| self.is_segment_in_boundary(&seg[0], &seg[1]))
    }

    fn is_segment_in_boundary(&self, p0: &Coord, p1: &Coord) -> bool {
        let env = &self.rect_env;
        if p0 == p1 {
            return self.is_point_in_boundary(p0);
        }
        if p0.x == p1.x {
            return p0.x == env.min_x() || p0.x == env.max_x();
        }
        if p0.y == p1.y {
            return p0.y == env.min_y() || p0.y == env.max_y();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Polygon {
        match Geometry::rectangle(0.0, 0.0, 10.0, 10.0) {
            Geometry::Polygon(p) => p,
            _ => unreachable!(),
        }
    }

    #[test]
    fn interior_point_is_contained() {
        let rc = RectangleContains::new(&rect());
        assert!(rc.contains(&Geometry::point(5.0, 5.0)));
        assert!(!rc.contains(&Geometry::point(10.0, 5.0)));
        assert!(!rc.contains(&Geometry::point(11.0, 5.0)));
    }

    #[test]
    fn line_along_boundary_is_not_contained() {
        let rc = RectangleContains::new(&rect());
        let edge = Geometry::line_string(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(!rc.contains(&edge));
        let diagonal = Geometry::line_string(&[(0.0, 0.0), (10.0, 10.0)]);
        assert!(rc.contains(&diagonal));
    }
}
