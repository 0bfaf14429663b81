use crate::error::Result;
use crate::geometry::{Envelope, Geometry, Location, Polygon, SimplePointInAreaLocator};
use crate::math::{Coord, LineIntersector};
use crate::operations::relate::Relate;

/// Number of points above which a component is tested with the general
/// relate computation instead of a brute-force segment scan.
pub const MAXIMUM_SCAN_SEGMENT_COUNT: usize = 200;

/// Tests geometries for intersection with a rectangle without building a
/// topology graph.
///
/// The tests run from cheapest to most expensive: component envelopes
/// inside or bisected by the rectangle, rectangle corners inside a
/// polygonal component, then segment intersection.
pub struct RectangleIntersects<'a> {
    rectangle: &'a Polygon,
    rect_env: Envelope,
}

impl<'a> RectangleIntersects<'a> {
    /// Creates the test for `rectangle`, which must be an axis-aligned
    /// rectangle polygon.
    #[must_use]
    pub fn new(rectangle: &'a Polygon) -> Self {
        Self {
            rectangle,
            rect_env: Envelope::from_coords(&rectangle.exterior),
        }
    }

    /// Returns `true` if `geom` intersects the rectangle.
    ///
    /// # Errors
    ///
    /// Propagates errors of the relate fallback for large components.
    pub fn intersects(&self, geom: &Geometry) -> Result<bool> {
        if !self.rect_env.intersects(&geom.envelope()) {
            return Ok(false);
        }
        let components = geom.components();
        if components.iter().any(|c| self.envelope_intersects(&c.envelope())) {
            return Ok(true);
        }
        if components.iter().any(|c| self.contains_corner(c)) {
            return Ok(true);
        }
        for component in &components {
            if self.line_intersects(component)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// A connected component whose envelope lies inside the rectangle, or
    /// is bisected by it, must intersect it.
    fn envelope_intersects(&self, env: &Envelope) -> bool {
        let rect = &self.rect_env;
        if !rect.intersects(env) {
            return false;
        }
        if rect.contains(env) {
            return true;
        }
        (env.min_x() >= rect.min_x() && env.max_x() <= rect.max_x())
            || (env.min_y() >= rect.min_y() && env.max_y() <= rect.max_y())
    }

    fn contains_corner(&self, component: &Geometry) -> bool {
        if !matches!(component, Geometry::Polygon(_)) {
            return false;
        }
        let env = component.envelope();
        if !self.rect_env.intersects(&env) {
            return false;
        }
        self.rectangle
            .exterior
            .iter()
            .take(4)
            .filter(|corner| env.covers_coord(corner))
            .any(|corner| SimplePointInAreaLocator::locate(corner, component) == Location::Interior)
    }

    fn line_intersects(&self, component: &Geometry) -> Result<bool> {
        if !self.rect_env.intersects(&component.envelope()) {
            return Ok(false);
        }
        if component.num_points() > MAXIMUM_SCAN_SEGMENT_COUNT {
            let rect = Geometry::Polygon(self.rectangle.clone());
            return Ok(Relate::new(&rect, component).execute()?.is_intersects());
        }
        let mut li = LineIntersector::new();
        Ok(component
            .linear_components()
            .iter()
            .any(|line| segments_intersect(&mut li, &self.rectangle.exterior, line)))
    }
}

fn segments_intersect(li: &mut LineIntersector, a: &[Coord], b: &[Coord]) -> bool {
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            li.compute_intersection(&sa[0], &sa[1], &sb[0], &sb[1]);
            if li.has_intersection() {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rect() -> Polygon {
        match Geometry::rectangle(0.0, 0.0, 10.0, 10.0) {
            Geometry::Polygon(p) => p,
            _ => unreachable!(),
        }
    }

    #[test]
    fn bisecting_line_intersects() {
        let rect = rect();
        let line = Geometry::line_string(&[(5.0, -5.0), (5.0, 15.0)]);
        assert!(RectangleIntersects::new(&rect).intersects(&line).unwrap());
    }

    #[test]
    fn corner_inside_polygon_intersects() {
        let rect = rect();
        let big = Geometry::polygon(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0), (-5.0, -5.0)], &[]);
        assert!(RectangleIntersects::new(&rect).intersects(&big).unwrap());
    }

    #[test]
    fn diagonal_line_crosses_corner_area() {
        let rect = rect();
        let line = Geometry::line_string(&[(-2.0, 8.0), (8.0, -2.0)]);
        assert!(RectangleIntersects::new(&rect).intersects(&line).unwrap());
    }

    #[test]
    fn line_near_corner_misses() {
        let rect = rect();
        let line = Geometry::line_string(&[(-2.0, 1.0), (1.0, -2.0)]);
        assert!(!RectangleIntersects::new(&rect).intersects(&line).unwrap());
    }
}
