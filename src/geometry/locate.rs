//! Point-in-geometry location.

use super::{is_closed, Geometry, Location, Polygon};
use crate::math::orientation::{is_on_line, is_point_in_ring, locate_point_in_ring};
use crate::math::Coord;

/// Decides which endpoints of linear geometries form their boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryNodeRule {
    /// A point is on the boundary if it is an endpoint of an odd number of
    /// lines (the OGC rule).
    #[default]
    Mod2,
    /// Every line endpoint is on the boundary.
    EndPoint,
}

impl BoundaryNodeRule {
    /// Tests whether a point that is an endpoint of `count` lines lies on
    /// the boundary.
    #[must_use]
    pub fn is_in_boundary(self, count: usize) -> bool {
        match self {
            Self::Mod2 => count % 2 == 1,
            Self::EndPoint => count > 0,
        }
    }
}

/// Locates points against any geometry, honouring the boundary node rule
/// for linear components.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointLocator {
    rule: BoundaryNodeRule,
}

#[derive(Default)]
struct LocationTally {
    is_in: bool,
    num_boundaries: usize,
}

impl LocationTally {
    fn update(&mut self, loc: Location) {
        match loc {
            Location::Interior => self.is_in = true,
            Location::Boundary => self.num_boundaries += 1,
            Location::Exterior => {}
        }
    }
}

impl PointLocator {
    #[must_use]
    pub fn new(rule: BoundaryNodeRule) -> Self {
        Self { rule }
    }

    /// Returns `true` if the point is not in the exterior of `geom`.
    #[must_use]
    pub fn intersects(&self, p: &Coord, geom: &Geometry) -> bool {
        self.locate(p, geom) != Location::Exterior
    }

    /// Computes the location of `p` relative to `geom`.
    #[must_use]
    pub fn locate(&self, p: &Coord, geom: &Geometry) -> Location {
        if geom.is_empty() {
            return Location::Exterior;
        }
        match geom {
            Geometry::LineString(pts) => return locate_on_line(p, pts),
            Geometry::Polygon(poly) => return locate_in_polygon(p, poly),
            _ => {}
        }

        let mut tally = LocationTally::default();
        compute_location(p, geom, &mut tally);
        if self.rule.is_in_boundary(tally.num_boundaries) {
            return Location::Boundary;
        }
        if tally.num_boundaries > 0 || tally.is_in {
            return Location::Interior;
        }
        Location::Exterior
    }
}

fn compute_location(p: &Coord, geom: &Geometry, tally: &mut LocationTally) {
    match geom {
        Geometry::Point(Some(pt)) => {
            if pt == p {
                tally.update(Location::Interior);
            }
        }
        Geometry::Point(None) => {}
        Geometry::MultiPoint(pts) => {
            if pts.contains(p) {
                tally.update(Location::Interior);
            }
        }
        Geometry::LineString(pts) => tally.update(locate_on_line(p, pts)),
        Geometry::MultiLineString(lines) => {
            for line in lines {
                tally.update(locate_on_line(p, line));
            }
        }
        Geometry::Polygon(poly) => tally.update(locate_in_polygon(p, poly)),
        Geometry::MultiPolygon(polys) => {
            for poly in polys {
                tally.update(locate_in_polygon(p, poly));
            }
        }
        Geometry::GeometryCollection(members) => {
            for member in members {
                compute_location(p, member, tally);
            }
        }
    }
}

fn locate_on_line(p: &Coord, pts: &[Coord]) -> Location {
    if pts.is_empty() {
        return Location::Exterior;
    }
    if !is_closed(pts) && (*p == pts[0] || *p == pts[pts.len() - 1]) {
        return Location::Boundary;
    }
    if is_on_line(p, pts) {
        return Location::Interior;
    }
    Location::Exterior
}

fn locate_in_polygon(p: &Coord, poly: &Polygon) -> Location {
    if poly.is_empty() {
        return Location::Exterior;
    }
    match locate_point_in_ring(p, &poly.exterior) {
        Location::Exterior => return Location::Exterior,
        Location::Boundary => return Location::Boundary,
        Location::Interior => {}
    }
    for hole in &poly.interiors {
        match locate_point_in_ring(p, hole) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

/// Locates points against the areal parts of a geometry only.
///
/// Returns `Interior` when the point lies in or on any polygonal member
/// (the first containing member wins) and `Exterior` otherwise. Points on
/// a shell count as inside, points on a hole ring as outside.
pub struct SimplePointInAreaLocator;

impl SimplePointInAreaLocator {
    #[must_use]
    pub fn locate(p: &Coord, geom: &Geometry) -> Location {
        if geom.is_empty() {
            return Location::Exterior;
        }
        if Self::contains_point(p, geom) {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    fn contains_point(p: &Coord, geom: &Geometry) -> bool {
        match geom {
            Geometry::Polygon(poly) => contains_point_in_polygon(p, poly),
            Geometry::MultiPolygon(polys) => polys.iter().any(|poly| contains_point_in_polygon(p, poly)),
            Geometry::GeometryCollection(members) => members.iter().any(|m| Self::contains_point(p, m)),
            _ => false,
        }
    }
}

fn contains_point_in_polygon(p: &Coord, poly: &Polygon) -> bool {
    if poly.is_empty() || !is_point_in_ring(p, &poly.exterior) {
        return false;
    }
    !poly.interiors.iter().any(|hole| is_point_in_ring(p, hole))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn square_with_hole() -> Geometry {
        Geometry::polygon(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
            &[&[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0), (4.0, 4.0)]],
        )
    }

    #[test]
    fn polygon_locations() {
        let poly = square_with_hole();
        let loc = PointLocator::default();
        assert_eq!(loc.locate(&c(1.0, 1.0), &poly), Location::Interior);
        assert_eq!(loc.locate(&c(5.0, 5.0), &poly), Location::Exterior);
        assert_eq!(loc.locate(&c(4.0, 5.0), &poly), Location::Boundary);
        assert_eq!(loc.locate(&c(0.0, 5.0), &poly), Location::Boundary);
        assert_eq!(loc.locate(&c(11.0, 5.0), &poly), Location::Exterior);
    }

    #[test]
    fn line_endpoints_follow_mod2_rule() {
        let lines = Geometry::MultiLineString(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(1.0, 0.0), c(2.0, 0.0)],
        ]);
        let mod2 = PointLocator::default();
        assert_eq!(mod2.locate(&c(1.0, 0.0), &lines), Location::Interior);
        assert_eq!(mod2.locate(&c(0.0, 0.0), &lines), Location::Boundary);

        let endpoint = PointLocator::new(BoundaryNodeRule::EndPoint);
        assert_eq!(endpoint.locate(&c(1.0, 0.0), &lines), Location::Boundary);
    }

    #[test]
    fn closed_line_has_no_boundary() {
        let ring = Geometry::line_string(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(PointLocator::default().locate(&c(0.0, 0.0), &ring), Location::Interior);
    }

    #[test]
    fn area_locator_counts_ring_points_by_ring_kind() {
        let poly = square_with_hole();
        assert_eq!(SimplePointInAreaLocator::locate(&c(1.0, 1.0), &poly), Location::Interior);
        assert_eq!(SimplePointInAreaLocator::locate(&c(5.0, 5.0), &poly), Location::Exterior);
        assert_eq!(SimplePointInAreaLocator::locate(&c(0.0, 5.0), &poly), Location::Interior);
        assert_eq!(SimplePointInAreaLocator::locate(&c(4.0, 5.0), &poly), Location::Exterior);
        let line = Geometry::line_string(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(SimplePointInAreaLocator::locate(&c(0.5, 0.5), &line), Location::Exterior);
    }

    #[test]
    fn area_locator_first_match_in_collection() {
        let gc = Geometry::GeometryCollection(vec![
            Geometry::rectangle(0.0, 0.0, 2.0, 2.0),
            Geometry::rectangle(1.0, 1.0, 3.0, 3.0),
        ]);
        assert_eq!(SimplePointInAreaLocator::locate(&c(1.5, 1.5), &gc), Location::Interior);
    }
}
