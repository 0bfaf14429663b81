use crate::error::{OperationError, Result};
use crate::geometry::{BoundaryNodeRule, Dimension, Envelope, Geometry, Location, PointLocator, Polygon};
use crate::math::{Coord, LineIntersector};
use crate::noding::ChainIndex;
use crate::operations::relate::Relate;

use super::{as_rectangle, RectangleContains, RectangleIntersects};

/// A polygonal geometry prepared for repeated predicate tests.
///
/// The ring segments are indexed once and reused by every test. Each
/// predicate tries cheap checks first (envelopes, the rectangle fast
/// paths, one representative point per component, segment intersection)
/// and only computes the full intersection matrix when the boundaries
/// touch without crossing.
pub struct PreparedPolygon<'a> {
    geom: &'a Geometry,
    envelope: Envelope,
    rectangle: Option<&'a Polygon>,
    rings: Vec<&'a [Coord]>,
    index: ChainIndex,
    locator: PointLocator,
}

/// Segment intersections found between the target rings and a test geometry.
#[derive(Debug, Clone, Copy, Default)]
struct SegmentContact {
    any: bool,
    proper: bool,
}

impl<'a> PreparedPolygon<'a> {
    /// Creates a new `PreparedPolygon` for a polygon or multipolygon.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if `geom` is not polygonal.
    pub fn new(geom: &'a Geometry) -> Result<Self> {
        if !matches!(geom, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
            return Err(OperationError::InvalidArgument(format!("{} is not polygonal", geom.type_name())).into());
        }
        let rings = geom.linear_components();
        let index = ChainIndex::new(&rings);
        Ok(Self {
            geom,
            envelope: geom.envelope(),
            rectangle: as_rectangle(geom),
            rings,
            index,
            locator: PointLocator::new(BoundaryNodeRule::default()),
        })
    }

    /// The prepared geometry.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        self.geom
    }

    /// `true` if `g` has at least one point in common with the polygon.
    ///
    /// # Errors
    ///
    /// Propagates errors of the rectangle fast path.
    pub fn intersects(&self, g: &Geometry) -> Result<bool> {
        if !self.envelope.intersects(&g.envelope()) {
            return Ok(false);
        }
        if let Some(rect) = self.rectangle {
            return RectangleIntersects::new(rect).intersects(g);
        }
        if component_coordinates(g)
            .iter()
            .any(|p| self.locator.locate(p, self.geom) != Location::Exterior)
        {
            return Ok(true);
        }
        if g.dimension() >= Dimension::Curve && self.segment_contact(g, false).any {
            return Ok(true);
        }
        if g.dimension() == Dimension::Surface && self.any_ring_point_in(g) {
            return Ok(true);
        }
        Ok(false)
    }

    /// `true` if no point of `g` lies outside the polygon and the
    /// interiors meet.
    ///
    /// # Errors
    ///
    /// Propagates errors of the relate fallback, which rejects
    /// `GeometryCollection` arguments.
    pub fn contains(&self, g: &Geometry) -> Result<bool> {
        if !self.envelope.contains(&g.envelope()) {
            return Ok(false);
        }
        if let Some(rect) = self.rectangle {
            return Ok(RectangleContains::new(rect).contains(g));
        }
        self.eval_contains(g, true)
    }

    /// `true` if every point of `g` lies in the interior of the polygon.
    #[must_use]
    pub fn contains_properly(&self, g: &Geometry) -> bool {
        if g.is_empty() || !self.envelope.contains(&g.envelope()) {
            return false;
        }
        let all_interior = component_coordinates(g)
            .iter()
            .all(|p| self.locator.locate(p, self.geom) == Location::Interior);
        if !all_interior {
            return false;
        }
        if self.segment_contact(g, false).any {
            return false;
        }
        !(g.dimension() == Dimension::Surface && self.any_ring_point_in(g))
    }

    /// `true` if no point of `g` lies outside the polygon.
    ///
    /// # Errors
    ///
    /// Propagates errors of the relate fallback, which rejects
    /// `GeometryCollection` arguments.
    pub fn covers(&self, g: &Geometry) -> Result<bool> {
        if !self.envelope.contains(&g.envelope()) {
            return Ok(false);
        }
        if self.rectangle.is_some() {
            return Ok(true);
        }
        self.eval_contains(g, false)
    }

    fn eval_contains(&self, g: &Geometry, require_interior_point: bool) -> Result<bool> {
        let locations: Vec<Location> = component_coordinates(g)
            .iter()
            .map(|p| self.locator.locate(p, self.geom))
            .collect();
        if locations.is_empty() || locations.contains(&Location::Exterior) {
            return Ok(false);
        }
        if require_interior_point && g.dimension() == Dimension::Point {
            return Ok(locations.contains(&Location::Interior));
        }

        let contact = self.segment_contact(g, true);
        if contact.proper && self.proper_contact_excludes(g) {
            return Ok(false);
        }
        if contact.any {
            let im = Relate::new(self.geom, g).execute()?;
            return Ok(if require_interior_point { im.is_contains() } else { im.is_covers() });
        }
        if g.dimension() == Dimension::Surface && self.any_ring_point_in(g) {
            return Ok(false);
        }
        Ok(true)
    }

    /// A proper crossing rules out containment when the test geometry is
    /// an area, or when the polygon is a single shell without holes.
    fn proper_contact_excludes(&self, g: &Geometry) -> bool {
        g.dimension() == Dimension::Surface || self.rings.len() == 1
    }

    /// Any ring of the polygon with its first vertex inside or on `g`.
    fn any_ring_point_in(&self, g: &Geometry) -> bool {
        self.rings
            .iter()
            .filter_map(|ring| ring.first())
            .any(|p| self.locator.locate(p, g) != Location::Exterior)
    }

    /// Intersects the segments of `g` with the indexed polygon rings.
    /// Stops at the first contact unless `find_proper` asks to keep
    /// looking for a proper crossing.
    fn segment_contact(&self, g: &Geometry, find_proper: bool) -> SegmentContact {
        let mut contact = SegmentContact::default();
        let mut li = LineIntersector::new();
        for line in g.linear_components() {
            for seg in line.windows(2) {
                let env = Envelope::new(seg[0], seg[1]);
                for (s, i) in self.index.segments_in(&self.rings, &env) {
                    let ring = self.rings[s];
                    li.compute_intersection(&seg[0], &seg[1], &ring[i], &ring[i + 1]);
                    if !li.has_intersection() {
                        continue;
                    }
                    contact.any = true;
                    contact.proper |= li.is_proper();
                    if contact.proper || !find_proper {
                        return contact;
                    }
                }
            }
        }
        contact
    }
}

/// One coordinate from every point, line and ring of `g`.
fn component_coordinates(g: &Geometry) -> Vec<Coord> {
    g.components()
        .iter()
        .flat_map(|c| match c {
            Geometry::Point(Some(p)) => vec![*p],
            other => other.linear_components().iter().filter_map(|l| l.first().copied()).collect(),
        })
        .collect()
}
