//! Vector geometry model consumed by the topology kernel.

pub mod envelope;
pub mod factory;
pub mod locate;
pub mod location;

pub use envelope::Envelope;
pub use factory::GeometryFactory;
pub use locate::{BoundaryNodeRule, PointLocator, SimplePointInAreaLocator};
pub use location::{Location, Position};

use std::cmp::Ordering;

use crate::math::orientation::is_ccw;
use crate::math::{compare_coords, Coord};

/// Topological dimension of a geometry or of a point set.
///
/// Ordered so that `Empty < Point < Curve < Surface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// The empty set (`F` in a DE-9IM pattern).
    Empty,
    Point,
    Curve,
    Surface,
}

impl Dimension {
    /// DE-9IM symbol for this dimension.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Empty => 'F',
            Self::Point => '0',
            Self::Curve => '1',
            Self::Surface => '2',
        }
    }

    /// Parses a dimension symbol; `T` and `*` are not dimensions.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'F' => Some(Self::Empty),
            '0' => Some(Self::Point),
            '1' => Some(Self::Curve),
            '2' => Some(Self::Surface),
            _ => None,
        }
    }
}

/// A polygon: one exterior ring and any number of holes.
///
/// Rings are closed coordinate lists. An empty exterior denotes the empty polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub exterior: Vec<Coord>,
    pub interiors: Vec<Vec<Coord>>,
}

impl Polygon {
    #[must_use]
    pub fn new(exterior: Vec<Coord>, interiors: Vec<Vec<Coord>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Exterior followed by interior rings.
    pub fn rings(&self) -> impl Iterator<Item = &[Coord]> {
        std::iter::once(self.exterior.as_slice())
            .filter(|r| !r.is_empty())
            .chain(self.interiors.iter().map(Vec::as_slice))
    }
}

/// A planar vector geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A point; `None` is the empty point.
    Point(Option<Coord>),
    LineString(Vec<Coord>),
    Polygon(Polygon),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Creates a point geometry.
    #[must_use]
    pub fn point(x: f64, y: f64) -> Self {
        Self::Point(Some(Coord::new(x, y)))
    }

    /// Creates a line string from `(x, y)` pairs.
    #[must_use]
    pub fn line_string(coords: &[(f64, f64)]) -> Self {
        Self::LineString(coords.iter().map(|&(x, y)| Coord::new(x, y)).collect())
    }

    /// Creates a polygon from `(x, y)` rings; the first ring is the shell.
    #[must_use]
    pub fn polygon(shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> Self {
        let ring = |r: &[(f64, f64)]| r.iter().map(|&(x, y)| Coord::new(x, y)).collect();
        Self::Polygon(Polygon::new(
            ring(shell),
            holes.iter().map(|h| ring(h)).collect(),
        ))
    }

    /// Creates an axis-aligned rectangle polygon.
    #[must_use]
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::polygon(
            &[
                (min_x, min_y),
                (max_x, min_y),
                (max_x, max_y),
                (min_x, max_y),
                (min_x, min_y),
            ],
            &[],
        )
    }

    /// Human-readable type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPoint(_) => "MultiPoint",
            Self::MultiLineString(_) => "MultiLineString",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Returns `true` for the heterogeneous collection type.
    #[must_use]
    pub fn is_geometry_collection(&self) -> bool {
        matches!(self, Self::GeometryCollection(_))
    }

    /// Topological dimension of the geometry type.
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => Dimension::Point,
            Self::LineString(_) | Self::MultiLineString(_) => Dimension::Curve,
            Self::Polygon(_) | Self::MultiPolygon(_) => Dimension::Surface,
            Self::GeometryCollection(members) => members
                .iter()
                .map(Geometry::dimension)
                .max()
                .unwrap_or(Dimension::Empty),
        }
    }

    /// Dimension of the geometry's boundary.
    #[must_use]
    pub fn boundary_dimension(&self) -> Dimension {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => Dimension::Empty,
            Self::LineString(pts) => {
                if is_closed(pts) {
                    Dimension::Empty
                } else {
                    Dimension::Point
                }
            }
            Self::MultiLineString(lines) => {
                if lines.iter().all(|l| is_closed(l)) {
                    Dimension::Empty
                } else {
                    Dimension::Point
                }
            }
            Self::Polygon(_) | Self::MultiPolygon(_) => Dimension::Curve,
            Self::GeometryCollection(members) => members
                .iter()
                .map(Geometry::boundary_dimension)
                .max()
                .unwrap_or(Dimension::Empty),
        }
    }

    /// Returns `true` if the geometry contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(p) => p.is_none(),
            Self::LineString(pts) | Self::MultiPoint(pts) => pts.is_empty(),
            Self::Polygon(poly) => poly.is_empty(),
            Self::MultiLineString(lines) => lines.iter().all(Vec::is_empty),
            Self::MultiPolygon(polys) => polys.iter().all(Polygon::is_empty),
            Self::GeometryCollection(members) => members.iter().all(Geometry::is_empty),
        }
    }

    /// Bounding envelope (null when empty).
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_coords(&self.coords())
    }

    /// Total number of vertices.
    #[must_use]
    pub fn num_points(&self) -> usize {
        match self {
            Self::Point(p) => usize::from(p.is_some()),
            Self::LineString(pts) | Self::MultiPoint(pts) => pts.len(),
            Self::Polygon(poly) => poly.rings().map(<[Coord]>::len).sum(),
            Self::MultiLineString(lines) => lines.iter().map(Vec::len).sum(),
            Self::MultiPolygon(polys) => polys
                .iter()
                .map(|p| p.rings().map(<[Coord]>::len).sum::<usize>())
                .sum(),
            Self::GeometryCollection(members) => members.iter().map(Geometry::num_points).sum(),
        }
    }

    /// All vertices in storage order.
    #[must_use]
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.num_points());
        self.collect_coords(&mut out);
        out
    }

    fn collect_coords(&self, out: &mut Vec<Coord>) {
        match self {
            Self::Point(p) => out.extend(p.iter()),
            Self::LineString(pts) | Self::MultiPoint(pts) => out.extend_from_slice(pts),
            Self::Polygon(poly) => poly.rings().for_each(|r| out.extend_from_slice(r)),
            Self::MultiLineString(lines) => lines.iter().for_each(|l| out.extend_from_slice(l)),
            Self::MultiPolygon(polys) => polys
                .iter()
                .for_each(|p| p.rings().for_each(|r| out.extend_from_slice(r))),
            Self::GeometryCollection(members) => {
                members.iter().for_each(|m| m.collect_coords(out));
            }
        }
    }

    /// Every line string and ring as a coordinate slice.
    #[must_use]
    pub fn linear_components(&self) -> Vec<&[Coord]> {
        let mut out = Vec::new();
        self.collect_linear(&mut out);
        out
    }

    fn collect_linear<'a>(&'a self, out: &mut Vec<&'a [Coord]>) {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => {}
            Self::LineString(pts) => out.push(pts),
            Self::Polygon(poly) => out.extend(poly.rings()),
            Self::MultiLineString(lines) => out.extend(lines.iter().map(Vec::as_slice)),
            Self::MultiPolygon(polys) => polys.iter().for_each(|p| out.extend(p.rings())),
            Self::GeometryCollection(members) => {
                members.iter().for_each(|m| m.collect_linear(out));
            }
        }
    }

    /// Flattens multi-geometries and collections into atomic, non-empty
    /// components.
    #[must_use]
    pub fn components(&self) -> Vec<Geometry> {
        let mut out = Vec::new();
        self.collect_components(&mut out);
        out
    }

    fn collect_components(&self, out: &mut Vec<Geometry>) {
        match self {
            Self::Point(Some(_)) => out.push(self.clone()),
            Self::LineString(pts) if !pts.is_empty() => out.push(self.clone()),
            Self::Polygon(poly) if !poly.is_empty() => out.push(self.clone()),
            Self::MultiPoint(pts) => out.extend(pts.iter().map(|p| Self::Point(Some(*p)))),
            Self::MultiLineString(lines) => out.extend(
                lines
                    .iter()
                    .filter(|l| !l.is_empty())
                    .map(|l| Self::LineString(l.clone())),
            ),
            Self::MultiPolygon(polys) => out.extend(
                polys
                    .iter()
                    .filter(|p| !p.is_empty())
                    .map(|p| Self::Polygon(p.clone())),
            ),
            Self::GeometryCollection(members) => {
                members.iter().for_each(|m| m.collect_components(out));
            }
            _ => {}
        }
    }

    /// Number of direct members (1 for atomic geometries).
    #[must_use]
    pub fn num_geometries(&self) -> usize {
        match self {
            Self::Point(_) | Self::LineString(_) | Self::Polygon(_) => 1,
            Self::MultiPoint(pts) => pts.len(),
            Self::MultiLineString(lines) => lines.len(),
            Self::MultiPolygon(polys) => polys.len(),
            Self::GeometryCollection(members) => members.len(),
        }
    }

    /// Returns `true` if this is a polygon whose shell is an axis-aligned
    /// rectangle with exactly five vertices and no holes.
    #[must_use]
    pub fn is_rectangle(&self) -> bool {
        let Self::Polygon(poly) = self else {
            return false;
        };
        if !poly.interiors.is_empty() || poly.exterior.len() != 5 {
            return false;
        }
        let env = self.envelope();
        let shell = &poly.exterior;
        for p in shell {
            if (p.x != env.min_x() && p.x != env.max_x()) || (p.y != env.min_y() && p.y != env.max_y()) {
                return false;
            }
        }
        let mut prev = shell[0];
        for p in &shell[1..] {
            let x_changed = p.x != prev.x;
            let y_changed = p.y != prev.y;
            if x_changed == y_changed {
                return false;
            }
            prev = *p;
        }
        true
    }

    /// Applies `f` to every vertex.
    #[must_use]
    pub fn map_coords(&self, f: &impl Fn(Coord) -> Coord) -> Geometry {
        let map_vec = |pts: &Vec<Coord>| pts.iter().map(|c| f(*c)).collect::<Vec<_>>();
        let map_poly = |p: &Polygon| Polygon {
            exterior: map_vec(&p.exterior),
            interiors: p.interiors.iter().map(map_vec).collect(),
        };
        match self {
            Self::Point(p) => Self::Point(p.map(f)),
            Self::LineString(pts) => Self::LineString(map_vec(pts)),
            Self::Polygon(poly) => Self::Polygon(map_poly(poly)),
            Self::MultiPoint(pts) => Self::MultiPoint(map_vec(pts)),
            Self::MultiLineString(lines) => Self::MultiLineString(lines.iter().map(map_vec).collect()),
            Self::MultiPolygon(polys) => Self::MultiPolygon(polys.iter().map(map_poly).collect()),
            Self::GeometryCollection(members) => {
                Self::GeometryCollection(members.iter().map(|m| m.map_coords(f)).collect())
            }
        }
    }

    /// Puts the geometry into a canonical form.
    ///
    /// Shells run clockwise and holes counter-clockwise, every ring starts
    /// at its smallest vertex, lines start at their smaller end, and
    /// members of multi-geometries are sorted.
    #[must_use]
    pub fn normalized(&self) -> Geometry {
        match self {
            Self::Point(_) => self.clone(),
            Self::LineString(pts) => Self::LineString(normalize_line(pts)),
            Self::Polygon(poly) => Self::Polygon(normalize_polygon(poly)),
            Self::MultiPoint(pts) => {
                let mut pts = pts.clone();
                pts.sort_by(compare_coords);
                Self::MultiPoint(pts)
            }
            Self::MultiLineString(lines) => {
                let mut lines: Vec<_> = lines.iter().map(|l| normalize_line(l)).collect();
                lines.sort_by(|a, b| compare_coord_lists(a, b));
                Self::MultiLineString(lines)
            }
            Self::MultiPolygon(polys) => {
                let mut polys: Vec<_> = polys.iter().map(normalize_polygon).collect();
                polys.sort_by(|a, b| compare_coord_lists(&a.exterior, &b.exterior));
                Self::MultiPolygon(polys)
            }
            Self::GeometryCollection(members) => {
                let mut members: Vec<_> = members.iter().map(Geometry::normalized).collect();
                members.sort_by(compare_geometries);
                Self::GeometryCollection(members)
            }
        }
    }

    /// Structural equality with a coordinate tolerance.
    #[must_use]
    pub fn equals_exact(&self, other: &Geometry, tolerance: f64) -> bool {
        let close = |a: &Coord, b: &Coord| (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance;
        let same_list = |a: &[Coord], b: &[Coord]| a.len() == b.len() && a.iter().zip(b).all(|(p, q)| close(p, q));
        let same_poly = |a: &Polygon, b: &Polygon| {
            same_list(&a.exterior, &b.exterior)
                && a.interiors.len() == b.interiors.len()
                && a.interiors.iter().zip(&b.interiors).all(|(h, k)| same_list(h, k))
        };
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => match (a, b) {
                (Some(a), Some(b)) => close(a, b),
                (None, None) => true,
                _ => false,
            },
            (Self::LineString(a), Self::LineString(b)) | (Self::MultiPoint(a), Self::MultiPoint(b)) => {
                same_list(a, b)
            }
            (Self::Polygon(a), Self::Polygon(b)) => same_poly(a, b),
            (Self::MultiLineString(a), Self::MultiLineString(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(l, m)| same_list(l, m))
            }
            (Self::MultiPolygon(a), Self::MultiPolygon(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(p, q)| same_poly(p, q))
            }
            (Self::GeometryCollection(a), Self::GeometryCollection(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(g, h)| g.equals_exact(h, tolerance))
            }
            _ => false,
        }
    }
}

/// Returns `true` if the coordinate list is closed.
#[must_use]
pub fn is_closed(pts: &[Coord]) -> bool {
    !pts.is_empty() && pts[0] == pts[pts.len() - 1]
}

fn normalize_line(pts: &[Coord]) -> Vec<Coord> {
    let mut pts = pts.to_vec();
    if pts.len() > 1 && compare_coords(&pts[pts.len() - 1], &pts[0]) == Ordering::Less {
        pts.reverse();
    }
    pts
}

fn normalize_ring(ring: &[Coord], clockwise: bool) -> Vec<Coord> {
    if ring.len() < 4 {
        return ring.to_vec();
    }
    let open = &ring[..ring.len() - 1];
    let mut min_index = 0;
    for (i, c) in open.iter().enumerate() {
        if compare_coords(c, &open[min_index]) == Ordering::Less {
            min_index = i;
        }
    }
    let mut out: Vec<Coord> = open[min_index..].iter().chain(&open[..min_index]).copied().collect();
    out.push(out[0]);
    if is_ccw(&out) == clockwise {
        out.reverse();
    }
    out
}

fn normalize_polygon(poly: &Polygon) -> Polygon {
    let exterior = normalize_ring(&poly.exterior, true);
    let mut interiors: Vec<_> = poly.interiors.iter().map(|h| normalize_ring(h, false)).collect();
    interiors.sort_by(|a, b| compare_coord_lists(a, b));
    Polygon {
        exterior,
        interiors,
    }
}

fn compare_coord_lists(a: &[Coord], b: &[Coord]) -> Ordering {
    for (p, q) in a.iter().zip(b) {
        let ord = compare_coords(p, q);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_geometries(a: &Geometry, b: &Geometry) -> Ordering {
    a.dimension()
        .cmp(&b.dimension())
        .then_with(|| compare_coord_lists(&a.coords(), &b.coords()))
}
