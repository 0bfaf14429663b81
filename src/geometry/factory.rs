use super::{Dimension, Envelope, Geometry, Polygon};
use crate::math::{Coord, PrecisionModel};

/// Builds geometries under a fixed precision model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometryFactory {
    pub precision: PrecisionModel,
}

impl GeometryFactory {
    #[must_use]
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    #[must_use]
    pub fn create_point(&self, c: Coord) -> Geometry {
        Geometry::Point(Some(c))
    }

    #[must_use]
    pub fn create_line_string(&self, coords: Vec<Coord>) -> Geometry {
        Geometry::LineString(coords)
    }

    #[must_use]
    pub fn create_polygon(&self, shell: Vec<Coord>, holes: Vec<Vec<Coord>>) -> Geometry {
        Geometry::Polygon(Polygon::new(shell, holes))
    }

    /// Creates the empty geometry of the given dimension.
    #[must_use]
    pub fn create_empty(&self, dimension: Dimension) -> Geometry {
        match dimension {
            Dimension::Empty => Geometry::GeometryCollection(Vec::new()),
            Dimension::Point => Geometry::Point(None),
            Dimension::Curve => Geometry::LineString(Vec::new()),
            Dimension::Surface => Geometry::Polygon(Polygon::default()),
        }
    }

    /// Builds the most specific geometry holding all of `geoms`.
    ///
    /// A single element is returned as is, a homogeneous list of atomic
    /// geometries becomes the matching multi-geometry, and anything else
    /// becomes a collection.
    #[must_use]
    pub fn build_geometry(&self, mut geoms: Vec<Geometry>) -> Geometry {
        if geoms.is_empty() {
            return Geometry::GeometryCollection(geoms);
        }
        if geoms.len() == 1 {
            return geoms.remove(0);
        }

        if geoms.iter().all(|g| matches!(g, Geometry::Point(Some(_)))) {
            return Geometry::MultiPoint(
                geoms
                    .into_iter()
                    .filter_map(|g| match g {
                        Geometry::Point(p) => p,
                        _ => None,
                    })
                    .collect(),
            );
        }
        if geoms.iter().all(|g| matches!(g, Geometry::LineString(_))) {
            return Geometry::MultiLineString(
                geoms
                    .into_iter()
                    .filter_map(|g| match g {
                        Geometry::LineString(pts) => Some(pts),
                        _ => None,
                    })
                    .collect(),
            );
        }
        if geoms.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
            return Geometry::MultiPolygon(
                geoms
                    .into_iter()
                    .filter_map(|g| match g {
                        Geometry::Polygon(p) => Some(p),
                        _ => None,
                    })
                    .collect(),
            );
        }
        Geometry::GeometryCollection(geoms)
    }

    /// Polygon (or lower-dimensional degenerate) covering an envelope.
    #[must_use]
    pub fn to_geometry(&self, env: &Envelope) -> Geometry {
        if env.is_null() {
            return Geometry::Point(None);
        }
        let (x0, y0, x1, y1) = (env.min_x(), env.min_y(), env.max_x(), env.max_y());
        if x0 == x1 && y0 == y1 {
            return self.create_point(Coord::new(x0, y0));
        }
        if x0 == x1 || y0 == y1 {
            return self.create_line_string(vec![Coord::new(x0, y0), Coord::new(x1, y1)]);
        }
        self.create_polygon(
            vec![
                Coord::new(x0, y0),
                Coord::new(x0, y1),
                Coord::new(x1, y1),
                Coord::new(x1, y0),
                Coord::new(x0, y0),
            ],
            Vec::new(),
        )
    }

    /// Merges the non-empty components of several geometries into one.
    #[must_use]
    pub fn combine(&self, geoms: &[&Geometry]) -> Geometry {
        let parts: Vec<Geometry> = geoms.iter().flat_map(|g| g.components()).collect();
        self.build_geometry(parts)
    }

    /// Rounds every vertex onto this factory's precision grid, dropping
    /// consecutive duplicates created by the rounding.
    #[must_use]
    pub fn make_precise(&self, geom: &Geometry) -> Geometry {
        if self.precision == PrecisionModel::Floating {
            return geom.clone();
        }
        let pm = self.precision;
        let snapped = geom.map_coords(&|c| pm.make_precise_coord(c));
        remove_repeated(&snapped)
    }
}

fn dedup(pts: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}

fn remove_repeated(geom: &Geometry) -> Geometry {
    let poly = |p: &Polygon| Polygon {
        exterior: dedup(&p.exterior),
        interiors: p.interiors.iter().map(|h| dedup(h)).collect(),
    };
    match geom {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geom.clone(),
        Geometry::LineString(pts) => Geometry::LineString(dedup(pts)),
        Geometry::Polygon(p) => Geometry::Polygon(poly(p)),
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(lines.iter().map(|l| dedup(l)).collect()),
        Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(polys.iter().map(poly).collect()),
        Geometry::GeometryCollection(members) => {
            Geometry::GeometryCollection(members.iter().map(remove_repeated).collect())
        }
    }
}
