//! Named spatial predicates.
//!
//! Every predicate first compares envelopes and returns early when they
//! decide the answer. `intersects`, `contains` and `covers` then take a
//! fast path when an argument is a rectangle; everything else is read off
//! the intersection matrix computed by [`Relate`].

mod prepared_polygon;
mod rectangle_contains;
mod rectangle_intersects;

pub use prepared_polygon::PreparedPolygon;
pub use rectangle_contains::RectangleContains;
pub use rectangle_intersects::{RectangleIntersects, MAXIMUM_SCAN_SEGMENT_COUNT};

use crate::error::Result;
use crate::geometry::{Geometry, Polygon};
use crate::operations::relate::{IntersectionMatrix, Relate};

fn as_rectangle(geom: &Geometry) -> Option<&Polygon> {
    match geom {
        Geometry::Polygon(poly) if geom.is_rectangle() => Some(poly),
        _ => None,
    }
}

/// Computes the DE-9IM matrix of `a` and `b`.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn relate(a: &Geometry, b: &Geometry) -> Result<IntersectionMatrix> {
    Relate::new(a, b).execute()
}

/// Tests the matrix of `a` and `b` against a DE-9IM pattern.
///
/// # Errors
///
/// Returns `OperationError::InvalidArgument` for a malformed pattern, or
/// any error of [`Relate::execute`].
pub fn relate_pattern(a: &Geometry, b: &Geometry, pattern: &str) -> Result<bool> {
    relate(a, b)?.matches(pattern)
}

/// `true` if the geometries have at least one point in common.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn intersects(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    if let Some(rect) = as_rectangle(a) {
        return RectangleIntersects::new(rect).intersects(b);
    }
    if let Some(rect) = as_rectangle(b) {
        return RectangleIntersects::new(rect).intersects(a);
    }
    Ok(relate(a, b)?.is_intersects())
}

/// `true` if the geometries have no point in common.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn disjoint(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(true);
    }
    Ok(relate(a, b)?.is_disjoint())
}

/// `true` if the geometries meet only at their boundaries.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn touches(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_touches(a.dimension(), b.dimension()))
}

/// `true` if the geometries cross.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn crosses(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_crosses(a.dimension(), b.dimension()))
}

/// `true` if no point of `b` lies outside `a` and their interiors meet.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn contains(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().contains(&b.envelope()) {
        return Ok(false);
    }
    if let Some(rect) = as_rectangle(a) {
        return Ok(RectangleContains::new(rect).contains(b));
    }
    Ok(relate(a, b)?.is_contains())
}

/// `true` if every point of `b` lies in the interior of `a`.
///
/// Polygonal `a` is tested with [`PreparedPolygon`]; other geometries
/// match the matrix against `T**FF*FF*`.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn contains_properly(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().contains(&b.envelope()) {
        return Ok(false);
    }
    if matches!(a, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
        return Ok(PreparedPolygon::new(a)?.contains_properly(b));
    }
    relate(a, b)?.matches("T**FF*FF*")
}

/// `true` if `a` lies within `b`.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn within(a: &Geometry, b: &Geometry) -> Result<bool> {
    contains(b, a)
}

/// `true` if the geometries share interior points and each has points
/// outside the other, with equal dimensions.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn overlaps(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_overlaps(a.dimension(), b.dimension()))
}

/// `true` if no point of `b` lies outside `a`.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn covers(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().contains(&b.envelope()) {
        return Ok(false);
    }
    if a.is_rectangle() {
        return Ok(true);
    }
    Ok(relate(a, b)?.is_covers())
}

/// `true` if no point of `a` lies outside `b`.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn covered_by(a: &Geometry, b: &Geometry) -> Result<bool> {
    covers(b, a)
}

/// `true` if the geometries are topologically equal.
///
/// # Errors
///
/// See [`Relate::execute`].
pub fn equals_topo(a: &Geometry, b: &Geometry) -> Result<bool> {
    if a.is_empty() || b.is_empty() {
        return Ok(a.is_empty() && b.is_empty());
    }
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_equals(a.dimension(), b.dimension()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::rectangle(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn point_on_boundary() {
        let poly = square();
        let pt = Geometry::point(10.0, 5.0);
        assert!(touches(&poly, &pt).unwrap());
        assert!(!contains(&poly, &pt).unwrap());
        assert!(covers(&poly, &pt).unwrap());
        assert!(intersects(&pt, &poly).unwrap());
    }

    #[test]
    fn line_crossing_polygon() {
        let poly = Geometry::polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0), (0.0, 0.0)], &[]);
        let line = Geometry::line_string(&[(-5.0, 5.0), (15.0, 5.0)]);
        assert!(crosses(&line, &poly).unwrap());
        assert!(crosses(&poly, &line).unwrap());
        assert!(!within(&line, &poly).unwrap());
    }

    #[test]
    fn overlapping_polygons() {
        let a = Geometry::polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)], &[]);
        let b = Geometry::polygon(&[(5.0, 0.0), (15.0, 0.0), (15.0, 10.0), (5.0, 0.0)], &[]);
        assert!(overlaps(&a, &b).unwrap());
        assert!(!touches(&a, &b).unwrap());
        assert!(!disjoint(&a, &b).unwrap());
    }

    #[test]
    fn topological_equality_ignores_vertex_order() {
        let a = square();
        let b = Geometry::polygon(
            &[(10.0, 10.0), (10.0, 0.0), (5.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)],
            &[],
        );
        assert!(equals_topo(&a, &b).unwrap());
        assert!(covered_by(&b, &a).unwrap());
    }

    #[test]
    fn rectangle_fast_paths_agree_with_relate() {
        let rect = square();
        let shapes = [
            Geometry::line_string(&[(2.0, 2.0), (8.0, 3.0)]),
            Geometry::line_string(&[(0.0, 0.0), (10.0, 0.0)]),
            Geometry::line_string(&[(-2.0, 1.0), (1.0, -2.0)]),
            Geometry::polygon(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0), (-5.0, -5.0)], &[]),
            Geometry::point(0.0, 10.0),
        ];
        for shape in &shapes {
            let im = relate(&rect, shape).unwrap();
            assert_eq!(intersects(&rect, shape).unwrap(), im.is_intersects());
            assert_eq!(contains(&rect, shape).unwrap(), im.is_contains());
        }
    }

    #[test]
    fn contains_properly_rejects_boundary_points() {
        let poly = square();
        assert!(contains_properly(&poly, &Geometry::point(5.0, 5.0)).unwrap());
        assert!(!contains_properly(&poly, &Geometry::point(10.0, 5.0)).unwrap());
        assert!(!contains_properly(&poly, &poly).unwrap());
        let line = Geometry::line_string(&[(0.0, 0.0), (10.0, 10.0)]);
        assert!(contains_properly(&line, &Geometry::point(5.0, 5.0)).unwrap());
        assert!(!contains_properly(&line, &Geometry::point(0.0, 0.0)).unwrap());
    }

    #[test]
    fn relate_pattern_checks_symbols() {
        let a = square();
        let b = Geometry::point(5.0, 5.0);
        assert!(relate_pattern(&a, &b, "0F2FF1FF2").unwrap());
        assert!(relate_pattern(&a, &b, "T*****FF*").unwrap());
        assert!(relate_pattern(&a, &b, "X********").is_err());
    }
}
