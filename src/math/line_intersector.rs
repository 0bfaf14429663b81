use super::dd::DoubleDouble;
use super::orientation::orientation_index;
use super::{Coord, PrecisionModel};

/// Degree of a segment-segment intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectionKind {
    #[default]
    None,
    /// A single intersection point.
    Point,
    /// A collinear overlap, described by two points.
    Collinear,
}

/// Robust segment-segment intersection.
///
/// Keeps the result of the most recent [`compute_intersection`] call so
/// that callers can query the points, properness and edge distances.
///
/// [`compute_intersection`]: LineIntersector::compute_intersection
#[derive(Debug, Clone)]
pub struct LineIntersector {
    precision: Option<PrecisionModel>,
    kind: IntersectionKind,
    proper: bool,
    int_pts: [Coord; 2],
    input_lines: [[Coord; 2]; 2],
}

impl Default for LineIntersector {
    fn default() -> Self {
        let origin = Coord::origin();
        Self {
            precision: None,
            kind: IntersectionKind::None,
            proper: false,
            int_pts: [origin; 2],
            input_lines: [[origin; 2]; 2],
        }
    }
}

impl LineIntersector {
    /// Creates an intersector that leaves computed points unrounded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds computed intersection points with the given model.
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Computes the intersection of segments `p1-p2` and `q1-q2`.
    pub fn compute_intersection(
        &mut self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
    ) -> IntersectionKind {
        self.input_lines = [[*p1, *p2], [*q1, *q2]];
        self.kind = self.compute_intersect(p1, p2, q1, q2);
        self.kind
    }

    fn compute_intersect(
        &mut self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
    ) -> IntersectionKind {
        self.proper = false;

        if !envelopes_intersect(p1, p2, q1, q2) {
            return IntersectionKind::None;
        }

        let pq1 = orientation_index(p1, p2, q1).index();
        let pq2 = orientation_index(p1, p2, q2).index();
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return IntersectionKind::None;
        }

        let qp1 = orientation_index(q1, q2, p1).index();
        let qp2 = orientation_index(q1, q2, p2).index();
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return IntersectionKind::None;
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return self.compute_collinear_intersection(p1, p2, q1, q2);
        }

        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // An endpoint touch. Prefer an exactly shared endpoint so that
            // no rounding is ever introduced for it.
            self.int_pts[0] = if p1 == q1 || p1 == q2 {
                *p1
            } else if p2 == q1 || p2 == q2 {
                *p2
            } else if pq1 == 0 {
                *q1
            } else if pq2 == 0 {
                *q2
            } else if qp1 == 0 {
                *p1
            } else {
                *p2
            };
        } else {
            self.proper = true;
            self.int_pts[0] = self.intersection(p1, p2, q1, q2);
        }
        IntersectionKind::Point
    }

    fn compute_collinear_intersection(
        &mut self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
    ) -> IntersectionKind {
        let p1q1p2 = in_envelope(p1, p2, q1);
        let p1q2p2 = in_envelope(p1, p2, q2);
        let q1p1q2 = in_envelope(q1, q2, p1);
        let q1p2q2 = in_envelope(q1, q2, p2);

        if p1q1p2 && p1q2p2 {
            self.int_pts = [*q1, *q2];
            return IntersectionKind::Collinear;
        }
        if q1p1q2 && q1p2q2 {
            self.int_pts = [*p1, *p2];
            return IntersectionKind::Collinear;
        }
        if p1q1p2 && q1p1q2 {
            self.int_pts = [*q1, *p1];
            return touch_or_overlap(q1 == p1 && !p1q2p2 && !q1p2q2);
        }
        if p1q1p2 && q1p2q2 {
            self.int_pts = [*q1, *p2];
            return touch_or_overlap(q1 == p2 && !p1q2p2 && !q1p1q2);
        }
        if p1q2p2 && q1p1q2 {
            self.int_pts = [*q2, *p1];
            return touch_or_overlap(q2 == p1 && !p1q1p2 && !q1p2q2);
        }
        if p1q2p2 && q1p2q2 {
            self.int_pts = [*q2, *p2];
            return touch_or_overlap(q2 == p2 && !p1q1p2 && !q1p1q2);
        }
        IntersectionKind::None
    }

    /// Computes a proper intersection point, guarding against results that
    /// drift outside the input segments.
    fn intersection(&self, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
        let mut int_pt = intersection_with_normalization(p1, p2, q1, q2)
            .filter(|pt| self.is_in_segment_envelopes(pt))
            .unwrap_or_else(|| nearest_endpoint(p1, p2, q1, q2));
        if let Some(pm) = &self.precision {
            int_pt = pm.make_precise_coord(int_pt);
        }
        int_pt
    }

    fn is_in_segment_envelopes(&self, pt: &Coord) -> bool {
        let [[p1, p2], [q1, q2]] = &self.input_lines;
        in_envelope(p1, p2, pt) && in_envelope(q1, q2, pt)
    }

    /// Kind of the last computed intersection.
    #[must_use]
    pub fn kind(&self) -> IntersectionKind {
        self.kind
    }

    /// Returns `true` if the last computation found any intersection.
    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.kind != IntersectionKind::None
    }

    /// Returns `true` if the last intersection was a collinear overlap.
    #[must_use]
    pub fn is_collinear(&self) -> bool {
        self.kind == IntersectionKind::Collinear
    }

    /// Returns `true` if the segments cross at a point interior to both.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.proper
    }

    /// Number of intersection points (0, 1 or 2).
    #[must_use]
    pub fn intersection_num(&self) -> usize {
        match self.kind {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    /// Returns the `i`th intersection point.
    #[must_use]
    pub fn intersection_point(&self, i: usize) -> Coord {
        self.int_pts[i]
    }

    /// Iterates over the computed intersection points.
    pub fn intersection_points(&self) -> impl Iterator<Item = Coord> + '_ {
        self.int_pts[..self.intersection_num()].iter().copied()
    }

    /// Returns `true` if `pt` is one of the computed intersection points.
    #[must_use]
    pub fn is_intersection(&self, pt: &Coord) -> bool {
        self.intersection_points().any(|ip| ip == *pt)
    }

    /// Returns `true` if some intersection point is interior to either input segment.
    #[must_use]
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_of(0) || self.is_interior_intersection_of(1)
    }

    /// Returns `true` if some intersection point is not an endpoint of the
    /// given input segment.
    #[must_use]
    pub fn is_interior_intersection_of(&self, input_line: usize) -> bool {
        let [a, b] = self.input_lines[input_line];
        self.intersection_points().any(|ip| ip != a && ip != b)
    }

    /// Distance of intersection `int_index` along input segment `segment`.
    #[must_use]
    pub fn edge_distance(&self, segment: usize, int_index: usize) -> f64 {
        let [p0, p1] = self.input_lines[segment];
        compute_edge_distance(&self.int_pts[int_index], &p0, &p1)
    }
}

fn touch_or_overlap(single_point: bool) -> IntersectionKind {
    if single_point {
        IntersectionKind::Point
    } else {
        IntersectionKind::Collinear
    }
}

/// A monotone "distance" of `p` along the segment `p0-p1`.
///
/// Not a Euclidean distance: it is the larger ordinate difference, which
/// is exact for points computed to lie on the segment and preserves their
/// order along it.
#[must_use]
pub fn compute_edge_distance(p: &Coord, p0: &Coord, p1: &Coord) -> f64 {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();

    if p == p0 {
        return 0.0;
    }
    if p == p1 {
        return dx.max(dy);
    }
    let pdx = (p.x - p0.x).abs();
    let pdy = (p.y - p0.y).abs();
    let dist = if dx > dy { pdx } else { pdy };
    if dist == 0.0 {
        pdx.max(pdy)
    } else {
        dist
    }
}

fn in_envelope(a: &Coord, b: &Coord, q: &Coord) -> bool {
    q.x >= a.x.min(b.x) && q.x <= a.x.max(b.x) && q.y >= a.y.min(b.y) && q.y <= a.y.max(b.y)
}

fn envelopes_intersect(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> bool {
    let min_q = q1.x.min(q2.x);
    let max_q = q1.x.max(q2.x);
    let min_p = p1.x.min(p2.x);
    let max_p = p1.x.max(p2.x);
    if min_p > max_q || max_p < min_q {
        return false;
    }
    let min_q = q1.y.min(q2.y);
    let max_q = q1.y.max(q2.y);
    let min_p = p1.y.min(p2.y);
    let max_p = p1.y.max(p2.y);
    !(min_p > max_q || max_p < min_q)
}

/// Intersects the lines after translating them so that the centre of the
/// overlap of their envelopes is at the origin, which keeps the
/// homogeneous terms small.
fn intersection_with_normalization(
    p1: &Coord,
    p2: &Coord,
    q1: &Coord,
    q2: &Coord,
) -> Option<Coord> {
    let min_x = p1.x.min(p2.x).max(q1.x.min(q2.x));
    let max_x = p1.x.max(p2.x).min(q1.x.max(q2.x));
    let min_y = p1.y.min(p2.y).max(q1.y.min(q2.y));
    let max_y = p1.y.max(p2.y).min(q1.y.max(q2.y));
    let mid = Coord::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    let shift = |c: &Coord| Coord::new(c.x - mid.x, c.y - mid.y);
    let int_pt = line_intersection_dd(&shift(p1), &shift(p2), &shift(q1), &shift(q2))?;
    Some(Coord::new(int_pt.x + mid.x, int_pt.y + mid.y))
}

/// Intersection of the infinite lines through two segments, computed in
/// homogeneous coordinates with double-double arithmetic.
fn line_intersection_dd(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Option<Coord> {
    let px = DoubleDouble::new(p1.y) - p2.y;
    let py = DoubleDouble::new(p2.x) - p1.x;
    let pw = DoubleDouble::new(p1.x) * p2.y - DoubleDouble::new(p2.x) * p1.y;

    let qx = DoubleDouble::new(q1.y) - q2.y;
    let qy = DoubleDouble::new(q2.x) - q1.x;
    let qw = DoubleDouble::new(q1.x) * q2.y - DoubleDouble::new(q2.x) * q1.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;
    if w.is_zero() {
        return None;
    }
    let x_int = (x / w).to_f64();
    let y_int = (y / w).to_f64();
    if !x_int.is_finite() || !y_int.is_finite() {
        return None;
    }
    Some(Coord::new(x_int, y_int))
}

/// The input endpoint closest to the other segment.
fn nearest_endpoint(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let candidates = [
        (*p1, point_segment_distance(p1, q1, q2)),
        (*p2, point_segment_distance(p2, q1, q2)),
        (*q1, point_segment_distance(q1, p1, p2)),
        (*q2, point_segment_distance(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for cand in &candidates[1..] {
        if cand.1 < best.1 {
            best = *cand;
        }
    }
    best.0
}

/// Euclidean distance from a point to a closed segment.
#[must_use]
pub fn point_segment_distance(p: &Coord, a: &Coord, b: &Coord) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn proper_crossing() {
        let mut li = LineIntersector::new();
        let kind = li.compute_intersection(&c(0.0, 0.0), &c(10.0, 10.0), &c(0.0, 10.0), &c(10.0, 0.0));
        assert_eq!(kind, IntersectionKind::Point);
        assert!(li.is_proper());
        assert!(li.is_interior_intersection());
        assert_relative_eq!(li.intersection_point(0).x, 5.0);
        assert_relative_eq!(li.intersection_point(0).y, 5.0);
    }

    #[test]
    fn endpoint_touch_is_not_proper() {
        let mut li = LineIntersector::new();
        let kind = li.compute_intersection(&c(0.0, 0.0), &c(10.0, 0.0), &c(10.0, 0.0), &c(10.0, 10.0));
        assert_eq!(kind, IntersectionKind::Point);
        assert!(!li.is_proper());
        assert!(!li.is_interior_intersection());
        assert_eq!(li.intersection_point(0), c(10.0, 0.0));
    }

    #[test]
    fn t_junction_is_interior_to_one_segment() {
        let mut li = LineIntersector::new();
        li.compute_intersection(&c(0.0, 0.0), &c(10.0, 0.0), &c(5.0, 0.0), &c(5.0, 5.0));
        assert!(!li.is_proper());
        assert!(li.is_interior_intersection_of(0));
        assert!(!li.is_interior_intersection_of(1));
    }

    #[test]
    fn collinear_overlap() {
        let mut li = LineIntersector::new();
        let kind = li.compute_intersection(&c(0.0, 0.0), &c(10.0, 0.0), &c(5.0, 0.0), &c(15.0, 0.0));
        assert_eq!(kind, IntersectionKind::Collinear);
        assert_eq!(li.intersection_num(), 2);
        assert!(li.is_intersection(&c(5.0, 0.0)));
        assert!(li.is_intersection(&c(10.0, 0.0)));
    }

    #[test]
    fn collinear_touch_at_single_point() {
        let mut li = LineIntersector::new();
        let kind = li.compute_intersection(&c(0.0, 0.0), &c(10.0, 0.0), &c(10.0, 0.0), &c(20.0, 0.0));
        assert_eq!(kind, IntersectionKind::Point);
    }

    #[test]
    fn disjoint_segments() {
        let mut li = LineIntersector::new();
        let kind = li.compute_intersection(&c(0.0, 0.0), &c(1.0, 1.0), &c(2.0, 0.0), &c(3.0, 1.0));
        assert_eq!(kind, IntersectionKind::None);
        assert!(!li.has_intersection());
    }

    #[test]
    fn precision_rounds_proper_points() {
        let mut li = LineIntersector::new().with_precision(PrecisionModel::Fixed { scale: 1.0 });
        li.compute_intersection(&c(0.0, 0.0), &c(10.0, 3.0), &c(0.0, 3.0), &c(10.0, 0.0));
        assert_eq!(li.intersection_point(0), c(5.0, 2.0));
    }

    #[test]
    fn near_parallel_point_stays_in_envelopes() {
        let mut li = LineIntersector::new();
        let p1 = c(2_089_426.563_322_4, 1_180_182.387_444_2);
        let p2 = c(2_085_646.660_947_6, 1_195_618.792_258_3);
        let q1 = c(1_889_281.818_781_2, 1_997_547.001_107_1);
        let q2 = c(2_259_977.321_800_2, 483_675.170_673_6);
        if li.compute_intersection(&p1, &p2, &q1, &q2) == IntersectionKind::Point {
            let ip = li.intersection_point(0);
            assert!(in_envelope(&p1, &p2, &ip));
            assert!(in_envelope(&q1, &q2, &ip));
        }
    }

    #[test]
    fn edge_distance_orders_points_along_segment() {
        let p0 = c(0.0, 0.0);
        let p1 = c(10.0, 2.0);
        let near = compute_edge_distance(&c(2.0, 0.4), &p0, &p1);
        let far = compute_edge_distance(&c(7.0, 1.4), &p0, &p1);
        assert!(near < far);
        assert_relative_eq!(compute_edge_distance(&p0, &p0, &p1), 0.0);
        assert_relative_eq!(compute_edge_distance(&p1, &p0, &p1), 10.0);
    }
}
