use super::dd::DoubleDouble;
use super::Coord;
use crate::geometry::Location;

/// Relative-error bound for the floating-point orientation filter.
const DP_SAFE_EPSILON: f64 = 1e-15;

/// Turn direction of a point relative to a directed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    /// Signed index: -1 clockwise, 0 collinear, 1 counter-clockwise.
    #[must_use]
    pub fn index(self) -> i32 {
        match self {
            Self::Clockwise => -1,
            Self::Collinear => 0,
            Self::CounterClockwise => 1,
        }
    }

    fn from_sign(sign: i32) -> Self {
        match sign.signum() {
            1 => Self::CounterClockwise,
            -1 => Self::Clockwise,
            _ => Self::Collinear,
        }
    }

    /// The orientation seen from the reversed segment.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::Collinear => Self::Collinear,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Returns the orientation of `q` relative to the directed segment `p1 -> p2`.
///
/// A cheap floating-point filter settles the sign whenever the determinant
/// is clearly away from zero; otherwise the determinant is recomputed in
/// double-double arithmetic. Swapping `p1` and `p2` always reverses the result.
#[must_use]
pub fn orientation_index(p1: &Coord, p2: &Coord, q: &Coord) -> Orientation {
    if let Some(sign) = orientation_filter(p1, p2, q) {
        return Orientation::from_sign(sign);
    }
    let dx1 = DoubleDouble::new(p2.x) - p1.x;
    let dy1 = DoubleDouble::new(p2.y) - p1.y;
    let dx2 = DoubleDouble::new(q.x) - p2.x;
    let dy2 = DoubleDouble::new(q.y) - p2.y;
    let det = dx1 * dy2 - dy1 * dx2;
    Orientation::from_sign(det.signum())
}

/// Fast sign of the orientation determinant, or `None` when the
/// floating-point result cannot be trusted.
fn orientation_filter(pa: &Coord, pb: &Coord, pc: &Coord) -> Option<i32> {
    let det_left = (pa.x - pc.x) * (pb.y - pc.y);
    let det_right = (pa.y - pc.y) * (pb.x - pc.x);
    let det = det_left - det_right;

    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return Some(sign_of(det));
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return Some(sign_of(det));
        }
        -det_left - det_right
    } else {
        return Some(sign_of(det));
    };

    let err_bound = DP_SAFE_EPSILON * det_sum;
    if det >= err_bound || -det >= err_bound {
        return Some(sign_of(det));
    }
    None
}

fn sign_of(value: f64) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Computes the signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let x0 = ring[0].x;
    let mut sum = 0.0;
    for i in 1..ring.len() - 1 {
        let x = ring[i].x - x0;
        let y1 = ring[i + 1].y;
        let y2 = ring[i - 1].y;
        sum += x * (y2 - y1);
    }
    -sum / 2.0
}

/// Tests whether a closed ring is oriented counter-clockwise.
///
/// Uses the orientation at the highest vertex, so it is robust against
/// rings with collapsed or repeated points. Rings with fewer than three
/// distinct points report `false`.
#[must_use]
pub fn is_ccw(ring: &[Coord]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let n_pts = ring.len() - 1;

    let mut hi_index = 0;
    for i in 1..=n_pts {
        if ring[i].y > ring[hi_index].y {
            hi_index = i;
        }
    }
    let hi_pt = ring[hi_index];

    let mut i_prev = hi_index;
    loop {
        i_prev = if i_prev == 0 { n_pts } else { i_prev - 1 };
        if ring[i_prev] != hi_pt || i_prev == hi_index {
            break;
        }
    }

    let mut i_next = hi_index;
    loop {
        i_next = (i_next + 1) % n_pts;
        if ring[i_next] != hi_pt || i_next == hi_index {
            break;
        }
    }

    let prev = ring[i_prev];
    let next = ring[i_next];
    if prev == hi_pt || next == hi_pt || prev == next {
        return false;
    }

    match orientation_index(&prev, &hi_pt, &next) {
        Orientation::Collinear => prev.x > next.x,
        Orientation::CounterClockwise => true,
        Orientation::Clockwise => false,
    }
}

/// Counts crossings of a rightward ray from a point, detecting when the
/// point lies exactly on a segment.
#[derive(Debug, Clone)]
pub struct RayCrossingCounter {
    p: Coord,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    /// Creates a counter for the given test point.
    #[must_use]
    pub fn new(p: Coord) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    /// Accounts for one ring segment.
    pub fn count_segment(&mut self, p1: &Coord, p2: &Coord) {
        let p = self.p;
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == *p2 {
            self.on_segment = true;
            return;
        }
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if min_x <= p.x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, &p).index();
            if orient == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient > 0 {
                self.crossings += 1;
            }
        }
    }

    /// Returns `true` once the point has been found on a segment.
    #[must_use]
    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    /// Location of the point relative to the counted ring.
    #[must_use]
    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Locates a point relative to a closed ring.
#[must_use]
pub fn locate_point_in_ring(p: &Coord, ring: &[Coord]) -> Location {
    let mut counter = RayCrossingCounter::new(*p);
    for seg in ring.windows(2) {
        counter.count_segment(&seg[0], &seg[1]);
        if counter.is_on_segment() {
            break;
        }
    }
    counter.location()
}

/// Tests whether a point lies inside or on a ring.
#[must_use]
pub fn is_point_in_ring(p: &Coord, ring: &[Coord]) -> bool {
    locate_point_in_ring(p, ring) != Location::Exterior
}

/// Tests whether `p` lies on the closed segment `p0 -> p1`.
#[must_use]
pub fn is_on_segment(p: &Coord, p0: &Coord, p1: &Coord) -> bool {
    if p.x < p0.x.min(p1.x) || p.x > p0.x.max(p1.x) {
        return false;
    }
    if p.y < p0.y.min(p1.y) || p.y > p0.y.max(p1.y) {
        return false;
    }
    orientation_index(p0, p1, p) == Orientation::Collinear
}

/// Tests whether a point lies on any segment of a linestring.
#[must_use]
pub fn is_on_line(p: &Coord, pts: &[Coord]) -> bool {
    if pts.len() == 1 {
        return pts[0] == *p;
    }
    pts.windows(2).any(|seg| is_on_segment(p, &seg[0], &seg[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn square() -> Vec<Coord> {
        vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 10.0), c(0.0, 0.0)]
    }

    #[test]
    fn orientation_basic() {
        let a = c(0.0, 0.0);
        let b = c(1.0, 0.0);
        assert_eq!(orientation_index(&a, &b, &c(0.5, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation_index(&a, &b, &c(0.5, -1.0)), Orientation::Clockwise);
        assert_eq!(orientation_index(&a, &b, &c(7.0, 0.0)), Orientation::Collinear);
    }

    #[test]
    fn orientation_swap_is_consistent_near_collinear() {
        let p1 = c(0.1, 0.1);
        let p2 = c(0.3, 0.3);
        for i in 0..50 {
            let q = c(0.2 + f64::from(i) * 1e-17, 0.2);
            let forward = orientation_index(&p1, &p2, &q);
            let backward = orientation_index(&p2, &p1, &q);
            assert_eq!(forward, backward.reversed(), "q={q:?}");
        }
    }

    #[test]
    fn orientation_of_nearly_collinear_point_is_exact() {
        // The classic failure case for naive floating-point determinants.
        let p1 = c(19.4, 21.4);
        let p2 = c(23.1, 25.1);
        let q = c(20.6, 22.6);
        assert_eq!(orientation_index(&p1, &p2, &q), orientation_index(&p1, &p2, &q));
        assert_eq!(
            orientation_index(&p1, &p2, &q),
            orientation_index(&p2, &q, &p1)
        );
    }

    #[test]
    fn ring_orientation() {
        let ccw = square();
        let cw: Vec<Coord> = ccw.iter().rev().copied().collect();
        assert!(is_ccw(&ccw));
        assert!(!is_ccw(&cw));
        assert!((signed_area(&ccw) - 100.0).abs() < 1e-12);
        assert!((signed_area(&cw) + 100.0).abs() < 1e-12);
    }

    #[test]
    fn ring_orientation_with_repeated_top_vertex() {
        let ring = vec![
            c(0.0, 0.0),
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(10.0, 10.0),
            c(0.0, 10.0),
            c(0.0, 0.0),
        ];
        assert!(is_ccw(&ring));
    }

    #[test]
    fn locate_in_ring() {
        let ring = square();
        assert_eq!(locate_point_in_ring(&c(5.0, 5.0), &ring), Location::Interior);
        assert_eq!(locate_point_in_ring(&c(10.0, 5.0), &ring), Location::Boundary);
        assert_eq!(locate_point_in_ring(&c(0.0, 0.0), &ring), Location::Boundary);
        assert_eq!(locate_point_in_ring(&c(15.0, 5.0), &ring), Location::Exterior);
        assert_eq!(locate_point_in_ring(&c(-1.0, 10.0), &ring), Location::Exterior);
    }

    #[test]
    fn point_on_line() {
        let line = vec![c(0.0, 0.0), c(10.0, 10.0), c(20.0, 0.0)];
        assert!(is_on_line(&c(5.0, 5.0), &line));
        assert!(is_on_line(&c(15.0, 5.0), &line));
        assert!(!is_on_line(&c(5.0, 6.0), &line));
    }
}
