pub mod common_bits;
pub mod dd;
pub mod line_intersector;
pub mod orientation;
pub mod precision;

pub use common_bits::CommonBits;
pub use line_intersector::{IntersectionKind, LineIntersector};
pub use orientation::Orientation;
pub use precision::PrecisionModel;

use std::cmp::Ordering;

/// 2D coordinate type.
pub type Coord = nalgebra::Point2<f64>;

/// Total lexicographic (x, then y) order over coordinates.
///
/// Signed zeros compare equal so that keys agree with `==` on `Coord`.
#[must_use]
pub fn compare_coords(a: &Coord, b: &Coord) -> Ordering {
    (a.x + 0.0)
        .total_cmp(&(b.x + 0.0))
        .then_with(|| (a.y + 0.0).total_cmp(&(b.y + 0.0)))
}

/// Ordered map key wrapping a coordinate.
#[derive(Debug, Clone, Copy)]
pub struct CoordKey(pub Coord);

impl PartialEq for CoordKey {
    fn eq(&self, other: &Self) -> bool {
        compare_coords(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for CoordKey {}

impl PartialOrd for CoordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CoordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_coords(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_order_is_x_then_y() {
        let a = Coord::new(0.0, 5.0);
        let b = Coord::new(1.0, 0.0);
        let c = Coord::new(1.0, 2.0);
        assert_eq!(compare_coords(&a, &b), Ordering::Less);
        assert_eq!(compare_coords(&b, &c), Ordering::Less);
        assert_eq!(compare_coords(&c, &c), Ordering::Equal);
    }

    #[test]
    fn signed_zero_keys_are_equal() {
        assert_eq!(
            CoordKey(Coord::new(-0.0, 1.0)),
            CoordKey(Coord::new(0.0, 1.0))
        );
    }
}
