//! Overlay with a retry at enhanced precision.
//!
//! Coordinates far from the origin waste mantissa bits on their shared
//! leading digits. Translating both inputs by the common bits of all
//! their ordinates frees those bits for the computation, which often lets
//! an overlay that failed with a robustness error succeed.

use tracing::warn;

use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::{CommonBits, Coord, PrecisionModel};
use crate::operations::overlay::{Overlay, OverlayOpCode};
use crate::operations::valid::IsValid;

/// Removes the bits shared by every ordinate of a set of geometries, and
/// adds them back to results computed in the translated space.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonBitsRemover {
    x: CommonBits,
    y: CommonBits,
}

impl CommonBitsRemover {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the coordinates of `geom` into the common bits.
    pub fn add(&mut self, geom: &Geometry) {
        for c in geom.coords() {
            self.x.add(c.x);
            self.y.add(c.y);
        }
    }

    /// The coordinate made of the common bits of each ordinate.
    #[must_use]
    pub fn common_coordinate(&self) -> Coord {
        Coord::new(self.x.common(), self.y.common())
    }

    /// Translates `geom` so that the common coordinate becomes the origin.
    #[must_use]
    pub fn remove_common_bits(&self, geom: &Geometry) -> Geometry {
        let common = self.common_coordinate();
        if common.x == 0.0 && common.y == 0.0 {
            return geom.clone();
        }
        geom.map_coords(&|c| Coord::new(c.x - common.x, c.y - common.y))
    }

    /// Translates `geom` back to the original coordinate space.
    #[must_use]
    pub fn add_common_bits(&self, geom: &Geometry) -> Geometry {
        let common = self.common_coordinate();
        geom.map_coords(&|c| Coord::new(c.x + common.x, c.y + common.y))
    }
}

/// Overlay operations that retry with common bits removed when the plain
/// computation hits a topology error.
pub struct EnhancedPrecisionOp;

impl EnhancedPrecisionOp {
    /// # Errors
    ///
    /// See [`EnhancedPrecisionOp::overlay`].
    pub fn intersection(a: &Geometry, b: &Geometry) -> Result<Geometry> {
        Self::overlay(a, b, OverlayOpCode::Intersection, PrecisionModel::Floating)
    }

    /// # Errors
    ///
    /// See [`EnhancedPrecisionOp::overlay`].
    pub fn union(a: &Geometry, b: &Geometry) -> Result<Geometry> {
        Self::overlay(a, b, OverlayOpCode::Union, PrecisionModel::Floating)
    }

    /// # Errors
    ///
    /// See [`EnhancedPrecisionOp::overlay`].
    pub fn difference(a: &Geometry, b: &Geometry) -> Result<Geometry> {
        Self::overlay(a, b, OverlayOpCode::Difference, PrecisionModel::Floating)
    }

    /// # Errors
    ///
    /// See [`EnhancedPrecisionOp::overlay`].
    pub fn sym_difference(a: &Geometry, b: &Geometry) -> Result<Geometry> {
        Self::overlay(a, b, OverlayOpCode::SymDifference, PrecisionModel::Floating)
    }

    /// Runs `op`, retrying once in the translated space on a topology
    /// error. The retried result is only accepted if it is valid.
    ///
    /// # Errors
    ///
    /// Returns the error of the first attempt if the retry fails too or
    /// yields an invalid geometry. Errors other than topology errors are
    /// returned without a retry.
    pub fn overlay(a: &Geometry, b: &Geometry, op: OverlayOpCode, precision: PrecisionModel) -> Result<Geometry> {
        let original = match Overlay::new(a, b, op).with_precision(precision).execute() {
            Ok(result) => return Ok(result),
            Err(err) if err.is_topology() => err,
            Err(err) => return Err(err),
        };
        warn!(?op, error = %original, "overlay failed, retrying with common bits removed");

        let mut remover = CommonBitsRemover::new();
        remover.add(a);
        remover.add(b);
        let shifted_a = remover.remove_common_bits(a);
        let shifted_b = remover.remove_common_bits(b);
        let Ok(shifted) = Overlay::new(&shifted_a, &shifted_b, op).with_precision(precision).execute() else {
            return Err(original);
        };
        let result = remover.add_common_bits(&shifted);
        if !IsValid::new(&result).execute() {
            warn!(?op, "retried overlay result is invalid");
            return Err(original);
        }
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::operations::predicate::equals_topo;

    #[test]
    fn common_bits_are_removed_and_restored() {
        let a = Geometry::rectangle(1_000_000.0, 1_000_000.0, 1_000_010.0, 1_000_010.0);
        let mut remover = CommonBitsRemover::new();
        remover.add(&a);
        let common = remover.common_coordinate();
        assert!(common.x > 0.0 && common.x <= 1_000_000.0);

        let shifted = remover.remove_common_bits(&a);
        let env = shifted.envelope();
        assert!(env.max_x() < 1_000_000.0);
        assert_relative_eq!(env.width(), 10.0);
        assert!(remover.add_common_bits(&shifted).equals_exact(&a, 0.0));
    }

    #[test]
    fn mixed_signs_share_no_bits() {
        let mut remover = CommonBitsRemover::new();
        remover.add(&Geometry::line_string(&[(-5.0, 3.0), (5.0, 3.0)]));
        let common = remover.common_coordinate();
        assert_eq!(common.x, 0.0);
        assert_eq!(common.y, 3.0);
    }

    #[test]
    fn well_conditioned_overlay_needs_no_retry() {
        let a = Geometry::rectangle(0.0, 0.0, 10.0, 10.0);
        let b = Geometry::rectangle(5.0, 5.0, 15.0, 15.0);
        let inter = EnhancedPrecisionOp::intersection(&a, &b).unwrap();
        assert!(equals_topo(&inter, &Geometry::rectangle(5.0, 5.0, 10.0, 10.0)).unwrap());
        let union = EnhancedPrecisionOp::union(&a, &b).unwrap();
        assert!(equals_topo(&union, &a.union(&b).unwrap()).unwrap());
        assert!(EnhancedPrecisionOp::difference(&a, &a).unwrap().is_empty());
        assert!(EnhancedPrecisionOp::sym_difference(&a, &a).unwrap().is_empty());
    }

    #[test]
    fn argument_errors_are_not_retried() {
        let gc = Geometry::GeometryCollection(vec![Geometry::point(0.0, 0.0)]);
        let err = EnhancedPrecisionOp::union(&gc, &gc).unwrap_err();
        assert!(!err.is_topology());
    }
}
