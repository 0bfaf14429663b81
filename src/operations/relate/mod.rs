//! DE-9IM relate computation.

mod bundle;
mod computer;
mod edge_end_builder;
mod matrix;

pub use bundle::{EdgeEndBundle, EdgeEndBundleStar, RelateNode};
pub use computer::RelateComputer;
pub use edge_end_builder::compute_edge_ends;
pub use matrix::IntersectionMatrix;

use crate::error::{OperationError, Result};
use crate::geometry::{BoundaryNodeRule, Geometry};

/// Computes the intersection matrix of two geometries.
pub struct Relate<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
    rule: BoundaryNodeRule,
}

impl<'a> Relate<'a> {
    /// Creates a new `Relate` operation using the mod-2 boundary rule.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self {
            a,
            b,
            rule: BoundaryNodeRule::default(),
        }
    }

    /// Sets the rule deciding which line endpoints are boundary points.
    #[must_use]
    pub fn with_boundary_node_rule(mut self, rule: BoundaryNodeRule) -> Self {
        self.rule = rule;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::GeometryCollectionArgument` if either input
    /// is a heterogeneous collection, or a `TopologyError` if the inputs
    /// are too invalid to label.
    pub fn execute(&self) -> Result<IntersectionMatrix> {
        if self.a.is_geometry_collection() || self.b.is_geometry_collection() {
            return Err(OperationError::GeometryCollectionArgument.into());
        }
        RelateComputer::new(self.a, self.b, self.rule).compute()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn relate_is_transposed_when_swapped() {
        let a = Geometry::rectangle(0.0, 0.0, 10.0, 10.0);
        let b = Geometry::line_string(&[(-5.0, 5.0), (5.0, 5.0)]);
        let ab = Relate::new(&a, &b).execute().unwrap();
        let ba = Relate::new(&b, &a).execute().unwrap();
        assert_eq!(ab.transpose(), ba);
        assert_eq!(ab.to_string(), "1020F1102");
    }

    #[test]
    fn collections_are_rejected() {
        let a = Geometry::GeometryCollection(vec![Geometry::point(0.0, 0.0)]);
        let b = Geometry::point(0.0, 0.0);
        let err = Relate::new(&a, &b).execute().unwrap_err();
        assert!(matches!(
            err,
            crate::TopolisError::Operation(OperationError::GeometryCollectionArgument)
        ));
    }

    #[test]
    fn endpoint_rule_changes_closed_line_boundary() {
        let ring = Geometry::line_string(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]);
        let pt = Geometry::point(0.0, 0.0);
        let mod2 = Relate::new(&ring, &pt).execute().unwrap();
        assert!(mod2.matches("0F1FFF***").unwrap());
        let endpoint = Relate::new(&ring, &pt)
            .with_boundary_node_rule(BoundaryNodeRule::EndPoint)
            .execute()
            .unwrap();
        assert!(endpoint.matches("FF10FF***").unwrap());
    }
}
