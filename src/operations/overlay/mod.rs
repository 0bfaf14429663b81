//! Boolean set operations on two geometries.

mod engine;
mod line_builder;
mod point_builder;
mod polygon_builder;
mod select;

pub use polygon_builder::PolygonBuilder;
pub use select::{is_label_in_result, is_result_of_op, OverlayOpCode};

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{Geometry, GeometryFactory};
use crate::math::PrecisionModel;

use engine::{empty_result, overlay_execute};

/// Computes the overlay of two geometries.
pub struct Overlay<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
    op: OverlayOpCode,
    precision: PrecisionModel,
}

impl<'a> Overlay<'a> {
    /// Creates a new `Overlay` operation with a floating result precision.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry, op: OverlayOpCode) -> Self {
        Self {
            a,
            b,
            op,
            precision: PrecisionModel::default(),
        }
    }

    /// Sets the precision model computed intersection points are rounded to.
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.precision = precision;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::GeometryCollectionArgument` for a
    /// heterogeneous collection input, or a `TopologyError` if robustness
    /// problems leave the noded graph inconsistent.
    pub fn execute(&self) -> Result<Geometry> {
        if self.a.is_geometry_collection() || self.b.is_geometry_collection() {
            return Err(OperationError::GeometryCollectionArgument.into());
        }
        let factory = GeometryFactory::new(self.precision);
        if let Some(result) = self.empty_input_result(&factory) {
            debug!(op = ?self.op, "overlay of empty input");
            return Ok(result);
        }
        overlay_execute(self.a, self.b, self.op, &factory)
    }

    fn empty_input_result(&self, factory: &GeometryFactory) -> Option<Geometry> {
        let (a, b) = (self.a, self.b);
        let empty = || empty_result(self.op, a, b, factory);
        match (a.is_empty(), b.is_empty(), self.op) {
            (false, false, _) => None,
            (true, true, _) | (_, _, OverlayOpCode::Intersection) | (true, false, OverlayOpCode::Difference) => {
                Some(empty())
            }
            (false, true, _) => Some(a.clone()),
            (true, false, _) => Some(b.clone()),
        }
    }
}

impl Geometry {
    /// The point set common to both geometries.
    ///
    /// # Errors
    ///
    /// See [`Overlay::execute`].
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry> {
        Overlay::new(self, other, OverlayOpCode::Intersection).execute()
    }

    /// The point set of either geometry.
    ///
    /// # Errors
    ///
    /// See [`Overlay::execute`].
    pub fn union(&self, other: &Geometry) -> Result<Geometry> {
        Overlay::new(self, other, OverlayOpCode::Union).execute()
    }

    /// The points of this geometry not in `other`.
    ///
    /// # Errors
    ///
    /// See [`Overlay::execute`].
    pub fn difference(&self, other: &Geometry) -> Result<Geometry> {
        Overlay::new(self, other, OverlayOpCode::Difference).execute()
    }

    /// The points in exactly one of the geometries.
    ///
    /// # Errors
    ///
    /// See [`Overlay::execute`].
    pub fn sym_difference(&self, other: &Geometry) -> Result<Geometry> {
        Overlay::new(self, other, OverlayOpCode::SymDifference).execute()
    }
}
