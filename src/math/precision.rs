use std::cmp::Ordering;

use super::Coord;
use crate::error::{GeometryError, Result};

/// The grid onto which computed coordinates are snapped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full double precision.
    #[default]
    Floating,
    /// Single (32-bit) float precision.
    FloatingSingle,
    /// A fixed grid with `scale` cells per unit.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Creates a fixed precision model.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPrecision` unless `scale` is finite and positive.
    pub fn fixed(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeometryError::InvalidPrecision(scale).into());
        }
        Ok(Self::Fixed { scale })
    }

    /// Returns `true` for either floating model.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        !matches!(self, Self::Fixed { .. })
    }

    /// Returns the grid scale, or `None` for floating models.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match self {
            Self::Fixed { scale } => Some(*scale),
            _ => None,
        }
    }

    /// Rounds a single ordinate onto the grid.
    #[must_use]
    pub fn make_precise(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        match self {
            Self::Floating => value,
            #[allow(clippy::cast_possible_truncation)]
            Self::FloatingSingle => f64::from(value as f32),
            // Round half up, so that -0.5 snaps to 0 rather than -1.
            Self::Fixed { scale } => ((value * scale) + 0.5).floor() / scale,
        }
    }

    /// Rounds both ordinates of a coordinate onto the grid.
    #[must_use]
    pub fn make_precise_coord(&self, c: Coord) -> Coord {
        if matches!(self, Self::Floating) {
            return c;
        }
        Coord::new(self.make_precise(c.x), self.make_precise(c.y))
    }

    /// Number of significant decimal digits the model can represent.
    #[must_use]
    pub fn maximum_significant_digits(&self) -> i32 {
        match self {
            Self::Floating => 16,
            Self::FloatingSingle => 6,
            #[allow(clippy::cast_possible_truncation)]
            Self::Fixed { scale } => 1 + scale.log10().ceil() as i32,
        }
    }

    /// Orders models by how much precision they retain.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.maximum_significant_digits()
            .cmp(&other.maximum_significant_digits())
    }

    /// Returns the more precise of two models.
    #[must_use]
    pub fn most_precise(self, other: Self) -> Self {
        if self.compare(&other) == Ordering::Less {
            other
        } else {
            self
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn floating_is_identity() {
        let pm = PrecisionModel::Floating;
        let c = Coord::new(1.234_567_890_123, -9.876_543_21);
        assert_eq!(pm.make_precise_coord(c), c);
    }

    #[test]
    fn fixed_rounds_to_grid() {
        let pm = PrecisionModel::fixed(100.0).unwrap();
        let c = pm.make_precise_coord(Coord::new(-2.769_481_895, 37.302_294));
        assert!((c.x - -2.77).abs() < 1e-12);
        assert!((c.y - 37.30).abs() < 1e-12);
    }

    #[test]
    fn fixed_rounds_half_up() {
        let pm = PrecisionModel::fixed(1.0).unwrap();
        assert!((pm.make_precise(-0.5)).abs() < f64::EPSILON);
        assert!((pm.make_precise(2.5) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn make_precise_is_idempotent() {
        let models = [
            PrecisionModel::Floating,
            PrecisionModel::FloatingSingle,
            PrecisionModel::fixed(1000.0).unwrap(),
            PrecisionModel::fixed(0.5).unwrap(),
        ];
        let samples = [0.1, -7.333_333_3, 1e9 + 0.123, 123.456_789, -0.000_49];
        for pm in models {
            for &v in &samples {
                let once = pm.make_precise(v);
                assert_eq!(pm.make_precise(once).to_bits(), once.to_bits(), "{pm:?} {v}");
            }
        }
    }

    #[test]
    fn invalid_scale_is_rejected() {
        assert!(PrecisionModel::fixed(0.0).is_err());
        assert!(PrecisionModel::fixed(f64::NAN).is_err());
        assert!(PrecisionModel::fixed(-10.0).is_err());
    }

    #[test]
    fn most_precise_prefers_floating() {
        let fixed = PrecisionModel::fixed(10.0).unwrap();
        assert_eq!(
            fixed.most_precise(PrecisionModel::Floating),
            PrecisionModel::Floating
        );
        assert_eq!(
            PrecisionModel::FloatingSingle.most_precise(fixed),
            PrecisionModel::FloatingSingle
        );
    }
}
