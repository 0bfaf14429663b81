use super::segment_string::NodedSegmentString;
use super::Noder;
use crate::error::{GeometryError, Result};
use crate::math::Coord;

/// Wraps a noder that requires integer coordinates.
///
/// Input is translated by `-offset`, multiplied by `scale` and rounded;
/// the noded output is mapped back with `x / scale + offset`.
#[derive(Debug, Clone)]
pub struct ScaledNoder<N> {
    noder: N,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl<N: Noder> ScaledNoder<N> {
    /// Creates a scaled noder without offset.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPrecision` unless `scale` is finite and positive.
    pub fn new(noder: N, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeometryError::InvalidPrecision(scale).into());
        }
        Ok(Self {
            noder,
            scale,
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    /// Sets the translation applied before scaling.
    #[must_use]
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    fn is_integer_precision(&self) -> bool {
        self.scale == 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }

    fn scale_coords(&self, pts: &[Coord]) -> Vec<Coord> {
        let mut out: Vec<Coord> = Vec::with_capacity(pts.len());
        for p in pts {
            let scaled = Coord::new(
                ((p.x - self.offset_x) * self.scale).round(),
                ((p.y - self.offset_y) * self.scale).round(),
            );
            if out.last() != Some(&scaled) {
                out.push(scaled);
            }
        }
        out
    }

    fn rescale_coords(&self, pts: &[Coord]) -> Vec<Coord> {
        pts.iter()
            .map(|p| Coord::new(p.x / self.scale + self.offset_x, p.y / self.scale + self.offset_y))
            .collect()
    }
}

impl<N: Noder> Noder for ScaledNoder<N> {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString>) -> Result<()> {
        if self.is_integer_precision() {
            return self.noder.compute_nodes(strings);
        }
        let scaled = strings
            .iter()
            .map(|ss| NodedSegmentString::new(self.scale_coords(ss.coords()), ss.context()))
            .collect();
        self.noder.compute_nodes(scaled)
    }

    fn noded_substrings(&self) -> Vec<NodedSegmentString> {
        let split = self.noder.noded_substrings();
        if self.is_integer_precision() {
            return split;
        }
        split
            .iter()
            .map(|ss| NodedSegmentString::new(self.rescale_coords(ss.coords()), ss.context()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::PrecisionModel;
    use crate::noding::SnapRoundingNoder;
    use approx::assert_relative_eq;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn snap_noder() -> SnapRoundingNoder {
        SnapRoundingNoder::new(PrecisionModel::fixed(1.0).unwrap()).unwrap()
    }

    #[test]
    fn output_is_rescaled_to_input_units() {
        let mut noder = ScaledNoder::new(snap_noder(), 100.0).unwrap();
        noder
            .compute_nodes(vec![
                NodedSegmentString::new(vec![c(0.0, 0.0), c(0.1, 0.03)], 0),
                NodedSegmentString::new(vec![c(0.0, 0.03), c(0.1, 0.0)], 1),
            ])
            .unwrap();
        let parts = noder.noded_substrings();
        assert_eq!(parts.len(), 4);
        let end = parts[0].coords()[parts[0].len() - 1];
        assert_relative_eq!(end.x, 0.05, epsilon = 1e-12);
        assert_relative_eq!(end.y, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn offset_round_trips() {
        let mut noder = ScaledNoder::new(snap_noder(), 10.0).unwrap().with_offset(1000.0, 2000.0);
        noder
            .compute_nodes(vec![NodedSegmentString::new(vec![c(1000.5, 2000.5), c(1001.0, 2001.0)], 3)])
            .unwrap();
        let parts = noder.noded_substrings();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].context(), 3);
        assert_relative_eq!(parts[0].coords()[0].x, 1000.5, epsilon = 1e-9);
        assert_relative_eq!(parts[0].coords()[1].y, 2001.0, epsilon = 1e-9);
    }

    #[test]
    fn collapsed_strings_vanish() {
        let mut noder = ScaledNoder::new(snap_noder(), 1.0).unwrap().with_offset(0.0, 0.5);
        noder
            .compute_nodes(vec![NodedSegmentString::new(vec![c(0.1, 0.6), c(0.2, 0.7)], 0)])
            .unwrap();
        assert!(noder.noded_substrings().is_empty());
    }

    #[test]
    fn invalid_scale_is_rejected() {
        assert!(ScaledNoder::new(snap_noder(), 0.0).is_err());
    }
}
