//! The DE-9IM intersection matrix.

use std::fmt;

use crate::error::{OperationError, Result};
use crate::geometry::{Dimension, Location};

/// Dimensions of the pairwise intersections of the interior, boundary and
/// exterior of two geometries.
///
/// Rows are locations in the first geometry, columns locations in the
/// second, both in the order interior, boundary, exterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionMatrix {
    matrix: [[Dimension; 3]; 3],
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self {
            matrix: [[Dimension::Empty; 3]; 3],
        }
    }
}

fn dimension_value(dim: u8) -> Dimension {
    match dim {
        0 => Dimension::Point,
        1 => Dimension::Curve,
        _ => Dimension::Surface,
    }
}

fn is_true(dim: Dimension) -> bool {
    dim != Dimension::Empty
}

/// Tests one matrix entry against one pattern symbol.
fn matches_symbol(actual: Dimension, symbol: char) -> Result<bool> {
    match symbol.to_ascii_uppercase() {
        '*' => Ok(true),
        'T' => Ok(is_true(actual)),
        s => Dimension::from_symbol(s).map(|d| d == actual).ok_or_else(|| {
            OperationError::InvalidArgument(format!("invalid pattern symbol '{symbol}'")).into()
        }),
    }
}

impl IntersectionMatrix {
    /// Creates a matrix with every entry empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a matrix from nine dimension symbols.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` unless the string has nine
    /// symbols from `F012`.
    pub fn from_symbols(symbols: &str) -> Result<Self> {
        let dims: Vec<Dimension> = symbols
            .chars()
            .map(|c| {
                Dimension::from_symbol(c).ok_or_else(|| {
                    OperationError::InvalidArgument(format!("invalid dimension symbol '{c}'"))
                })
            })
            .collect::<std::result::Result<_, _>>()?;
        if dims.len() != 9 {
            return Err(OperationError::InvalidArgument(format!("matrix needs 9 symbols: {symbols}")).into());
        }
        let mut im = Self::new();
        for (i, dim) in dims.into_iter().enumerate() {
            im.matrix[i / 3][i % 3] = dim;
        }
        Ok(im)
    }

    #[must_use]
    pub fn get(&self, row: Location, col: Location) -> Dimension {
        self.matrix[row.index()][col.index()]
    }

    pub fn set(&mut self, row: Location, col: Location, dim: Dimension) {
        self.matrix[row.index()][col.index()] = dim;
    }

    /// Raises an entry to at least `dim`.
    pub fn set_at_least(&mut self, row: Location, col: Location, dim: Dimension) {
        let entry = &mut self.matrix[row.index()][col.index()];
        if *entry < dim {
            *entry = dim;
        }
    }

    /// Raises an entry if both locations are known.
    pub fn set_at_least_if_valid(&mut self, row: Option<Location>, col: Option<Location>, dim: u8) {
        if let (Some(row), Some(col)) = (row, col) {
            self.set_at_least(row, col, dimension_value(dim));
        }
    }

    /// Raises every entry to at least the dimension in the matching
    /// position of `pattern`; symbols other than `0`, `1` and `2` leave the
    /// entry unchanged.
    pub fn set_at_least_pattern(&mut self, pattern: &str) {
        for (i, symbol) in pattern.chars().take(9).enumerate() {
            if let Some(dim) = Dimension::from_symbol(symbol) {
                let entry = &mut self.matrix[i / 3][i % 3];
                if *entry < dim {
                    *entry = dim;
                }
            }
        }
    }

    /// Sets every entry to `dim`.
    pub fn set_all(&mut self, dim: Dimension) {
        self.matrix = [[dim; 3]; 3];
    }

    /// The matrix with the roles of the two geometries swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = Self::new();
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, dim) in row.iter().enumerate() {
                out.matrix[j][i] = *dim;
            }
        }
        out
    }

    /// Tests the matrix against a nine-symbol pattern of `T`, `F`, `*`,
    /// `0`, `1` and `2`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if the pattern is not nine
    /// valid symbols.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        let symbols: Vec<char> = pattern.chars().collect();
        if symbols.len() != 9 {
            return Err(OperationError::InvalidArgument(format!("pattern needs 9 symbols: {pattern}")).into());
        }
        let mut all = true;
        for (i, symbol) in symbols.into_iter().enumerate() {
            all &= matches_symbol(self.matrix[i / 3][i % 3], symbol)?;
        }
        Ok(all)
    }

    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        use Location::{Boundary as B, Interior as I};
        self.get(I, I) == Dimension::Empty
            && self.get(I, B) == Dimension::Empty
            && self.get(B, I) == Dimension::Empty
            && self.get(B, B) == Dimension::Empty
    }

    #[must_use]
    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    /// The geometries meet only at their boundaries.
    ///
    /// Always `false` when both inputs are points.
    #[must_use]
    pub fn is_touches(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::{Boundary as B, Interior as I};
        if dim_a > dim_b {
            return self.is_touches(dim_b, dim_a);
        }
        let applies = matches!(
            (dim_a, dim_b),
            (Dimension::Surface, Dimension::Surface)
                | (Dimension::Curve, Dimension::Curve | Dimension::Surface)
                | (Dimension::Point, Dimension::Curve | Dimension::Surface)
        );
        applies
            && self.get(I, I) == Dimension::Empty
            && (is_true(self.get(I, B)) || is_true(self.get(B, I)) || is_true(self.get(B, B)))
    }

    /// The interiors meet in a set of lower dimension than the larger
    /// input and each input has interior points outside the other.
    #[must_use]
    pub fn is_crosses(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::{Curve, Point, Surface};
        use Location::{Exterior as E, Interior as I};
        match (dim_a, dim_b) {
            (Point, Curve | Surface) | (Curve, Surface) => is_true(self.get(I, I)) && is_true(self.get(I, E)),
            (Curve | Surface, Point) | (Surface, Curve) => is_true(self.get(I, I)) && is_true(self.get(E, I)),
            (Curve, Curve) => self.get(I, I) == Point,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_within(&self) -> bool {
        use Location::{Boundary as B, Exterior as E, Interior as I};
        is_true(self.get(I, I)) && self.get(I, E) == Dimension::Empty && self.get(B, E) == Dimension::Empty
    }

    #[must_use]
    pub fn is_contains(&self) -> bool {
        use Location::{Boundary as B, Exterior as E, Interior as I};
        is_true(self.get(I, I)) && self.get(E, I) == Dimension::Empty && self.get(E, B) == Dimension::Empty
    }

    fn has_point_in_common(&self) -> bool {
        use Location::{Boundary as B, Interior as I};
        is_true(self.get(I, I)) || is_true(self.get(I, B)) || is_true(self.get(B, I)) || is_true(self.get(B, B))
    }

    #[must_use]
    pub fn is_covers(&self) -> bool {
        use Location::{Boundary as B, Exterior as E, Interior as I};
        self.has_point_in_common() && self.get(E, I) == Dimension::Empty && self.get(E, B) == Dimension::Empty
    }

    #[must_use]
    pub fn is_covered_by(&self) -> bool {
        use Location::{Boundary as B, Exterior as E, Interior as I};
        self.has_point_in_common() && self.get(I, E) == Dimension::Empty && self.get(B, E) == Dimension::Empty
    }

    /// Topological equality; inputs of different dimension are never equal.
    #[must_use]
    pub fn is_equals(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::{Boundary as B, Exterior as E, Interior as I};
        dim_a == dim_b
            && is_true(self.get(I, I))
            && self.get(I, E) == Dimension::Empty
            && self.get(B, E) == Dimension::Empty
            && self.get(E, I) == Dimension::Empty
            && self.get(E, B) == Dimension::Empty
    }

    #[must_use]
    pub fn is_overlaps(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::{Exterior as E, Interior as I};
        match (dim_a, dim_b) {
            (Dimension::Point, Dimension::Point) | (Dimension::Surface, Dimension::Surface) => {
                is_true(self.get(I, I)) && is_true(self.get(I, E)) && is_true(self.get(E, I))
            }
            (Dimension::Curve, Dimension::Curve) => {
                self.get(I, I) == Dimension::Curve && is_true(self.get(I, E)) && is_true(self.get(E, I))
            }
            _ => false,
        }
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.matrix {
            for dim in row {
                write!(f, "{}", dim.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_is_row_major() {
        let im = IntersectionMatrix::from_symbols("212101212").unwrap();
        assert_eq!(im.to_string(), "212101212");
        assert_eq!(im.get(Location::Boundary, Location::Interior), Dimension::Curve);
    }

    #[test]
    fn set_at_least_only_raises() {
        let mut im = IntersectionMatrix::new();
        im.set(Location::Interior, Location::Interior, Dimension::Surface);
        im.set_at_least_pattern("0F1FFFFF2");
        assert_eq!(im.to_string(), "2F1FFFFF2");
        im.set_at_least_if_valid(Some(Location::Boundary), None, 1);
        assert_eq!(im.to_string(), "2F1FFFFF2");
    }

    #[test]
    fn pattern_matching() {
        let im = IntersectionMatrix::from_symbols("212101212").unwrap();
        assert!(im.matches("T*T***T**").unwrap());
        assert!(im.matches("2********").unwrap());
        assert!(!im.matches("F********").unwrap());
        assert!(im.matches("T*T***T*").is_err());
        assert!(im.matches("X********").is_err());
    }

    #[test]
    fn transpose_swaps_roles() {
        let im = IntersectionMatrix::from_symbols("1020F1FF2").unwrap();
        assert_eq!(im.transpose().to_string(), "10F0FF212");
        assert_eq!(im.transpose().transpose(), im);
    }

    #[test]
    fn named_predicates() {
        let overlapping = IntersectionMatrix::from_symbols("212101212").unwrap();
        assert!(overlapping.is_overlaps(Dimension::Surface, Dimension::Surface));
        assert!(overlapping.is_intersects());
        assert!(!overlapping.is_within());

        let touching = IntersectionMatrix::from_symbols("FF2F11212").unwrap();
        assert!(touching.is_touches(Dimension::Surface, Dimension::Surface));
        assert!(!touching.is_touches(Dimension::Point, Dimension::Point));

        let inside = IntersectionMatrix::from_symbols("2FF1FF212").unwrap();
        assert!(inside.is_within());
        assert!(inside.is_covered_by());
        assert!(inside.transpose().is_contains());
        assert!(inside.transpose().is_covers());

        let equal = IntersectionMatrix::from_symbols("2FFF1FFF2").unwrap();
        assert!(equal.is_equals(Dimension::Surface, Dimension::Surface));
        assert!(!equal.is_equals(Dimension::Surface, Dimension::Curve));

        let crossing = IntersectionMatrix::from_symbols("0F1FF0102").unwrap();
        assert!(crossing.is_crosses(Dimension::Curve, Dimension::Curve));
    }
}
