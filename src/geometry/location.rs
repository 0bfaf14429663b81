/// Topological location of a point relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    /// Row/column index of this location in an intersection matrix.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Interior => 0,
            Self::Boundary => 1,
            Self::Exterior => 2,
        }
    }

    /// All locations in matrix order.
    pub const ALL: [Location; 3] = [Self::Interior, Self::Boundary, Self::Exterior];

    /// Single-character symbol (`i`, `b`, `e`).
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Interior => 'i',
            Self::Boundary => 'b',
            Self::Exterior => 'e',
        }
    }
}

/// Formats an optional location, using `-` for an unknown one.
#[must_use]
pub fn location_symbol(loc: Option<Location>) -> char {
    loc.map_or('-', Location::symbol)
}

/// Position relative to a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    On,
    Left,
    Right,
}

impl Position {
    /// Index into a three-slot topology location.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::On => 0,
            Self::Left => 1,
            Self::Right => 2,
        }
    }

    /// The opposite side; `On` is its own opposite.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::On,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_sides() {
        assert_eq!(Position::Left.opposite(), Position::Right);
        assert_eq!(Position::Right.opposite(), Position::Left);
        assert_eq!(Position::On.opposite(), Position::On);
    }

    #[test]
    fn location_indices_follow_matrix_order() {
        let idx: Vec<usize> = Location::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(idx, vec![0, 1, 2]);
        assert_eq!(location_symbol(None), '-');
    }
}
