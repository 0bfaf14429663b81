use crate::geometry::{Location, Position};

use super::label::Label;

const NULL_DEPTH: i32 = -1;

/// Depth of each side of an edge in each input geometry.
///
/// When identical edges from several inputs are merged, the depth counts
/// how many area interiors lie on each side; normalizing yields the final
/// side locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    depth: [[i32; 3]; 2],
}

impl Default for Depth {
    fn default() -> Self {
        Self {
            depth: [[NULL_DEPTH; 3]; 2],
        }
    }
}

fn depth_at_location(loc: Location) -> i32 {
    match loc {
        Location::Exterior => 0,
        Location::Interior => 1,
        Location::Boundary => NULL_DEPTH,
    }
}

impl Depth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn depth(&self, geom_index: usize, pos: Position) -> i32 {
        self.depth[geom_index][pos.index()]
    }

    /// Location implied by the depth of one side.
    #[must_use]
    pub fn location(&self, geom_index: usize, pos: Position) -> Location {
        if self.depth(geom_index, pos) <= 0 {
            Location::Exterior
        } else {
            Location::Interior
        }
    }

    /// `true` if no depth has been recorded.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.depth.iter().flatten().all(|d| *d == NULL_DEPTH)
    }

    #[must_use]
    pub fn is_null_for(&self, geom_index: usize) -> bool {
        self.depth[geom_index][1] == NULL_DEPTH
    }

    /// Accumulates the side locations of `label`.
    pub fn add(&mut self, label: &Label) {
        for geom_index in 0..2 {
            for pos in [Position::Left, Position::Right] {
                let Some(loc) = label.location(geom_index, pos) else {
                    continue;
                };
                if loc == Location::Boundary {
                    continue;
                }
                let slot = &mut self.depth[geom_index][pos.index()];
                if *slot == NULL_DEPTH {
                    *slot = depth_at_location(loc);
                } else {
                    *slot += depth_at_location(loc);
                }
            }
        }
    }

    /// Right depth minus left depth.
    #[must_use]
    pub fn delta(&self, geom_index: usize) -> i32 {
        self.depth[geom_index][Position::Right.index()] - self.depth[geom_index][Position::Left.index()]
    }

    /// Reduces depths to 0 or 1 relative to the shallower side.
    pub fn normalize(&mut self) {
        for geom_index in 0..2 {
            if self.is_null_for(geom_index) {
                continue;
            }
            let left = self.depth[geom_index][Position::Left.index()];
            let right = self.depth[geom_index][Position::Right.index()];
            let min_depth = left.min(right).max(0);
            for slot in &mut self.depth[geom_index][1..] {
                *slot = i32::from(*slot > min_depth);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_area_edges_accumulate() {
        let mut depth = Depth::new();
        assert!(depth.is_null());
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        depth.add(&label);
        depth.add(&label);
        assert_eq!(depth.depth(0, Position::Right), 2);
        assert_eq!(depth.depth(0, Position::Left), 0);
        assert_eq!(depth.delta(0), 2);
        depth.normalize();
        assert_eq!(depth.depth(0, Position::Right), 1);
        assert_eq!(depth.location(0, Position::Right), Location::Interior);
        assert_eq!(depth.location(0, Position::Left), Location::Exterior);
    }

    #[test]
    fn opposite_edges_cancel() {
        let mut depth = Depth::new();
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        depth.add(&label);
        depth.add(&label.flipped());
        assert_eq!(depth.delta(0), 0);
        assert!(depth.is_null_for(1));
    }
}
