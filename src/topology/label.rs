//! Topological labels of graph components.
//!
//! A label records, for each of the two input geometries, where a node or
//! edge lies relative to that geometry. Labels are plain values: every
//! update returns a new label.

use std::fmt;

use crate::geometry::location::location_symbol;
use crate::geometry::{Location, Position};

/// Locations of a component relative to one geometry.
///
/// A line location has only an `On` entry; an area location also has
/// `Left` and `Right` entries for the faces either side of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyLocation {
    locs: [Option<Location>; 3],
    area: bool,
}

impl TopologyLocation {
    #[must_use]
    pub fn line(on: Option<Location>) -> Self {
        Self {
            locs: [on, None, None],
            area: false,
        }
    }

    #[must_use]
    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self {
            locs: [on, left, right],
            area: true,
        }
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Location> {
        self.locs[pos.index()]
    }

    #[must_use]
    pub fn is_area(&self) -> bool {
        self.area
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        !self.area
    }

    fn slots(&self) -> &[Option<Location>] {
        if self.area {
            &self.locs
        } else {
            &self.locs[..1]
        }
    }

    /// `true` if every location is unknown.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.slots().iter().all(Option::is_none)
    }

    /// `true` if any location is unknown.
    #[must_use]
    pub fn is_any_null(&self) -> bool {
        self.slots().iter().any(Option::is_none)
    }

    #[must_use]
    pub fn all_positions_equal(&self, loc: Location) -> bool {
        self.slots().iter().all(|l| *l == Some(loc))
    }

    #[must_use]
    pub fn with(mut self, pos: Position, loc: Option<Location>) -> Self {
        if pos == Position::On || self.area {
            self.locs[pos.index()] = loc;
        }
        self
    }

    #[must_use]
    pub fn with_all(mut self, loc: Option<Location>) -> Self {
        for slot in self.slots_mut() {
            *slot = loc;
        }
        self
    }

    #[must_use]
    pub fn with_all_if_null(mut self, loc: Option<Location>) -> Self {
        for slot in self.slots_mut() {
            if slot.is_none() {
                *slot = loc;
            }
        }
        self
    }

    fn slots_mut(&mut self) -> &mut [Option<Location>] {
        if self.area {
            &mut self.locs
        } else {
            &mut self.locs[..1]
        }
    }

    /// Swaps the left and right sides.
    #[must_use]
    pub fn flipped(mut self) -> Self {
        if self.area {
            self.locs.swap(1, 2);
        }
        self
    }

    /// Fills unknown locations from `other`, promoting a line location to
    /// an area location if `other` is an area.
    #[must_use]
    pub fn merged(mut self, other: &TopologyLocation) -> Self {
        if other.area && !self.area {
            self.area = true;
            self.locs[1] = None;
            self.locs[2] = None;
        }
        for i in 0..self.slots().len() {
            if self.locs[i].is_none() && (i == 0 || other.area) {
                self.locs[i] = other.locs[i];
            }
        }
        self
    }

    /// Drops the side locations.
    #[must_use]
    pub fn to_line(self) -> Self {
        Self::line(self.locs[0])
    }
}

impl fmt::Display for TopologyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.area {
            write!(
                f,
                "{}{}{}",
                location_symbol(self.locs[1]),
                location_symbol(self.locs[0]),
                location_symbol(self.locs[2])
            )
        } else {
            write!(f, "{}", location_symbol(self.locs[0]))
        }
    }
}

/// Locations of a component relative to both input geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl Default for Label {
    fn default() -> Self {
        Self::line_both(None)
    }
}

impl Label {
    /// Line label with the same `On` location for both geometries.
    #[must_use]
    pub fn line_both(on: Option<Location>) -> Self {
        Self {
            elt: [TopologyLocation::line(on), TopologyLocation::line(on)],
        }
    }

    /// Area label with the same locations for both geometries.
    #[must_use]
    pub fn area_both(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self {
            elt: [
                TopologyLocation::area(on, left, right),
                TopologyLocation::area(on, left, right),
            ],
        }
    }

    /// Line label for geometry `geom_index`; the other geometry is unknown.
    #[must_use]
    pub fn on(geom_index: usize, on: Location) -> Self {
        Self::default().with_location(geom_index, Position::On, Some(on))
    }

    /// Area label for geometry `geom_index`; the other geometry is an
    /// unknown area.
    #[must_use]
    pub fn area(geom_index: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Self::area_both(None, None, None);
        label.elt[geom_index] = TopologyLocation::area(Some(on), Some(left), Some(right));
        label
    }

    /// The `On` location for a geometry.
    #[must_use]
    pub fn on_location(&self, geom_index: usize) -> Option<Location> {
        self.elt[geom_index].get(Position::On)
    }

    #[must_use]
    pub fn location(&self, geom_index: usize, pos: Position) -> Option<Location> {
        self.elt[geom_index].get(pos)
    }

    #[must_use]
    pub fn with_location(mut self, geom_index: usize, pos: Position, loc: Option<Location>) -> Self {
        self.elt[geom_index] = self.elt[geom_index].with(pos, loc);
        self
    }

    #[must_use]
    pub fn with_all_locations(mut self, geom_index: usize, loc: Option<Location>) -> Self {
        self.elt[geom_index] = self.elt[geom_index].with_all(loc);
        self
    }

    #[must_use]
    pub fn with_all_locations_if_null(mut self, geom_index: usize, loc: Option<Location>) -> Self {
        self.elt[geom_index] = self.elt[geom_index].with_all_if_null(loc);
        self
    }

    /// Swaps left and right for both geometries.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            elt: [self.elt[0].flipped(), self.elt[1].flipped()],
        }
    }

    /// Fills unknown locations from `other`.
    #[must_use]
    pub fn merged(self, other: &Label) -> Self {
        Self {
            elt: [self.elt[0].merged(&other.elt[0]), self.elt[1].merged(&other.elt[1])],
        }
    }

    /// Converts the entry for one geometry to a line location.
    #[must_use]
    pub fn to_line(mut self, geom_index: usize) -> Self {
        if self.elt[geom_index].is_area() {
            self.elt[geom_index] = self.elt[geom_index].to_line();
        }
        self
    }

    /// The same `On` locations with every entry a line.
    #[must_use]
    pub fn to_line_label(self) -> Self {
        Self {
            elt: [self.elt[0].to_line(), self.elt[1].to_line()],
        }
    }

    /// Number of geometries with a non-null entry.
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.elt.iter().filter(|e| !e.is_null()).count()
    }

    #[must_use]
    pub fn is_null(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_null()
    }

    #[must_use]
    pub fn is_any_null(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_any_null()
    }

    /// `true` if either entry is an area.
    #[must_use]
    pub fn is_area(&self) -> bool {
        self.elt[0].is_area() || self.elt[1].is_area()
    }

    #[must_use]
    pub fn is_area_of(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_area()
    }

    #[must_use]
    pub fn is_line(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_line()
    }

    #[must_use]
    pub fn all_positions_equal(&self, geom_index: usize, loc: Location) -> bool {
        self.elt[geom_index].all_positions_equal(loc)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A:{} B:{}", self.elt[0], self.elt[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_swaps_sides() {
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        let flipped = label.flipped();
        assert_eq!(flipped.location(0, Position::Left), Some(Location::Interior));
        assert_eq!(flipped.location(0, Position::Right), Some(Location::Exterior));
        assert_eq!(flipped.flipped(), label);
    }

    #[test]
    fn merge_fills_only_unknowns() {
        let a = Label::on(0, Location::Interior);
        let b = Label::area(1, Location::Boundary, Location::Interior, Location::Exterior)
            .with_location(0, Position::On, Some(Location::Exterior));
        let merged = a.merged(&b);
        assert_eq!(merged.on_location(0), Some(Location::Interior));
        assert_eq!(merged.location(1, Position::Left), Some(Location::Interior));
        assert!(merged.is_area_of(1));
    }

    #[test]
    fn line_merged_with_area_is_promoted() {
        let line = Label::on(0, Location::Boundary);
        let area = Label::area(0, Location::Boundary, Location::Interior, Location::Exterior);
        let merged = line.merged(&area);
        assert!(merged.is_area_of(0));
        assert_eq!(merged.location(0, Position::Right), Some(Location::Exterior));
    }

    #[test]
    fn null_checks_and_counts() {
        let label = Label::on(1, Location::Interior);
        assert!(label.is_null(0));
        assert!(!label.is_null(1));
        assert_eq!(label.geometry_count(), 1);
        let filled = label.with_all_locations_if_null(0, Some(Location::Exterior));
        assert_eq!(filled.geometry_count(), 2);
        assert_eq!(filled.on_location(0), Some(Location::Exterior));
    }

    #[test]
    fn to_line_keeps_on_location() {
        let label = Label::area(0, Location::Boundary, Location::Interior, Location::Exterior);
        let line = label.to_line(0);
        assert!(line.is_line(0));
        assert_eq!(line.on_location(0), Some(Location::Boundary));
        assert_eq!(line.location(0, Position::Left), None);
    }

    #[test]
    fn display_shows_sides() {
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        assert_eq!(label.to_string(), "A:ebi B:---");
    }
}
