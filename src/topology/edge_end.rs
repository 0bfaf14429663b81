//! Edge ends and the labelling of the stars of edge ends around a node.

use std::cmp::Ordering;

use crate::error::{Result, TopologyError};
use crate::geometry::{Geometry, Location, Position, SimplePointInAreaLocator};
use crate::math::orientation::orientation_index;
use crate::math::{Coord, Orientation};

use super::label::Label;

/// Quadrant of a direction vector, numbered counter-clockwise from the
/// positive x axis.
#[must_use]
pub fn quadrant(dx: f64, dy: f64) -> u8 {
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

/// The end of an edge at a node: the node coordinate `p0`, the direction
/// towards `p1`, and a label.
#[derive(Debug, Clone, Copy)]
pub struct EdgeEnd {
    pub label: Label,
    p0: Coord,
    p1: Coord,
    dx: f64,
    dy: f64,
    quadrant: u8,
}

impl EdgeEnd {
    #[must_use]
    pub fn new(p0: Coord, p1: Coord, label: Label) -> Self {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        Self {
            label,
            p0,
            p1,
            dx,
            dy,
            quadrant: quadrant(dx, dy),
        }
    }

    /// The node coordinate.
    #[must_use]
    pub fn coordinate(&self) -> Coord {
        self.p0
    }

    #[must_use]
    pub fn directed_coordinate(&self) -> Coord {
        self.p1
    }

    #[must_use]
    pub fn quadrant(&self) -> u8 {
        self.quadrant
    }

    /// Orders edge ends by the angle of their direction, counter-clockwise
    /// from the positive x axis.
    ///
    /// Ends in different quadrants compare by quadrant; otherwise the
    /// orientation test decides, so the comparison is exact.
    #[must_use]
    pub fn compare_direction(&self, other: &EdgeEnd) -> Ordering {
        if self.dx == other.dx && self.dy == other.dy {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match orientation_index(&other.p0, &other.p1, &self.p1) {
            Orientation::CounterClockwise => Ordering::Greater,
            Orientation::Clockwise => Ordering::Less,
            Orientation::Collinear => Ordering::Equal,
        }
    }
}

/// Propagates side locations of geometry `geom_index` around a star of
/// labels sorted counter-clockwise.
///
/// Unknown `On` locations and unknown sides are filled with the location
/// of the face they lie in.
///
/// # Errors
///
/// Returns `TopologyError::SideLocationConflict` if two edges disagree
/// about the location of the face between them.
pub fn propagate_side_labels(labels: &mut [Label], geom_index: usize, at: Coord) -> Result<()> {
    let start = labels
        .iter()
        .filter(|l| l.is_area_of(geom_index))
        .filter_map(|l| l.location(geom_index, Position::Left))
        .last();
    let Some(mut current) = start else {
        return Ok(());
    };

    for label in labels.iter_mut() {
        if label.on_location(geom_index).is_none() {
            *label = label.with_location(geom_index, Position::On, Some(current));
        }
        if !label.is_area_of(geom_index) {
            continue;
        }
        let left = label.location(geom_index, Position::Left);
        match label.location(geom_index, Position::Right) {
            Some(right) => {
                if right != current {
                    return Err(TopologyError::SideLocationConflict { coordinate: Some(at) }.into());
                }
                let Some(left) = left else {
                    return Err(TopologyError::invalid("found single null side", Some(at)).into());
                };
                current = left;
            }
            None => {
                if left.is_some() {
                    return Err(TopologyError::invalid("found single null side", Some(at)).into());
                }
                *label = label
                    .with_location(geom_index, Position::Right, Some(current))
                    .with_location(geom_index, Position::Left, Some(current));
            }
        }
    }
    Ok(())
}

/// Completes the labels of a star of edge ends at `at`.
///
/// Side labels are propagated for both geometries; any location still
/// unknown is `Exterior` if the star contains a collapsed boundary edge of
/// that geometry, otherwise the location of the node in its areas.
///
/// # Errors
///
/// Propagates side location conflicts.
pub fn label_star(labels: &mut [Label], at: Coord, geoms: [&Geometry; 2]) -> Result<()> {
    propagate_side_labels(labels, 0, at)?;
    propagate_side_labels(labels, 1, at)?;

    let mut has_collapse = [false; 2];
    for label in labels.iter() {
        for (geom_index, flag) in has_collapse.iter_mut().enumerate() {
            if label.is_line(geom_index) && label.on_location(geom_index) == Some(Location::Boundary) {
                *flag = true;
            }
        }
    }

    let mut area_location: [Option<Location>; 2] = [None, None];
    for label in labels.iter_mut() {
        for geom_index in 0..2 {
            if !label.is_any_null(geom_index) {
                continue;
            }
            let loc = if has_collapse[geom_index] {
                Location::Exterior
            } else {
                *area_location[geom_index]
                    .get_or_insert_with(|| SimplePointInAreaLocator::locate(&at, geoms[geom_index]))
            };
            *label = label.with_all_locations_if_null(geom_index, Some(loc));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn end(x: f64, y: f64) -> EdgeEnd {
        EdgeEnd::new(c(0.0, 0.0), c(x, y), Label::default())
    }

    #[test]
    fn directions_sort_counter_clockwise() {
        let mut ends = vec![end(0.0, -1.0), end(-1.0, 0.0), end(1.0, 1.0), end(1.0, 0.0), end(0.0, 1.0)];
        ends.sort_by(EdgeEnd::compare_direction);
        let dirs: Vec<Coord> = ends.iter().map(EdgeEnd::directed_coordinate).collect();
        assert_eq!(dirs, vec![c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0), c(-1.0, 0.0), c(0.0, -1.0)]);
    }

    #[test]
    fn same_quadrant_uses_orientation() {
        assert_eq!(end(2.0, 1.0).compare_direction(&end(1.0, 2.0)), Ordering::Less);
        assert_eq!(end(2.0, 2.0).compare_direction(&end(1.0, 1.0)), Ordering::Equal);
    }

    #[test]
    fn side_labels_propagate_to_lines() {
        // the middle edge carries no locations for geometry 0
        let mut labels = vec![
            Label::area(0, Location::Boundary, Location::Interior, Location::Exterior),
            Label::area_both(None, None, None),
            Label::area(0, Location::Boundary, Location::Exterior, Location::Interior),
        ];
        propagate_side_labels(&mut labels, 0, c(0.0, 0.0)).unwrap();
        assert_eq!(labels[1].location(0, Position::Left), Some(Location::Interior));
        assert_eq!(labels[1].on_location(0), Some(Location::Interior));
    }

    #[test]
    fn conflicting_sides_fail() {
        let mut labels = vec![
            Label::area(0, Location::Boundary, Location::Interior, Location::Exterior),
            Label::area(0, Location::Boundary, Location::Interior, Location::Exterior),
        ];
        let err = propagate_side_labels(&mut labels, 0, c(0.0, 0.0)).unwrap_err();
        assert!(err.is_topology());
    }
}
