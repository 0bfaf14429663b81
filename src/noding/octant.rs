//! Octants and the octant-aware ordering of points along a segment.

use std::cmp::Ordering;

use crate::math::Coord;

/// Octant (0..8) of the direction `(dx, dy)`, counted counter-clockwise
/// from the positive x axis.
///
/// The zero vector has no direction and is assigned octant 0.
#[must_use]
pub fn octant(dx: f64, dy: f64) -> u8 {
    if dx == 0.0 && dy == 0.0 {
        return 0;
    }
    let adx = dx.abs();
    let ady = dy.abs();
    if dx >= 0.0 {
        if dy >= 0.0 {
            if adx >= ady {
                0
            } else {
                1
            }
        } else if adx >= ady {
            7
        } else {
            6
        }
    } else if dy >= 0.0 {
        if adx >= ady {
            3
        } else {
            2
        }
    } else if adx >= ady {
        4
    } else {
        5
    }
}

/// Octant of the segment `p0 -> p1`.
#[must_use]
pub fn segment_octant(p0: &Coord, p1: &Coord) -> u8 {
    octant(p1.x - p0.x, p1.y - p0.y)
}

/// Orders two points lying on (or very near) a segment of the given
/// octant by their position along it.
///
/// Only the signs of ordinate differences are used, never distances, so
/// the order is consistent even for nearly coincident points.
#[must_use]
pub fn compare_along_segment(octant: u8, p0: &Coord, p1: &Coord) -> Ordering {
    if p0 == p1 {
        return Ordering::Equal;
    }
    let x = relative_sign(p0.x, p1.x);
    let y = relative_sign(p0.y, p1.y);
    match octant {
        0 => compare_value(x, y),
        1 => compare_value(y, x),
        2 => compare_value(y, -x),
        3 => compare_value(-x, y),
        4 => compare_value(-x, -y),
        5 => compare_value(-y, -x),
        6 => compare_value(-y, x),
        _ => compare_value(x, -y),
    }
}

fn relative_sign(x0: f64, x1: f64) -> i8 {
    if x0 < x1 {
        -1
    } else if x0 > x1 {
        1
    } else {
        0
    }
}

fn compare_value(primary: i8, secondary: i8) -> Ordering {
    match (primary.signum(), secondary.signum()) {
        (-1, _) => Ordering::Less,
        (1, _) => Ordering::Greater,
        (_, -1) => Ordering::Less,
        (_, 1) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
