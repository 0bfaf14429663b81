use crate::math::Coord;

/// An axis-aligned bounding rectangle.
///
/// The null envelope (of an empty geometry) has `min > max` and intersects
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}

impl Envelope {
    /// The empty envelope.
    #[must_use]
    pub fn null() -> Self {
        Self {
            min_x: 0.0,
            max_x: -1.0,
            min_y: 0.0,
            max_y: -1.0,
        }
    }

    /// Envelope spanned by two corner points.
    #[must_use]
    pub fn new(p: Coord, q: Coord) -> Self {
        Self {
            min_x: p.x.min(q.x),
            max_x: p.x.max(q.x),
            min_y: p.y.min(q.y),
            max_y: p.y.max(q.y),
        }
    }

    /// Envelope of a single point.
    #[must_use]
    pub fn of_coord(p: Coord) -> Self {
        Self::new(p, p)
    }

    /// Envelope of a set of coordinates (null if empty).
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Self {
        let mut env = Self::null();
        for c in coords {
            env.expand_to_include(c);
        }
        env
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.max_x < self.min_x
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Centre point, or `None` for the null envelope.
    #[must_use]
    pub fn centre(&self) -> Option<Coord> {
        if self.is_null() {
            return None;
        }
        Some(Coord::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ))
    }

    /// Grows the envelope to cover `p`.
    pub fn expand_to_include(&mut self, p: &Coord) {
        if self.is_null() {
            *self = Self::of_coord(*p);
            return;
        }
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grows the envelope to cover another envelope.
    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        if self.is_null() {
            *self = *other;
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Returns `true` if the two envelopes share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    /// Returns `true` if the point lies in or on the envelope.
    #[must_use]
    pub fn covers_coord(&self, p: &Coord) -> bool {
        !self.is_null()
            && p.x >= self.min_x
            && p.x <= self.max_x
            && p.y >= self.min_y
            && p.y <= self.max_y
    }

    /// Returns `true` if `other` lies entirely in or on this envelope.
    #[must_use]
    pub fn contains(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// The common part of two envelopes (null if disjoint).
    #[must_use]
    pub fn intersection(&self, other: &Envelope) -> Envelope {
        if !self.intersects(other) {
            return Self::null();
        }
        Self {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// Conversion to an `rstar` bounding box.
    #[must_use]
    pub fn to_aabb(&self) -> rstar::AABB<[f64; 2]> {
        rstar::AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}
