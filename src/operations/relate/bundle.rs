//! Bundles of coincident edge ends and the relate node graph.

use crate::error::Result;
use crate::geometry::{BoundaryNodeRule, Geometry, Location, Position};
use crate::math::Coord;
use crate::topology::edge_end::label_star;
use crate::topology::{Edge, EdgeEnd, Label};

use super::matrix::IntersectionMatrix;

/// Edge ends leaving a node in the same direction, summarised by a single
/// label.
#[derive(Debug, Clone)]
pub struct EdgeEndBundle {
    end: EdgeEnd,
    ends: Vec<EdgeEnd>,
}

impl EdgeEndBundle {
    #[must_use]
    pub fn new(end: EdgeEnd) -> Self {
        Self { end, ends: vec![end] }
    }

    pub fn insert(&mut self, end: EdgeEnd) {
        self.ends.push(end);
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.end.label
    }

    #[must_use]
    pub fn edge_end(&self) -> &EdgeEnd {
        &self.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Recomputes the bundle label from the labels of its edge ends.
    ///
    /// The `On` location is `Interior` if any end is interior, overridden
    /// by the boundary node rule when ends lie on the boundary. A side is
    /// `Interior` if any area end has it interior, else `Exterior` if any
    /// has it exterior.
    pub fn compute_label(&mut self, rule: BoundaryNodeRule) {
        let is_area = self.ends.iter().any(|e| e.label.is_area());
        let mut label = if is_area {
            Label::area_both(None, None, None)
        } else {
            Label::line_both(None)
        };
        for geom_index in 0..2 {
            label = label.with_location(geom_index, Position::On, self.compute_on(geom_index, rule));
            if is_area {
                for side in [Position::Left, Position::Right] {
                    label = label.with_location(geom_index, side, self.compute_side(geom_index, side));
                }
            }
        }
        self.end.label = label;
    }

    fn compute_on(&self, geom_index: usize, rule: BoundaryNodeRule) -> Option<Location> {
        let mut boundary_count = 0;
        let mut found_interior = false;
        for e in &self.ends {
            match e.label.on_location(geom_index) {
                Some(Location::Boundary) => boundary_count += 1,
                Some(Location::Interior) => found_interior = true,
                _ => {}
            }
        }
        if boundary_count > 0 {
            return Some(if rule.is_in_boundary(boundary_count) {
                Location::Boundary
            } else {
                Location::Interior
            });
        }
        found_interior.then_some(Location::Interior)
    }

    fn compute_side(&self, geom_index: usize, side: Position) -> Option<Location> {
        let mut loc = None;
        for e in self.ends.iter().filter(|e| e.label.is_area()) {
            match e.label.location(geom_index, side) {
                Some(Location::Interior) => return Some(Location::Interior),
                Some(Location::Exterior) => loc = Some(Location::Exterior),
                _ => {}
            }
        }
        loc
    }

    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        Edge::update_im(&self.end.label, im);
    }
}

/// The bundles at a node, sorted counter-clockwise by direction.
#[derive(Debug, Clone, Default)]
pub struct EdgeEndBundleStar {
    bundles: Vec<EdgeEndBundle>,
}

impl EdgeEndBundleStar {
    /// Adds an edge end to the bundle with the same direction, creating
    /// the bundle if there is none.
    pub fn insert(&mut self, end: EdgeEnd) {
        match self
            .bundles
            .binary_search_by(|b| b.end.compare_direction(&end))
        {
            Ok(i) => self.bundles[i].insert(end),
            Err(i) => self.bundles.insert(i, EdgeEndBundle::new(end)),
        }
    }

    #[must_use]
    pub fn bundles(&self) -> &[EdgeEndBundle] {
        &self.bundles
    }

    /// Computes the bundle labels, then completes them around the star.
    ///
    /// # Errors
    ///
    /// Propagates side location conflicts.
    pub fn compute_labelling(&mut self, at: Coord, geoms: [&Geometry; 2], rule: BoundaryNodeRule) -> Result<()> {
        for bundle in &mut self.bundles {
            bundle.compute_label(rule);
        }
        let mut labels: Vec<Label> = self.bundles.iter().map(|b| b.end.label).collect();
        label_star(&mut labels, at, geoms)?;
        for (bundle, label) in self.bundles.iter_mut().zip(labels) {
            bundle.end.label = label;
        }
        Ok(())
    }

    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        for bundle in &self.bundles {
            bundle.update_im(im);
        }
    }
}

/// A node of the relate graph.
#[derive(Debug, Clone)]
pub struct RelateNode {
    pub coord: Coord,
    pub label: Label,
    pub star: EdgeEndBundleStar,
}

impl RelateNode {
    #[must_use]
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            label: Label::default(),
            star: EdgeEndBundleStar::default(),
        }
    }

    /// Labelled for a single geometry only.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }

    /// Marks the node as a boundary point of geometry `geom_index`.
    ///
    /// A node already on the boundary becomes interior, applying the mod-2
    /// rule to repeated line endpoints.
    pub fn set_label_boundary(&mut self, geom_index: usize) {
        let loc = match self.label.on_location(geom_index) {
            Some(Location::Boundary) => Location::Interior,
            _ => Location::Boundary,
        };
        self.label = self.label.with_location(geom_index, Position::On, Some(loc));
    }

    /// Raises `im` for the node itself and for its edge bundles.
    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        im.set_at_least_if_valid(self.label.on_location(0), self.label.on_location(1), 0);
        self.star.update_im(im);
    }
}
