//! Computes the intersection matrix of two geometries from their labelled
//! topology graphs.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::geometry::{BoundaryNodeRule, Dimension, Geometry, Location, PointLocator, Position};
use crate::math::{Coord, CoordKey, LineIntersector};
use crate::topology::{Edge, EdgeEnd, EdgeSegmentIntersector, GeometryGraph};

use super::bundle::RelateNode;
use super::edge_end_builder::compute_edge_ends;
use super::matrix::IntersectionMatrix;

/// Builds the relate graph of two geometries and reads the intersection
/// matrix off its labels.
pub struct RelateComputer<'a> {
    graphs: [GeometryGraph<'a>; 2],
    rule: BoundaryNodeRule,
    locator: PointLocator,
    nodes: BTreeMap<CoordKey, RelateNode>,
    isolated_edges: Vec<(usize, usize)>,
}

impl<'a> RelateComputer<'a> {
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry, rule: BoundaryNodeRule) -> Self {
        Self {
            graphs: [GeometryGraph::with_rule(0, a, rule), GeometryGraph::with_rule(1, b, rule)],
            rule,
            locator: PointLocator::new(rule),
            nodes: BTreeMap::new(),
            isolated_edges: Vec::new(),
        }
    }

    fn geometries(&self) -> [&'a Geometry; 2] {
        [self.graphs[0].geometry(), self.graphs[1].geometry()]
    }

    /// Computes the matrix.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if the edge stars cannot be labelled
    /// consistently, which happens for invalid inputs.
    pub fn compute(mut self) -> Result<IntersectionMatrix> {
        let mut im = IntersectionMatrix::new();
        im.set(Location::Exterior, Location::Exterior, Dimension::Surface);

        let [a, b] = self.geometries();
        if !a.envelope().intersects(&b.envelope()) {
            debug!("envelopes disjoint, skipping graph construction");
            compute_disjoint_im(&mut im, a, b);
            return Ok(im);
        }

        let li = LineIntersector::new();
        self.graphs[0].compute_self_nodes(li.clone(), false);
        self.graphs[1].compute_self_nodes(li.clone(), false);
        let intersector = {
            let [g0, g1] = &mut self.graphs;
            g0.compute_edge_intersections(g1, li, false)
        };

        self.compute_intersection_nodes(0);
        self.compute_intersection_nodes(1);
        self.copy_nodes_and_labels(0);
        self.copy_nodes_and_labels(1);
        self.label_isolated_nodes();

        compute_proper_intersection_im(&intersector, a.dimension(), b.dimension(), &mut im);

        for arg in 0..2 {
            let ends = compute_edge_ends(self.graphs[arg].edges_mut());
            self.insert_edge_ends(ends);
        }

        self.label_node_edges()?;
        self.label_isolated_edges(0, 1);
        self.label_isolated_edges(1, 0);
        debug!(
            nodes = self.nodes.len(),
            isolated_edges = self.isolated_edges.len(),
            proper = intersector.has_proper_intersection(),
            "relate graph labelled"
        );

        self.update_im(&mut im);
        Ok(im)
    }

    fn node_mut(&mut self, coord: Coord) -> &mut RelateNode {
        self.nodes
            .entry(CoordKey(coord))
            .or_insert_with(|| RelateNode::new(coord))
    }

    /// Adds a node for every intersection found on the edges of `arg`.
    fn compute_intersection_nodes(&mut self, arg: usize) {
        let found: Vec<(Coord, Option<Location>)> = self.graphs[arg]
            .edges()
            .iter()
            .flat_map(|e| {
                let loc = e.label.on_location(arg);
                e.intersections.iter().map(move |ei| (ei.coord, loc))
            })
            .collect();
        for (coord, loc) in found {
            let node = self.node_mut(coord);
            if loc == Some(Location::Boundary) {
                node.set_label_boundary(arg);
            } else if node.label.is_null(arg) {
                node.label = node.label.with_location(arg, Position::On, Some(Location::Interior));
            }
        }
    }

    fn copy_nodes_and_labels(&mut self, arg: usize) {
        let copied: Vec<(Coord, Option<Location>)> = self.graphs[arg]
            .nodes()
            .map(|n| (n.coord, n.label.on_location(arg)))
            .collect();
        for (coord, loc) in copied {
            let node = self.node_mut(coord);
            node.label = node.label.with_location(arg, Position::On, loc);
        }
    }

    /// Locates nodes known to only one geometry in the other one.
    fn label_isolated_nodes(&mut self) {
        let geoms = self.geometries();
        let locator = self.locator;
        for node in self.nodes.values_mut() {
            if !node.is_isolated() {
                continue;
            }
            let target = usize::from(!node.label.is_null(0));
            let loc = locator.locate(&node.coord, geoms[target]);
            node.label = node.label.with_all_locations(target, Some(loc));
        }
    }

    fn insert_edge_ends(&mut self, ends: Vec<EdgeEnd>) {
        for end in ends {
            self.node_mut(end.coordinate()).star.insert(end);
        }
    }

    fn label_node_edges(&mut self) -> Result<()> {
        let geoms = self.geometries();
        let rule = self.rule;
        for node in self.nodes.values_mut() {
            node.star.compute_labelling(node.coord, geoms, rule)?;
        }
        Ok(())
    }

    /// Labels the edges of `this` that touch no edge of the other geometry
    /// with their location in `target`.
    fn label_isolated_edges(&mut self, this: usize, target: usize) {
        let target_geom = self.graphs[target].geometry();
        let locator = self.locator;
        for (i, edge) in self.graphs[this].edges_mut().iter_mut().enumerate() {
            if !edge.isolated {
                continue;
            }
            let loc = if target_geom.dimension() > Dimension::Point {
                locator.locate(&edge.coord(0), target_geom)
            } else {
                Location::Exterior
            };
            edge.label = edge.label.with_all_locations(target, Some(loc));
            self.isolated_edges.push((this, i));
        }
    }

    fn update_im(&self, im: &mut IntersectionMatrix) {
        for &(arg, i) in &self.isolated_edges {
            Edge::update_im(&self.graphs[arg].edges()[i].label, im);
        }
        for node in self.nodes.values() {
            node.update_im(im);
        }
    }
}

/// Fills the matrix of two geometries whose envelopes do not meet.
fn compute_disjoint_im(im: &mut IntersectionMatrix, a: &Geometry, b: &Geometry) {
    if !a.is_empty() {
        im.set(Location::Interior, Location::Exterior, a.dimension());
        im.set(Location::Boundary, Location::Exterior, a.boundary_dimension());
    }
    if !b.is_empty() {
        im.set(Location::Exterior, Location::Interior, b.dimension());
        im.set(Location::Exterior, Location::Boundary, b.boundary_dimension());
    }
}

/// Seeds the matrix from the kind of proper intersection found, which
/// fixes some entries regardless of the rest of the topology.
fn compute_proper_intersection_im(
    intersector: &EdgeSegmentIntersector,
    dim_a: Dimension,
    dim_b: Dimension,
    im: &mut IntersectionMatrix,
) {
    let has_proper = intersector.has_proper_intersection();
    let has_proper_interior = intersector.has_proper_interior_intersection();
    match (dim_a, dim_b) {
        (Dimension::Surface, Dimension::Surface) => {
            if has_proper {
                im.set_at_least_pattern("212101212");
            }
        }
        (Dimension::Surface, Dimension::Curve) => {
            if has_proper {
                im.set_at_least_pattern("FFF0FFFF2");
            }
            if has_proper_interior {
                im.set_at_least_pattern("1FFFFF1FF");
            }
        }
        (Dimension::Curve, Dimension::Surface) => {
            if has_proper {
                im.set_at_least_pattern("F0FFFFFF2");
            }
            if has_proper_interior {
                im.set_at_least_pattern("1F1FFFFFF");
            }
        }
        (Dimension::Curve, Dimension::Curve) => {
            if has_proper_interior {
                im.set_at_least_pattern("0FFFFFFFF");
            }
        }
        _ => {}
    }
}
