//! The topology graph of a single input geometry.

use std::collections::BTreeMap;

use tracing::debug;

use crate::geometry::{BoundaryNodeRule, Geometry, Location, Polygon, Position};
use crate::math::orientation::is_ccw;
use crate::math::{Coord, CoordKey, LineIntersector};

use super::edge::Edge;
use super::label::Label;
use super::segment_intersector::EdgeSegmentIntersector;

/// A node of a geometry graph: a coordinate and its label.
#[derive(Debug, Clone, Copy)]
pub struct GraphNode {
    pub coord: Coord,
    pub label: Label,
}

/// Removes consecutive duplicate coordinates.
#[must_use]
pub fn remove_repeated_points(pts: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}

/// Edges and labelled nodes built from one input geometry (argument
/// `arg_index` of a binary operation).
///
/// Polygon rings become area edges labelled with the interior on the
/// right of clockwise rings; lines become line edges whose endpoints are
/// boundary nodes according to the boundary node rule.
#[derive(Debug, Clone)]
pub struct GeometryGraph<'a> {
    arg_index: usize,
    geometry: &'a Geometry,
    rule: BoundaryNodeRule,
    edges: Vec<Edge>,
    nodes: BTreeMap<CoordKey, GraphNode>,
    invalid_point: Option<Coord>,
}

impl<'a> GeometryGraph<'a> {
    #[must_use]
    pub fn new(arg_index: usize, geometry: &'a Geometry) -> Self {
        Self::with_rule(arg_index, geometry, BoundaryNodeRule::default())
    }

    #[must_use]
    pub fn with_rule(arg_index: usize, geometry: &'a Geometry, rule: BoundaryNodeRule) -> Self {
        let mut graph = Self {
            arg_index,
            geometry,
            rule,
            edges: Vec::new(),
            nodes: BTreeMap::new(),
            invalid_point: None,
        };
        graph.add(geometry);
        graph
    }

    #[must_use]
    pub fn geometry(&self) -> &'a Geometry {
        self.geometry
    }

    #[must_use]
    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    #[must_use]
    pub fn boundary_node_rule(&self) -> BoundaryNodeRule {
        self.rule
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// Nodes in coordinate order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// A component with too few distinct points, if one was found.
    #[must_use]
    pub fn invalid_point(&self) -> Option<Coord> {
        self.invalid_point
    }

    #[must_use]
    pub fn has_too_few_points(&self) -> bool {
        self.invalid_point.is_some()
    }

    fn add(&mut self, geom: &Geometry) {
        match geom {
            Geometry::Point(Some(p)) => self.insert_point(*p, Location::Interior),
            Geometry::Point(None) => {}
            Geometry::MultiPoint(pts) => {
                for p in pts {
                    self.insert_point(*p, Location::Interior);
                }
            }
            Geometry::LineString(pts) => self.add_line_string(pts),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.add_line_string(line);
                }
            }
            Geometry::Polygon(poly) => self.add_polygon(poly),
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    self.add_polygon(poly);
                }
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    self.add(member);
                }
            }
        }
    }

    fn add_polygon(&mut self, poly: &Polygon) {
        if poly.is_empty() {
            return;
        }
        self.add_polygon_ring(&poly.exterior, Location::Exterior, Location::Interior);
        for hole in &poly.interiors {
            self.add_polygon_ring(hole, Location::Interior, Location::Exterior);
        }
    }

    fn add_polygon_ring(&mut self, ring: &[Coord], cw_left: Location, cw_right: Location) {
        if ring.is_empty() {
            return;
        }
        let pts = remove_repeated_points(ring);
        if pts.len() < 4 {
            self.invalid_point = Some(pts[0]);
            return;
        }
        let (left, right) = if is_ccw(&pts) {
            (cw_right, cw_left)
        } else {
            (cw_left, cw_right)
        };
        let start = pts[0];
        self.edges
            .push(Edge::new(pts, Label::area(self.arg_index, Location::Boundary, left, right)));
        self.insert_point(start, Location::Boundary);
    }

    fn add_line_string(&mut self, line: &[Coord]) {
        let pts = remove_repeated_points(line);
        if pts.len() < 2 {
            if let Some(p) = pts.first() {
                self.invalid_point = Some(*p);
            }
            return;
        }
        let (first, last) = (pts[0], pts[pts.len() - 1]);
        self.edges
            .push(Edge::new(pts, Label::on(self.arg_index, Location::Interior)));
        self.insert_boundary_point(first);
        self.insert_boundary_point(last);
    }

    fn node_mut(&mut self, coord: Coord) -> &mut GraphNode {
        self.nodes.entry(CoordKey(coord)).or_insert(GraphNode {
            coord,
            label: Label::default(),
        })
    }

    fn insert_point(&mut self, coord: Coord, on: Location) {
        let arg = self.arg_index;
        let node = self.node_mut(coord);
        node.label = node.label.with_location(arg, Position::On, Some(on));
    }

    /// Counts one more line endpoint at `coord`.
    ///
    /// Only the parity of the count is tracked, which is all the boundary
    /// node rules need.
    fn insert_boundary_point(&mut self, coord: Coord) {
        let arg = self.arg_index;
        let rule = self.rule;
        let node = self.node_mut(coord);
        let count = if node.label.on_location(arg) == Some(Location::Boundary) {
            2
        } else {
            1
        };
        let loc = if rule.is_in_boundary(count) {
            Location::Boundary
        } else {
            Location::Interior
        };
        node.label = node.label.with_location(arg, Position::On, Some(loc));
    }

    /// `true` if `coord` is a boundary node of this geometry.
    #[must_use]
    pub fn is_boundary_node(&self, coord: &Coord) -> bool {
        self.nodes
            .get(&CoordKey(*coord))
            .is_some_and(|n| n.label.on_location(self.arg_index) == Some(Location::Boundary))
    }

    /// Coordinates of all boundary nodes.
    #[must_use]
    pub fn boundary_nodes(&self) -> Vec<Coord> {
        self.nodes()
            .filter(|n| n.label.on_location(self.arg_index) == Some(Location::Boundary))
            .map(|n| n.coord)
            .collect()
    }

    /// Intersects the graph's edges with each other and adds a node at
    /// every intersection found.
    ///
    /// For areal geometries segments of the same ring are only tested
    /// against each other when `compute_ring_self_nodes` is set, since
    /// valid rings do not self-intersect.
    pub fn compute_self_nodes(&mut self, li: LineIntersector, compute_ring_self_nodes: bool) -> EdgeSegmentIntersector {
        let mut si = EdgeSegmentIntersector::new(li, true, false);
        let is_rings = matches!(self.geometry, Geometry::Polygon(_) | Geometry::MultiPolygon(_));
        si.compute_self(&mut self.edges, compute_ring_self_nodes || !is_rings);
        self.add_self_intersection_nodes();
        debug!(
            arg = self.arg_index,
            edges = self.edges.len(),
            nodes = self.nodes.len(),
            "self nodes computed"
        );
        si
    }

    /// Intersects this graph's edges with those of `other`, recording the
    /// intersections on both.
    pub fn compute_edge_intersections(
        &mut self,
        other: &mut GeometryGraph<'_>,
        li: LineIntersector,
        include_proper: bool,
    ) -> EdgeSegmentIntersector {
        let mut si = EdgeSegmentIntersector::new(li, include_proper, true)
            .with_boundary_nodes(self.boundary_nodes(), other.boundary_nodes());
        si.compute_between(&mut self.edges, &mut other.edges);
        si
    }

    fn add_self_intersection_nodes(&mut self) {
        let arg = self.arg_index;
        let found: Vec<(Coord, Option<Location>)> = self
            .edges
            .iter()
            .flat_map(|e| {
                let loc = e.label.on_location(arg);
                e.intersections.iter().map(move |ei| (ei.coord, loc))
            })
            .collect();
        for (coord, loc) in found {
            if self.is_boundary_node(&coord) {
                continue;
            }
            match loc {
                Some(Location::Boundary) => self.insert_boundary_point(coord),
                Some(loc) => self.insert_point(coord, loc),
                None => {}
            }
        }
    }

    /// Splits every edge at its recorded intersections.
    pub fn compute_split_edges(&mut self, out: &mut Vec<Edge>) {
        for edge in &mut self.edges {
            out.extend(edge.split_edges());
        }
    }
}
