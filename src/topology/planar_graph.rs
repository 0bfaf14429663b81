//! Planar graph of noded, labelled edges used to assemble overlay results.
//!
//! Nodes, edges and directed edges live in `slotmap` arenas and refer to
//! each other through typed keys. Each node keeps its star of outgoing
//! directed edges sorted counter-clockwise.

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::error::{Result, TopologyError};
use crate::geometry::{Geometry, Location, Position};
use crate::math::{Coord, CoordKey};

use super::edge::Edge;
use super::edge_end::{label_star, EdgeEnd};
use super::label::Label;

slotmap::new_key_type! {
    /// Identifier of a node in a planar graph.
    pub struct NodeId;
    /// Identifier of an undirected edge in a planar graph.
    pub struct EdgeId;
    /// Identifier of a directed edge in a planar graph.
    pub struct DirEdgeId;
}

/// One direction of traversal of an edge.
#[derive(Debug, Clone)]
pub struct DirectedEdge {
    pub end: EdgeEnd,
    pub edge: EdgeId,
    pub forward: bool,
    /// Node the directed edge starts at.
    pub node: NodeId,
    /// The opposite direction of the same edge.
    pub sym: DirEdgeId,
    /// Next edge of the maximal result ring.
    pub next: Option<DirEdgeId>,
    /// Next edge of the minimal result ring.
    pub next_min: Option<DirEdgeId>,
    pub edge_ring: Option<usize>,
    pub min_edge_ring: Option<usize>,
    pub in_result: bool,
    pub visited: bool,
}

impl DirectedEdge {
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.end.label
    }

    #[must_use]
    pub fn coordinate(&self) -> Coord {
        self.end.coordinate()
    }

    /// A line edge that lies in the exterior of any area it is labelled for.
    #[must_use]
    pub fn is_line_edge(&self) -> bool {
        let label = self.label();
        let is_line = label.is_line(0) || label.is_line(1);
        let exterior_if_area =
            |i: usize| !label.is_area_of(i) || label.all_positions_equal(i, Location::Exterior);
        is_line && exterior_if_area(0) && exterior_if_area(1)
    }

    /// An area edge with the interior of both geometries on both sides.
    #[must_use]
    pub fn is_interior_area_edge(&self) -> bool {
        let label = self.label();
        (0..2).all(|i| {
            label.is_area_of(i)
                && label.location(i, Position::Left) == Some(Location::Interior)
                && label.location(i, Position::Right) == Some(Location::Interior)
        })
    }
}

/// A node of a planar graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub coord: Coord,
    pub label: Label,
    /// Outgoing directed edges, counter-clockwise.
    pub star: Vec<DirEdgeId>,
    /// Summary label of the star.
    pub star_label: Label,
    /// Outgoing edges of the star that bound result areas.
    pub result_area_edges: Vec<DirEdgeId>,
}

impl Node {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            label: Label::default(),
            star: Vec::new(),
            star_label: Label::default(),
            result_area_edges: Vec::new(),
        }
    }

    /// A node labelled for only one geometry.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }
}

/// Arena-backed planar graph.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    nodes: SlotMap<NodeId, Node>,
    node_index: BTreeMap<CoordKey, NodeId>,
    edges: SlotMap<EdgeId, Edge>,
    dir_edges: SlotMap<DirEdgeId, DirectedEdge>,
    edge_ends: Vec<DirEdgeId>,
}

impl PlanarGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node at `coord`, creating it if needed.
    pub fn add_node(&mut self, coord: Coord) -> NodeId {
        if let Some(id) = self.node_index.get(&CoordKey(coord)) {
            return *id;
        }
        let id = self.nodes.insert(Node::new(coord));
        self.node_index.insert(CoordKey(coord), id);
        id
    }

    #[must_use]
    pub fn find_node(&self, coord: &Coord) -> Option<NodeId> {
        self.node_index.get(&CoordKey(*coord)).copied()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Node ids in coordinate order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.node_index.values().copied().collect()
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id]
    }

    #[must_use]
    pub fn dir_edge(&self, id: DirEdgeId) -> &DirectedEdge {
        &self.dir_edges[id]
    }

    pub fn dir_edge_mut(&mut self, id: DirEdgeId) -> &mut DirectedEdge {
        &mut self.dir_edges[id]
    }

    /// The parent edge of a directed edge.
    #[must_use]
    pub fn parent(&self, id: DirEdgeId) -> &Edge {
        &self.edges[self.dir_edges[id].edge]
    }

    #[must_use]
    pub fn sym(&self, id: DirEdgeId) -> DirEdgeId {
        self.dir_edges[id].sym
    }

    /// All directed edges in insertion order.
    #[must_use]
    pub fn dir_edge_ids(&self) -> &[DirEdgeId] {
        &self.edge_ends
    }

    /// Adds edges, each as a pair of directed edges inserted into the stars
    /// of their start nodes.
    pub fn add_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            let n = edge.num_points();
            if n < 2 {
                continue;
            }
            let forward_end = EdgeEnd::new(edge.coord(0), edge.coord(1), edge.label);
            let backward_end = EdgeEnd::new(edge.coord(n - 1), edge.coord(n - 2), edge.label.flipped());
            let edge_id = self.edges.insert(edge);
            let de0 = self.insert_dir_edge(forward_end, edge_id, true);
            let de1 = self.insert_dir_edge(backward_end, edge_id, false);
            self.dir_edges[de0].sym = de1;
            self.dir_edges[de1].sym = de0;
        }
    }

    fn insert_dir_edge(&mut self, end: EdgeEnd, edge: EdgeId, forward: bool) -> DirEdgeId {
        let node = self.add_node(end.coordinate());
        let id = self.dir_edges.insert(DirectedEdge {
            end,
            edge,
            forward,
            node,
            sym: DirEdgeId::default(),
            next: None,
            next_min: None,
            edge_ring: None,
            min_edge_ring: None,
            in_result: false,
            visited: false,
        });
        let found = self.nodes[node]
            .star
            .binary_search_by(|de| self.dir_edges[*de].end.compare_direction(&end));
        let pos = match found {
            Ok(i) | Err(i) => i,
        };
        self.nodes[node].star.insert(pos, id);
        self.edge_ends.push(id);
        id
    }

    /// Labels the directed edges of a node's star and summarises the star.
    ///
    /// # Errors
    ///
    /// Propagates side location conflicts.
    pub fn label_node_star(&mut self, node: NodeId, geoms: [&Geometry; 2]) -> Result<()> {
        let coord = self.nodes[node].coord;
        let star = self.nodes[node].star.clone();
        let mut labels: Vec<Label> = star.iter().map(|de| self.dir_edges[*de].end.label).collect();
        label_star(&mut labels, coord, geoms)?;

        let mut summary = Label::line_both(None);
        for (de, label) in star.iter().zip(labels) {
            self.dir_edges[*de].end.label = label;
            let edge_label = self.parent(*de).label;
            for i in 0..2 {
                if matches!(edge_label.on_location(i), Some(Location::Interior | Location::Boundary)) {
                    summary = summary.with_location(i, Position::On, Some(Location::Interior));
                }
            }
        }
        self.nodes[node].star_label = summary;
        Ok(())
    }

    /// Links the result area edges around a node into maximal rings: each
    /// incoming result edge is followed by the next outgoing result edge
    /// clockwise.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if an incoming result edge has no
    /// outgoing partner.
    pub fn link_result_directed_edges(&mut self, node: NodeId) -> Result<()> {
        let result_edges: Vec<DirEdgeId> = self.nodes[node]
            .star
            .iter()
            .copied()
            .filter(|de| self.dir_edges[*de].in_result || self.dir_edges[self.sym(*de)].in_result)
            .collect();
        self.nodes[node].result_area_edges.clone_from(&result_edges);

        let mut first_out: Option<DirEdgeId> = None;
        let mut incoming: Option<DirEdgeId> = None;
        for next_out in result_edges {
            let next_in = self.sym(next_out);
            if !self.dir_edges[next_out].label().is_area() {
                continue;
            }
            if first_out.is_none() && self.dir_edges[next_out].in_result {
                first_out = Some(next_out);
            }
            match incoming {
                None => {
                    if self.dir_edges[next_in].in_result {
                        incoming = Some(next_in);
                    }
                }
                Some(inc) => {
                    if self.dir_edges[next_out].in_result {
                        self.dir_edges[inc].next = Some(next_out);
                        incoming = None;
                    }
                }
            }
        }
        if let Some(inc) = incoming {
            let Some(first) = first_out else {
                return Err(
                    TopologyError::invalid("no outgoing directed edge found", Some(self.nodes[node].coord)).into(),
                );
            };
            self.dir_edges[inc].next = Some(first);
        }
        Ok(())
    }

    /// Links the edges of maximal ring `ring` around a node into minimal
    /// rings, turning as sharply as possible at each node.
    pub fn link_minimal_directed_edges(&mut self, node: NodeId, ring: usize) {
        let result_edges = self.nodes[node].result_area_edges.clone();
        let mut first_out: Option<DirEdgeId> = None;
        let mut incoming: Option<DirEdgeId> = None;
        for &next_out in result_edges.iter().rev() {
            let next_in = self.sym(next_out);
            if first_out.is_none() && self.dir_edges[next_out].edge_ring == Some(ring) {
                first_out = Some(next_out);
            }
            match incoming {
                None => {
                    if self.dir_edges[next_in].edge_ring == Some(ring) {
                        incoming = Some(next_in);
                    }
                }
                Some(inc) => {
                    if self.dir_edges[next_out].edge_ring == Some(ring) {
                        self.dir_edges[inc].next_min = Some(next_out);
                        incoming = None;
                    }
                }
            }
        }
        if let (Some(inc), Some(first)) = (incoming, first_out) {
            self.dir_edges[inc].next_min = Some(first);
        }
    }

    /// Number of a node's outgoing edges belonging to maximal ring `ring`.
    #[must_use]
    pub fn outgoing_degree(&self, node: NodeId, ring: usize) -> usize {
        self.nodes[node]
            .star
            .iter()
            .filter(|de| self.dir_edges[**de].edge_ring == Some(ring))
            .count()
    }

    /// Marks the line edges at a node as covered or not by result areas,
    /// walking the star and tracking whether it is inside a result area.
    pub fn find_covered_line_edges(&mut self, node: NodeId) {
        let star = self.nodes[node].star.clone();
        let mut start: Option<Location> = None;
        for &out in &star {
            let de = &self.dir_edges[out];
            if de.is_line_edge() {
                continue;
            }
            if de.in_result {
                start = Some(Location::Interior);
                break;
            }
            if self.dir_edges[de.sym].in_result {
                start = Some(Location::Exterior);
                break;
            }
        }
        let Some(mut current) = start else {
            return;
        };
        for &out in &star {
            let de = &self.dir_edges[out];
            if de.is_line_edge() {
                let edge = de.edge;
                self.edges[edge].covered = Some(current == Location::Interior);
                continue;
            }
            if de.in_result {
                current = Location::Exterior;
            }
            if self.dir_edges[de.sym].in_result {
                current = Location::Interior;
            }
        }
    }

    /// `true` if any edge at the node is part of the result.
    #[must_use]
    pub fn is_incident_edge_in_result(&self, node: NodeId) -> bool {
        self.nodes[node].star.iter().any(|de| self.parent(*de).in_result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn line_edge(pts: &[(f64, f64)]) -> Edge {
        Edge::new(
            pts.iter().map(|&(x, y)| c(x, y)).collect(),
            Label::on(0, Location::Interior),
        )
    }

    #[test]
    fn edges_create_nodes_and_sorted_stars() {
        let mut graph = PlanarGraph::new();
        graph.add_edges(vec![
            line_edge(&[(0.0, 0.0), (0.0, 5.0)]),
            line_edge(&[(0.0, 0.0), (5.0, 0.0)]),
            line_edge(&[(0.0, 0.0), (-5.0, -5.0)]),
        ]);
        assert_eq!(graph.node_ids().len(), 4);
        let origin = graph.find_node(&c(0.0, 0.0)).unwrap();
        let dirs: Vec<Coord> = graph
            .node(origin)
            .star
            .iter()
            .map(|de| graph.dir_edge(*de).end.directed_coordinate())
            .collect();
        assert_eq!(dirs, vec![c(5.0, 0.0), c(0.0, 5.0), c(-5.0, -5.0)]);
        assert_eq!(graph.dir_edge_ids().len(), 6);
    }

    #[test]
    fn sym_edges_are_paired() {
        let mut graph = PlanarGraph::new();
        graph.add_edges(vec![line_edge(&[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0)])]);
        let de = graph.dir_edge_ids()[0];
        let sym = graph.sym(de);
        assert_eq!(graph.sym(sym), de);
        assert!(graph.dir_edge(de).forward);
        assert_eq!(graph.dir_edge(sym).coordinate(), c(2.0, 1.0));
        assert_eq!(graph.dir_edge(sym).end.directed_coordinate(), c(1.0, 0.0));
    }

    #[test]
    fn line_edge_classification() {
        let mut graph = PlanarGraph::new();
        graph.add_edges(vec![line_edge(&[(0.0, 0.0), (1.0, 0.0)])]);
        let de = graph.dir_edge_ids()[0];
        assert!(graph.dir_edge(de).is_line_edge());
        assert!(!graph.dir_edge(de).is_interior_area_edge());
    }
}
