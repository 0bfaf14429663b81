//! Rings of directed result edges.

use crate::error::{Result, TopologyError};
use crate::geometry::{Envelope, Polygon};
use crate::math::orientation::{is_ccw, is_point_in_ring};
use crate::math::Coord;

use super::planar_graph::{DirEdgeId, PlanarGraph};

/// Whether a ring follows the maximal (`next`) or minimal (`next_min`)
/// linkage of directed edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Maximal,
    Minimal,
}

/// A closed ring traced through linked directed edges of a planar graph.
///
/// Clockwise rings are shells and counter-clockwise rings are holes.
#[derive(Debug, Clone)]
pub struct EdgeRing {
    edges: Vec<DirEdgeId>,
    pts: Vec<Coord>,
    is_hole: bool,
    envelope: Envelope,
    pub shell: Option<usize>,
    pub holes: Vec<usize>,
}

impl EdgeRing {
    /// Traces the ring starting at `start` and tags its directed edges
    /// with ring id `id`.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if the linkage is broken or an edge is
    /// reached twice.
    pub fn build(graph: &mut PlanarGraph, start: DirEdgeId, id: usize, kind: RingKind) -> Result<Self> {
        let mut edges = Vec::new();
        let mut pts: Vec<Coord> = Vec::new();
        let mut de = start;
        loop {
            let at = graph.dir_edge(de).coordinate();
            let tag = match kind {
                RingKind::Maximal => &mut graph.dir_edge_mut(de).edge_ring,
                RingKind::Minimal => &mut graph.dir_edge_mut(de).min_edge_ring,
            };
            if *tag == Some(id) {
                return Err(TopologyError::invalid("directed edge visited twice during ring-building", Some(at)).into());
            }
            *tag = Some(id);
            edges.push(de);

            let dir_edge = graph.dir_edge(de);
            let edge_pts = graph.parent(de).coords();
            let first = edges.len() == 1;
            if dir_edge.forward {
                let skip = usize::from(!first);
                pts.extend_from_slice(&edge_pts[skip..]);
            } else {
                let take = if first { edge_pts.len() } else { edge_pts.len() - 1 };
                pts.extend(edge_pts[..take].iter().rev());
            }

            let next = match kind {
                RingKind::Maximal => dir_edge.next,
                RingKind::Minimal => dir_edge.next_min,
            };
            match next {
                Some(n) if n == start => break,
                Some(n) => de = n,
                None => return Err(TopologyError::invalid("found null directed edge", Some(at)).into()),
            }
        }

        let is_hole = is_ccw(&pts);
        let envelope = Envelope::from_coords(&pts);
        Ok(Self {
            edges,
            pts,
            is_hole,
            envelope,
            shell: None,
            holes: Vec::new(),
        })
    }

    #[must_use]
    pub fn edges(&self) -> &[DirEdgeId] {
        &self.edges
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    #[must_use]
    pub fn is_hole(&self) -> bool {
        self.is_hole
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// `true` if `p` lies inside the ring, counting only its interior.
    #[must_use]
    pub fn contains_point(&self, p: &Coord) -> bool {
        self.envelope.covers_coord(p) && is_point_in_ring(p, &self.pts)
    }

    /// Marks the parent edges of the ring as part of the result.
    pub fn set_in_result(&self, graph: &mut PlanarGraph) {
        for de in &self.edges {
            let edge = graph.dir_edge(*de).edge;
            graph.edge_mut(edge).in_result = true;
        }
    }

    /// Largest number of this ring's edges leaving any of its nodes.
    #[must_use]
    pub fn max_node_degree(&self, graph: &PlanarGraph, id: usize) -> usize {
        self.edges
            .iter()
            .map(|de| graph.outgoing_degree(graph.dir_edge(*de).node, id))
            .max()
            .unwrap_or(0)
    }

    /// Builds the polygon with this ring as shell and its assigned holes.
    #[must_use]
    pub fn to_polygon(&self, rings: &[EdgeRing]) -> Polygon {
        Polygon::new(
            self.pts.clone(),
            self.holes.iter().map(|h| rings[*h].pts.clone()).collect(),
        )
    }
}
