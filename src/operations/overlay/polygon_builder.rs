//! Assembles result polygons from the result area edges of an overlay
//! graph.
//!
//! Maximal rings follow the result edges around each node. A maximal
//! ring that passes through a node more than once is split into minimal
//! rings, which can contain at most one shell. Holes that end up without a
//! shell are assigned to the smallest shell containing them.

use crate::error::{Result, TopologyError};
use crate::geometry::Polygon;
use crate::math::orientation::is_point_in_ring;
use crate::math::Coord;
use crate::topology::{DirEdgeId, EdgeRing, PlanarGraph, RingKind};

/// Builds polygons from an overlay graph whose result area edges have
/// been marked.
#[derive(Debug, Default)]
pub struct PolygonBuilder {
    rings: Vec<EdgeRing>,
    shells: Vec<usize>,
    free_holes: Vec<usize>,
}

impl PolygonBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links, traces and nests the result rings of `graph`.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if the result edges do not form
    /// consistent rings, or a hole cannot be placed in any shell.
    pub fn add(&mut self, graph: &mut PlanarGraph) -> Result<()> {
        for node in graph.node_ids() {
            graph.link_result_directed_edges(node)?;
        }
        let max_rings = self.build_maximal_rings(graph)?;
        let simple_rings = self.build_minimal_rings(graph, &max_rings)?;
        self.sort_shells_and_holes(&simple_rings);
        self.place_free_holes()
    }

    /// One polygon per shell, with the holes assigned to it.
    #[must_use]
    pub fn polygons(&self) -> Vec<Polygon> {
        self.shells
            .iter()
            .map(|s| self.rings[*s].to_polygon(&self.rings))
            .collect()
    }

    fn push_ring(&mut self, graph: &mut PlanarGraph, start: DirEdgeId, kind: RingKind) -> Result<usize> {
        let id = self.rings.len();
        let ring = EdgeRing::build(graph, start, id, kind)?;
        self.rings.push(ring);
        Ok(id)
    }

    fn build_maximal_rings(&mut self, graph: &mut PlanarGraph) -> Result<Vec<usize>> {
        let mut max_rings = Vec::new();
        for de in graph.dir_edge_ids().to_vec() {
            let dir_edge = graph.dir_edge(de);
            if !dir_edge.in_result || !dir_edge.label().is_area() || dir_edge.edge_ring.is_some() {
                continue;
            }
            let id = self.push_ring(graph, de, RingKind::Maximal)?;
            self.rings[id].set_in_result(graph);
            max_rings.push(id);
        }
        Ok(max_rings)
    }

    /// Splits every maximal ring that touches itself into minimal rings and
    /// returns the maximal rings that needed no splitting.
    fn build_minimal_rings(&mut self, graph: &mut PlanarGraph, max_rings: &[usize]) -> Result<Vec<usize>> {
        let mut simple = Vec::new();
        for &max_id in max_rings {
            if self.rings[max_id].max_node_degree(graph, max_id) <= 2 {
                simple.push(max_id);
                continue;
            }
            let edges = self.rings[max_id].edges().to_vec();
            for de in &edges {
                let node = graph.dir_edge(*de).node;
                graph.link_minimal_directed_edges(node, max_id);
            }
            let mut min_rings = Vec::new();
            for de in edges {
                if graph.dir_edge(de).min_edge_ring.is_none() {
                    min_rings.push(self.push_ring(graph, de, RingKind::Minimal)?);
                }
            }
            match self.find_shell(&min_rings)? {
                Some(shell) => {
                    for &ring in &min_rings {
                        if self.rings[ring].is_hole() {
                            self.set_shell(ring, shell);
                        }
                    }
                    self.shells.push(shell);
                }
                None => self.free_holes.extend(min_rings),
            }
        }
        Ok(simple)
    }

    fn find_shell(&self, min_rings: &[usize]) -> Result<Option<usize>> {
        let mut shells = min_rings.iter().copied().filter(|r| !self.rings[*r].is_hole());
        let shell = shells.next();
        if shells.next().is_some() {
            let at = self.rings[min_rings[0]].coords().first().copied();
            return Err(TopologyError::invalid("found two shells in minimal edge ring list", at).into());
        }
        Ok(shell)
    }

    fn set_shell(&mut self, hole: usize, shell: usize) {
        self.rings[hole].shell = Some(shell);
        self.rings[shell].holes.push(hole);
    }

    fn sort_shells_and_holes(&mut self, rings: &[usize]) {
        for &ring in rings {
            if self.rings[ring].is_hole() {
                self.free_holes.push(ring);
            } else {
                self.shells.push(ring);
            }
        }
    }

    fn place_free_holes(&mut self) -> Result<()> {
        for hole in self.free_holes.clone() {
            if self.rings[hole].shell.is_some() {
                continue;
            }
            let Some(shell) = self.find_containing_shell(hole) else {
                let coordinate = self.rings[hole].coords().first().copied();
                return Err(TopologyError::UnassignedHole { coordinate }.into());
            };
            self.set_shell(hole, shell);
        }
        Ok(())
    }

    /// The smallest shell whose envelope contains the hole's and whose
    /// ring contains a hole vertex that does not lie on the shell.
    fn find_containing_shell(&self, hole: usize) -> Option<usize> {
        let test = &self.rings[hole];
        let mut min_shell: Option<usize> = None;
        for &shell_id in &self.shells {
            let shell = &self.rings[shell_id];
            if !shell.envelope().contains(test.envelope()) {
                continue;
            }
            let Some(pt) = point_not_in(test.coords(), shell.coords()) else {
                continue;
            };
            if !is_point_in_ring(&pt, shell.coords()) {
                continue;
            }
            let smaller = min_shell.is_none_or(|m| self.rings[m].envelope().contains(shell.envelope()));
            if smaller {
                min_shell = Some(shell_id);
            }
        }
        min_shell
    }
}

/// The first point of `pts` that is not a vertex of `ring`, or the first
/// point if every one of them is.
fn point_not_in(pts: &[Coord], ring: &[Coord]) -> Option<Coord> {
    pts.iter()
        .find(|p| !ring.contains(p))
        .or_else(|| pts.first())
        .copied()
}
