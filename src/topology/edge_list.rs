use std::collections::BTreeMap;

use crate::math::{compare_coords, Coord, CoordKey};

use super::edge::Edge;

/// Key identifying an edge's coordinates regardless of direction.
fn oriented_key(pts: &[Coord]) -> Vec<CoordKey> {
    let n = pts.len();
    let forward = (0..n / 2)
        .map(|i| compare_coords(&pts[i], &pts[n - 1 - i]))
        .find(|ord| ord.is_ne())
        .is_none_or(std::cmp::Ordering::is_lt);
    if forward {
        pts.iter().copied().map(CoordKey).collect()
    } else {
        pts.iter().rev().copied().map(CoordKey).collect()
    }
}

/// A list of edges that can find an existing edge with the same
/// coordinates in either direction.
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
    index: BTreeMap<Vec<CoordKey>, usize>,
}

impl EdgeList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, edge: Edge) {
        self.index.insert(oriented_key(edge.coords()), self.edges.len());
        self.edges.push(edge);
    }

    /// Index of an edge equal to `edge` up to direction.
    #[must_use]
    pub fn find_equal_edge(&self, edge: &Edge) -> Option<usize> {
        self.index.get(&oriented_key(edge.coords())).copied()
    }

    #[must_use]
    pub fn get(&self, i: usize) -> &Edge {
        &self.edges[i]
    }

    pub fn get_mut(&mut self, i: usize) -> &mut Edge {
        &mut self.edges[i]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Consumes the list, returning its edges in insertion order.
    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Location;
    use crate::topology::Label;

    fn edge(pts: &[(f64, f64)]) -> Edge {
        Edge::new(
            pts.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
            Label::on(0, Location::Interior),
        )
    }

    #[test]
    fn finds_reversed_duplicate() {
        let mut list = EdgeList::new();
        list.add(edge(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]));
        list.add(edge(&[(5.0, 5.0), (6.0, 6.0)]));
        assert_eq!(list.find_equal_edge(&edge(&[(2.0, 0.0), (1.0, 1.0), (0.0, 0.0)])), Some(0));
        assert_eq!(list.find_equal_edge(&edge(&[(6.0, 6.0), (5.0, 5.0)])), Some(1));
        assert_eq!(list.find_equal_edge(&edge(&[(0.0, 0.0), (2.0, 0.0)])), None);
    }
}
