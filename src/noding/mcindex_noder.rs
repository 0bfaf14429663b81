use tracing::trace;

use super::chain::ChainIndex;
use super::intersector::{PendingNode, SegmentIntersector};
use super::segment_string::{noded_substrings, NodedSegmentString};
use super::Noder;
use crate::error::Result;

/// Nodes strings by intersecting overlapping monotone chains.
///
/// Which intersections become nodes is decided by the segment intersector.
#[derive(Debug, Clone)]
pub struct McIndexNoder<SI> {
    intersector: SI,
    strings: Vec<NodedSegmentString>,
}

impl<SI: SegmentIntersector> McIndexNoder<SI> {
    #[must_use]
    pub fn new(intersector: SI) -> Self {
        Self {
            intersector,
            strings: Vec::new(),
        }
    }

    /// The segment intersector, for reading its statistics.
    #[must_use]
    pub fn intersector(&self) -> &SI {
        &self.intersector
    }

    /// The input strings with the nodes found on them.
    #[must_use]
    pub fn strings(&self) -> &[NodedSegmentString] {
        &self.strings
    }
}

/// Runs `intersector` over every candidate pair of `strings`, then adds the
/// requested nodes.
pub(crate) fn intersect_chains<SI: SegmentIntersector>(
    strings: &mut [NodedSegmentString],
    intersector: &mut SI,
) {
    let coords: Vec<&[crate::math::Coord]> = strings.iter().map(NodedSegmentString::coords).collect();
    let index = ChainIndex::new(&coords);
    let pairs = index.candidate_pairs(&coords);
    trace!(chains = index.chains().len(), pairs = pairs.len(), "chain overlap search");

    let mut nodes: Vec<PendingNode> = Vec::new();
    for (s0, seg0, s1, seg1) in pairs {
        intersector.process_intersections(strings, s0, seg0, s1, seg1, &mut nodes);
        if intersector.is_done() {
            break;
        }
    }
    for node in nodes {
        strings[node.string].add_intersection(node.coord, node.segment_index);
    }
}

impl<SI: SegmentIntersector> Noder for McIndexNoder<SI> {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString>) -> Result<()> {
        self.strings = strings;
        intersect_chains(&mut self.strings, &mut self.intersector);
        Ok(())
    }

    fn noded_substrings(&self) -> Vec<NodedSegmentString> {
        noded_substrings(&self.strings)
    }
}
