//! Noding: splitting linework at every mutual intersection.

pub mod chain;
pub mod intersector;
pub mod mcindex_noder;
pub mod octant;
pub mod scaled_noder;
pub mod segment_string;
pub mod snap_round;
pub mod validator;

pub use chain::{ChainIndex, MonotoneChain, SegmentPair};
pub use intersector::{InteriorIntersectionFinder, IntersectionAdder, PendingNode, SegmentIntersector};
pub use mcindex_noder::McIndexNoder;
pub use octant::{compare_along_segment, octant};
pub use scaled_noder::ScaledNoder;
pub use segment_string::{NodedSegmentString, SegmentNode};
pub use snap_round::{HotPixel, SnapRoundingNoder};
pub use validator::NodingValidator;

use crate::error::Result;

/// Computes the noding of a set of segment strings.
pub trait Noder {
    /// Finds all nodes of the given strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the strings cannot be noded consistently.
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString>) -> Result<()>;

    /// The strings split at every node found by [`Noder::compute_nodes`].
    fn noded_substrings(&self) -> Vec<NodedSegmentString>;
}
