//! Labelled topology graphs shared by relate and overlay.

pub mod depth;
pub mod edge;
pub mod edge_end;
pub mod edge_list;
pub mod edge_ring;
pub mod geometry_graph;
pub mod label;
pub mod planar_graph;
pub mod segment_intersector;

pub use depth::Depth;
pub use edge::{Edge, EdgeIntersection, EdgeIntersectionList};
pub use edge_end::EdgeEnd;
pub use edge_list::EdgeList;
pub use edge_ring::{EdgeRing, RingKind};
pub use geometry_graph::{GeometryGraph, GraphNode};
pub use label::{Label, TopologyLocation};
pub use planar_graph::{DirEdgeId, DirectedEdge, EdgeId, Node, NodeId, PlanarGraph};
pub use segment_intersector::EdgeSegmentIntersector;
