//! Operations built on the topology graph.

pub mod noding;
pub mod overlay;
pub mod precision;
pub mod predicate;
pub mod relate;
pub mod union;
pub mod valid;
