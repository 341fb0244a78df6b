//! Process graph access.
//!
//! - [`index`]: immutable adjacency index built from a graph export
//! - [`reachability`]: BFS searches (reachable sets, shortest paths)

pub mod index;
pub mod reachability;

pub use index::{GraphIndex, ProcessFlow, ProcessNode};
pub use reachability::{reachable_from, reachable_from_flows, shortest_path, GraphPath, ReachableSet};
