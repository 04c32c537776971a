//! Network topology module.
//!
//! This module contains the fabric graph model and the two ways of building
//! one: the fat-tree generator and the external adjacency-list loader.

pub mod types;
pub mod fat_tree;
pub mod loader;

// Re-export key types and functions for easier access
pub use types::{Link, Node, NodeRole, Topology, TopologyError, INTERFACE_NAMESPACE_SIZE, MAX_EXACT_INTERFACE_ID};
pub use fat_tree::{generate_fat_tree, parse_fat_tree_name, FatTreeDimensions};
pub use loader::{load_topology, load_topology_file};
