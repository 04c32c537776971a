//! Route synthesis module.
//!
//! Produces per-switch flow tables either by computing ECMP routes over a
//! generated fabric or by importing per-switch route tables.

pub mod flow;
pub mod paths;
pub mod ecmp;
pub mod importer;

// Re-export commonly used types
pub use flow::{FlowEntry, FlowTables, RuleOrder};
pub use paths::{all_shortest_paths, ShortestPaths};
pub use ecmp::{build_routes, PathSelector};
pub use importer::{import_route_table, import_route_tables, ImportError};
