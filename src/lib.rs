//! # Fabricconf - Data-plane configuration synthesis for network fabrics
//!
//! This library computes the forwarding-plane configuration of a
//! datacenter-style fabric: per-switch match-action rule tables plus an
//! interface-level topology description, for consumption by a network
//! simulator or verification tool.
//!
//! ## Overview
//!
//! Two modes converge on the same output records:
//!
//! - **Generate**: build a k-ary fat-tree, assign pseudo-random host
//!   addresses, and compute ECMP routes for every ordered host pair.
//! - **Import**: load an interface-level adjacency list and one route table
//!   per switch, and compile the imported routes directly.
//!
//! ## Architecture
//!
//! - `config`: Configuration structures and validation
//! - `config_loader`: YAML loading and command-line overrides
//! - `topology`: Fabric graph model, fat-tree generator, adjacency loader
//! - `ip`: Host address allocation
//! - `routing`: Flow tables, path enumeration, ECMP builder, route importer
//! - `rules`: Prefixes and match-action rule compilation
//! - `emit`: Output records and JSON writers
//! - `orchestrator`: High-level pipelines
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fabricconf::{config_loader, orchestrator};
//!
//! let config = config_loader::load_config("fabric.yaml".as_ref())?;
//! let summary = orchestrator::generate_fabric_config(&config)?;
//! println!("{} switches, {} rules", summary.switches, summary.rules);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   output: "fabric_output"
//!   exclude_host_links: false
//!
//! fabric:
//!   mode: generate          # or: import
//!   topology: "FatTree-4"   # import: path to the adjacency list
//!   addresses_per_host: 1
//!   seed: 42
//! ```
//!
//! ## Error Handling
//!
//! Domain modules return `thiserror` enums; the orchestrator and binary use
//! `color_eyre` for reporting with context.

pub mod config;
pub mod config_loader;
pub mod topology;
pub mod ip;
pub mod routing;
pub mod rules;
pub mod emit;
pub mod orchestrator;
