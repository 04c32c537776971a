//! Configuration orchestrator.
//!
//! This module coordinates the two pipelines, generate and import, from
//! topology construction through rule compilation and file output.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::path::Path;

use crate::config::{Config, Fabric};
use crate::emit::{self, RouterRecord};
use crate::ip::{address_rng, assign_host_addresses};
use crate::routing::{build_routes, import_route_tables, FlowTables, PathSelector, RuleOrder};
use crate::rules::compile_switch;
use crate::topology::{generate_fat_tree, load_topology_file, parse_fat_tree_name, Topology};

/// A topology together with the flow tables computed or imported for it
#[derive(Debug)]
pub struct SynthesizedFabric {
    pub topology: Topology,
    pub flows: FlowTables,
}

/// Counts reported after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub switches: usize,
    pub hosts: usize,
    pub rules: usize,
}

/// Build a fat-tree, assign host addresses and compute ECMP routes
pub fn run_generate(pod: usize, addresses_per_host: usize, seed: Option<u64>) -> Result<SynthesizedFabric> {
    info!("Generating topology: FatTree-{}", pod);
    let topology = generate_fat_tree(pod)?;

    let mut rng = address_rng(seed);
    let addresses = assign_host_addresses(&topology, addresses_per_host, &mut rng)?;

    info!("Calculating shortest paths for {} hosts", topology.host_count());
    let mut selector = PathSelector::new();
    let flows = build_routes(&topology, &addresses, &mut selector);

    Ok(SynthesizedFabric { topology, flows })
}

/// Load an external topology and its per-switch route tables
pub fn run_import(adjacency: &Path, routes_dir: &Path, order: RuleOrder) -> Result<SynthesizedFabric> {
    info!("Loading topology from: {:?}", adjacency);
    let topology = load_topology_file(adjacency)
        .wrap_err_with(|| format!("Failed to load topology '{}'", adjacency.display()))?;

    info!("Importing route tables from: {:?} ({:?})", routes_dir, order);
    let flows = import_route_tables(&topology, routes_dir, order)?;

    Ok(SynthesizedFabric { topology, flows })
}

/// Compile the rule record of every switch, in switch creation order
pub fn compile_routers(fabric: &SynthesizedFabric) -> Vec<RouterRecord> {
    fabric
        .topology
        .switches()
        .map(|switch| compile_switch(switch, fabric.flows.entries(&switch.name)))
        .collect()
}

/// Run the configured pipeline and write every output file
pub fn generate_fabric_config(config: &Config) -> Result<Summary> {
    let fabric = match &config.fabric {
        Fabric::Generate { topology, addresses_per_host, seed } => {
            let pod = parse_fat_tree_name(topology)?;
            run_generate(pod, *addresses_per_host, *seed)?
        }
        Fabric::Import { topology, routes, rule_order } => run_import(topology, routes, *rule_order)?,
    };

    let output_dir = &config.general.output;
    info!("Writing configurations to: {:?}", output_dir);
    emit::prepare_output_dir(output_dir)?;
    emit::write_topology(output_dir, &fabric.topology, config.general.exclude_host_links)?;

    let mut rules = 0;
    for record in compile_routers(&fabric) {
        rules += record.rules.len();
        emit::write_router(output_dir, &record)?;
    }

    let summary = Summary {
        switches: fabric.topology.switch_count(),
        hosts: fabric.topology.host_count(),
        rules,
    };
    info!(
        "configurations generated: {} switches {} hosts ({} rules)",
        summary.switches, summary.hosts, summary.rules
    );
    Ok(summary)
}
