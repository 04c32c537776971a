//! Fat-tree topology generation.
//!
//! A k-ary fat-tree (k = `pod`) has three switch tiers:
//!
//! - core: `(k/2)^2` switches
//! - aggregation: `k*k/2` switches, `k/2` per pod
//! - edge: `k*k/2` switches, `k/2` per pod
//!
//! and `(k/2)^2 * k` hosts, `k/2` under each edge switch. Switches are named
//! `s-1..` in tier order (core, aggregation, edge), hosts `h-1..`.
//!
//! The wiring order is part of the output contract: interface ids are
//! allocated in link-creation order, so changing it renumbers every port.

use super::types::{NodeRole, Topology, TopologyError};

/// Switch and host counts of a fat-tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatTreeDimensions {
    pub pod: usize,
    pub core: usize,
    pub aggregation: usize,
    pub edge: usize,
    pub hosts: usize,
}

impl FatTreeDimensions {
    pub fn new(pod: usize) -> Result<Self, TopologyError> {
        if pod < 2 || pod % 2 != 0 {
            return Err(TopologyError::InvalidPod { pod });
        }
        let half = pod / 2;
        Ok(Self {
            pod,
            core: half * half,
            aggregation: pod * pod / 2,
            edge: pod * pod / 2,
            hosts: half * half * pod,
        })
    }

    pub fn switches(&self) -> usize {
        self.core + self.aggregation + self.edge
    }
}

/// Parse a topology name of the form `FatTree-<pod>`
pub fn parse_fat_tree_name(name: &str) -> Result<usize, TopologyError> {
    let invalid = || TopologyError::InvalidName { name: name.to_string() };

    let (kind, pod) = name.split_once('-').ok_or_else(invalid)?;
    if !kind.eq_ignore_ascii_case("fattree") {
        return Err(invalid());
    }
    pod.trim().parse::<usize>().map_err(|_| invalid())
}

/// Build a k-ary fat-tree
pub fn generate_fat_tree(pod: usize) -> Result<Topology, TopologyError> {
    let dims = FatTreeDimensions::new(pod)?;
    let half = pod / 2;
    let mut topo = Topology::new();

    log::debug!(
        "Building fat-tree: pod={} core={} aggregation={} edge={} hosts={}",
        pod, dims.core, dims.aggregation, dims.edge, dims.hosts
    );

    // All nodes exist before the first link
    let switches: Vec<String> = (0..dims.switches())
        .map(|_| topo.add_node(NodeRole::Switch).name.clone())
        .collect();
    let hosts: Vec<String> = (0..dims.hosts)
        .map(|_| topo.add_node(NodeRole::Host).name.clone())
        .collect();

    let (core, rest) = switches.split_at(dims.core);
    let (aggregation, edge) = rest.split_at(dims.aggregation);

    // core <--> aggregation: one counter cycles over the core tier for the
    // whole aggregation tier
    let mut index = 0;
    for aggr in aggregation {
        for _ in 0..half {
            topo.add_link(aggr, &core[index])?;
            index = (index + 1) % dims.core;
        }
    }

    // aggregation <--> edge: full bipartite inside each pod
    for start in (0..dims.aggregation).step_by(half) {
        for j in 0..half {
            for k in 0..half {
                topo.add_link(&aggregation[start + j], &edge[start + k])?;
            }
        }
    }

    // edge <--> host
    let mut hosts = hosts.iter();
    for edge_switch in edge {
        for host in hosts.by_ref().take(half) {
            topo.add_link(edge_switch, host)?;
        }
    }

    Ok(topo)
}
