//! ECMP route builder.
//!
//! For every ordered host pair one minimum-hop path is chosen and expanded
//! into exact-match flow entries on each switch along the path. Equal-cost
//! candidates are spread with a single round-robin counter that runs across
//! the whole host-pair enumeration.

use crate::ip::HostAddressMap;
use crate::topology::Topology;

use super::flow::{FlowEntry, FlowTables};
use super::paths::ShortestPaths;

/// Round-robin choice among equal-cost candidates.
///
/// The counter advances once per pick, never per candidate list, so two
/// consecutive pairs with two candidates each get indices 0 and 1.
#[derive(Debug, Clone, Default)]
pub struct PathSelector {
    counter: u64,
}

impl PathSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick `candidates[counter % len]` and advance the counter.
    ///
    /// An empty candidate list yields `None` and leaves the counter alone.
    pub fn pick<'a, T>(&mut self, candidates: &'a [T]) -> Option<&'a T> {
        if candidates.is_empty() {
            return None;
        }
        let index = (self.counter % candidates.len() as u64) as usize;
        self.counter += 1;
        Some(&candidates[index])
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

/// Compute flow tables for every ordered pair of distinct hosts
pub fn build_routes(
    topology: &Topology,
    addresses: &HostAddressMap,
    selector: &mut PathSelector,
) -> FlowTables {
    let mut tables = FlowTables::new();
    let mut routed = 0usize;
    let mut unreachable = 0usize;

    for host1 in topology.hosts() {
        let Some(search) = ShortestPaths::from_node(topology, &host1.name) else {
            continue;
        };

        for host2 in topology.hosts() {
            if host1.name == host2.name {
                continue;
            }

            let candidates = search.to(&host2.name);
            let Some(path) = selector.pick(candidates.as_slice()) else {
                unreachable += 1;
                continue;
            };

            install_path(
                topology,
                path,
                addresses.get(&host1.name),
                addresses.get(&host2.name),
                &mut tables,
            );
            routed += 1;
        }
    }

    log::info!(
        "Routed {} host pairs ({} unreachable), {} flow entries",
        routed,
        unreachable,
        tables.total()
    );
    tables
}

/// Append one entry per (source, destination) address pair on every switch of the path
fn install_path(
    topology: &Topology,
    path: &[String],
    src_addresses: &[u32],
    dst_addresses: &[u32],
    tables: &mut FlowTables,
) {
    for hop in path.windows(3) {
        let (prev, cur, next) = (&hop[0], &hop[1], &hop[2]);

        if !topology.node(cur).map_or(false, |node| node.is_switch()) {
            log::warn!("Path {:?} transits non-switch node {}, skipping hop", path, cur);
            continue;
        }

        let in_port = topology.link_between(prev, cur).and_then(|link| link.port_on(cur));
        let out_port = topology.link_between(cur, next).and_then(|link| link.port_on(cur));
        let (Some(in_port), Some(out_port)) = (in_port, out_port) else {
            log::warn!("No link for hop {} -> {} -> {}", prev, cur, next);
            continue;
        };

        let entries = tables.entries_mut(cur);
        for &src in src_addresses {
            for &dst in dst_addresses {
                entries.push(FlowEntry::host_pair(in_port, out_port, src, dst));
            }
        }
    }
}
