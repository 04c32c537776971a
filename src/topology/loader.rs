//! External topology loader.
//!
//! Reads an interface-level adjacency list:
//!
//! ```text
//! <header line>
//! r1-eth0 r2-eth1
//! r2-eth1 r1-eth0
//! r2-eth2 r3-eth0
//! ```
//!
//! Each side is `<switch>-<interface>`; the switch name ends at the first
//! `-`. Every switch pair is linked once, later mentions are ignored.

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use super::types::{NodeRole, Topology, TopologyError};

/// Number of header lines preceding the adjacency records
pub const ADJACENCY_HEADER_LINES: usize = 1;

/// Match: "<switch>-<interface>"
static ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^-\s]+)-(\S+)$").expect("Invalid endpoint regex")
});

/// A parsed `<switch>-<interface>` token
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub switch: String,
    pub interface: String,
}

/// Parse one `<switch>-<interface>` token
pub fn parse_endpoint(token: &str) -> Option<Endpoint> {
    let caps = ENDPOINT.captures(token)?;
    Some(Endpoint {
        switch: caps[1].to_string(),
        interface: caps[2].to_string(),
    })
}

/// Parse one adjacency line into its two endpoints
pub fn parse_adjacency_line(line: &str) -> Option<(Endpoint, Endpoint)> {
    let mut tokens = line.split_whitespace();
    let left = parse_endpoint(tokens.next()?)?;
    let right = parse_endpoint(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    Some((left, right))
}

/// Build a topology from an adjacency list
pub fn load_topology<R: BufRead>(reader: R) -> Result<Topology, TopologyError> {
    let mut topo = Topology::new();

    for (line_no, line) in reader.lines().enumerate().skip(ADJACENCY_HEADER_LINES) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        // a switch cannot be wired to itself
        let (left, right) = parse_adjacency_line(&line)
            .filter(|(left, right)| left.switch != right.switch)
            .ok_or_else(|| TopologyError::MalformedLine {
                line_no: line_no + 1,
                line: line.clone(),
            })?;

        topo.ensure_node(&left.switch, NodeRole::Switch);
        topo.ensure_node(&right.switch, NodeRole::Switch);

        if topo.has_link(&left.switch, &right.switch) {
            log::trace!("Skipping duplicate link {} <-> {}", left.switch, right.switch);
            continue;
        }
        topo.add_named_link(&left.switch, &left.interface, &right.switch, &right.interface)?;
    }

    log::info!(
        "Loaded topology: {} switches, {} links",
        topo.switch_count(),
        topo.links().len()
    );
    Ok(topo)
}

/// Load an adjacency list file
pub fn load_topology_file(path: &Path) -> Result<Topology, TopologyError> {
    let file = File::open(path)?;
    load_topology(BufReader::new(file))
}
