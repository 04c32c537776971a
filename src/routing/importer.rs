//! External route-table importer.
//!
//! Each switch has its own route table file named after the switch. After a
//! fixed header, every record looks like
//!
//! ```text
//! 10.1.0.0/16      10.0.0.2     UG    0 0   eth1
//! 10.2.0.0/16      0.0.0.0      U     0 0   incoming
//! ```
//!
//! The first column is the destination, the last one the egress interface
//! name. Records whose last column carries the incoming marker describe
//! received traffic and are dropped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::rules::{Prefix, PrefixError};
use crate::topology::Topology;

use super::flow::{FlowEntry, FlowTables, RuleOrder};

/// Number of header lines preceding the route records
pub const ROUTE_TABLE_HEADER_LINES: usize = 5;

/// Marker in the last column of records for received traffic
pub const INCOMING_MARKER: &str = "incoming";

/// Errors that can occur while importing route tables
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read route table for {switch}: {source}")]
    Io {
        switch: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown switch: {0}")]
    UnknownSwitch(String),

    #[error("Malformed route record for {switch} at line {line_no}: '{line}'")]
    MalformedRecord {
        switch: String,
        line_no: usize,
        line: String,
    },

    #[error("Invalid destination for {switch} at line {line_no}: {source}")]
    InvalidPrefix {
        switch: String,
        line_no: usize,
        #[source]
        source: PrefixError,
    },

    #[error("Unresolved interface '{interface}' on switch {switch}, known interfaces: {known}")]
    UnresolvedInterface {
        switch: String,
        interface: String,
        known: String,
    },
}

/// A route record reduced to what the importer needs
#[derive(Debug, Clone, PartialEq)]
pub enum RouteLine<'a> {
    /// Forwarded traffic: destination and egress interface name
    Forward { dst: &'a str, interface: &'a str },
    /// Received traffic, not turned into an entry
    Incoming,
}

/// Split a record line into its destination and egress columns.
///
/// Runs of spaces count as one separator. Returns `None` when the line has
/// fewer than two columns.
pub fn parse_route_record(line: &str) -> Option<RouteLine<'_>> {
    let mut tokens = line.split_whitespace();
    let dst = tokens.next()?;
    let last = tokens.last()?;

    if last.contains(INCOMING_MARKER) {
        return Some(RouteLine::Incoming);
    }
    Some(RouteLine::Forward { dst, interface: last })
}

/// Import one switch's route table into `tables`, returning the number of
/// accepted records
pub fn import_route_table<R: BufRead>(
    topology: &Topology,
    switch: &str,
    reader: R,
    tables: &mut FlowTables,
    order: RuleOrder,
) -> Result<usize, ImportError> {
    let node = topology
        .node(switch)
        .ok_or_else(|| ImportError::UnknownSwitch(switch.to_string()))?;

    let mut accepted = 0;
    for (line_no, line) in reader.lines().enumerate().skip(ROUTE_TABLE_HEADER_LINES) {
        let line = line.map_err(|source| ImportError::Io {
            switch: switch.to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_route_record(&line).ok_or_else(|| ImportError::MalformedRecord {
            switch: switch.to_string(),
            line_no: line_no + 1,
            line: line.clone(),
        })?;

        let RouteLine::Forward { dst, interface } = record else {
            log::trace!("{}: dropping incoming record '{}'", switch, line.trim());
            continue;
        };

        let dst: Prefix = dst.parse().map_err(|source| ImportError::InvalidPrefix {
            switch: switch.to_string(),
            line_no: line_no + 1,
            source,
        })?;

        let Some(out_port) = node.port_by_name(interface) else {
            let known = format!("{:?}", node.port_names);
            log::error!(
                "Switch {} has no interface named '{}', known interfaces: {}",
                switch, interface, known
            );
            return Err(ImportError::UnresolvedInterface {
                switch: switch.to_string(),
                interface: interface.to_string(),
                known,
            });
        };

        tables.push(switch, FlowEntry::route(dst, out_port));
        accepted += 1;
    }

    tables.sort_by_prefix(switch, order);
    log::debug!("{}: imported {} routes", switch, accepted);
    Ok(accepted)
}

/// Import the route table of every switch from `<routes_dir>/<switch name>`
pub fn import_route_tables(
    topology: &Topology,
    routes_dir: &Path,
    order: RuleOrder,
) -> Result<FlowTables, ImportError> {
    let mut tables = FlowTables::new();

    for switch in topology.switches() {
        let path = routes_dir.join(&switch.name);
        let file = File::open(&path).map_err(|source| ImportError::Io {
            switch: switch.name.clone(),
            source,
        })?;
        import_route_table(topology, &switch.name, BufReader::new(file), &mut tables, order)?;
    }

    log::info!(
        "Imported {} routes for {} switches",
        tables.total(),
        topology.switch_count()
    );
    Ok(tables)
}
