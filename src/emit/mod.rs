//! Configuration emitter.
//!
//! Serializes the interface-level topology and the per-switch rule tables
//! as pretty-printed JSON:
//!
//! - `topology.json`: `{"topology": [{"src": .., "dst": ..}, ..]}`
//! - `router<id>.rules.json`: `{"id": .., "ports": [..], "rules": [..]}`

pub mod types;

pub use types::{Action, EdgeRecord, RouterRecord, RuleRecord, TopologyRecord};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::topology::Topology;

/// File name of the topology record
pub const TOPOLOGY_FILE: &str = "topology.json";

/// File name of a switch's rule record
pub fn router_file_name(id: u64) -> String {
    format!("router{}.rules.json", id)
}

/// Build the symmetric interface edge list of a topology
pub fn topology_record(topology: &Topology, exclude_host_links: bool) -> TopologyRecord {
    let mut record = TopologyRecord::default();
    for link in topology.links() {
        if exclude_host_links && topology.is_host_link(link) {
            continue;
        }
        record.topology.push(EdgeRecord { src: link.port_a, dst: link.port_b });
        record.topology.push(EdgeRecord { src: link.port_b, dst: link.port_a });
    }
    record
}

/// Clear and recreate the output directory
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && dir != Path::new(".") {
        fs::remove_dir_all(dir)
            .wrap_err_with(|| format!("Failed to remove output directory '{}'", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

/// Write `topology.json` into `dir`
pub fn write_topology(dir: &Path, topology: &Topology, exclude_host_links: bool) -> Result<PathBuf> {
    let path = dir.join(TOPOLOGY_FILE);
    let record = topology_record(topology, exclude_host_links);
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(&path, json).wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
    log::debug!("Wrote {} edges to {:?}", record.topology.len(), path);
    Ok(path)
}

/// Write `router<id>.rules.json` into `dir`
pub fn write_router(dir: &Path, record: &RouterRecord) -> Result<PathBuf> {
    let path = dir.join(router_file_name(record.id));
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json).wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
    Ok(path)
}
