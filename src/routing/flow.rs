//! Flow entries and per-switch flow tables.
//!
//! A flow entry is the routing decision unit shared by the ECMP route builder
//! and the route-table importer. Both append entries to a switch's table; the
//! rule compiler reads them back in table order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rules::Prefix;

/// One forwarding decision on a switch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowEntry {
    /// `None` means every switch port except the egress port
    pub in_port: Option<u64>,
    /// `None` means any source
    pub src: Option<Prefix>,
    pub dst: Option<Prefix>,
    /// Entries without an egress port compile to no rule
    pub out_port: Option<u64>,
}

impl FlowEntry {
    /// Exact-match entry for one (source, destination) address pair
    pub fn host_pair(in_port: u64, out_port: u64, src: u32, dst: u32) -> Self {
        Self {
            in_port: Some(in_port),
            src: Some(Prefix::host(src)),
            dst: Some(Prefix::host(dst)),
            out_port: Some(out_port),
        }
    }

    /// Destination-only entry as imported from a route table
    pub fn route(dst: Prefix, out_port: u64) -> Self {
        Self {
            in_port: None,
            src: None,
            dst: Some(dst),
            out_port: Some(out_port),
        }
    }

    /// Destination mask length, 0 when the entry has no destination
    pub fn dst_mask(&self) -> u8 {
        self.dst.map_or(0, |dst| dst.mask())
    }
}

/// Ordering applied to an imported route table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrder {
    /// Least specific prefix first
    #[default]
    AscendingPrefix,
    /// Most specific prefix first (longest-prefix match under first-match evaluation)
    LongestPrefixFirst,
}

/// Switch name -> flow entries in insertion order
#[derive(Debug, Clone, Default)]
pub struct FlowTables {
    tables: BTreeMap<String, Vec<FlowEntry>>,
}

impl FlowTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of a switch; empty if the switch has none
    pub fn entries(&self, switch: &str) -> &[FlowEntry] {
        self.tables.get(switch).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get-or-create the table of a switch
    pub fn entries_mut(&mut self, switch: &str) -> &mut Vec<FlowEntry> {
        self.tables.entry(switch.to_string()).or_default()
    }

    pub fn push(&mut self, switch: &str, entry: FlowEntry) {
        self.entries_mut(switch).push(entry);
    }

    /// Stable sort of a switch table by destination mask length
    pub fn sort_by_prefix(&mut self, switch: &str, order: RuleOrder) {
        if let Some(entries) = self.tables.get_mut(switch) {
            match order {
                RuleOrder::AscendingPrefix => entries.sort_by_key(FlowEntry::dst_mask),
                RuleOrder::LongestPrefixFirst => {
                    entries.sort_by_key(|entry| std::cmp::Reverse(entry.dst_mask()))
                }
            }
        }
    }

    /// Total number of entries across all switches
    pub fn total(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn switches(&self) -> impl Iterator<Item = &String> {
        self.tables.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(cidr: &str, out_port: u64) -> FlowEntry {
        FlowEntry::route(cidr.parse().unwrap(), out_port)
    }

    #[test]
    fn test_get_or_create() {
        let mut tables = FlowTables::new();
        assert!(tables.entries("s-1").is_empty());

        tables.push("s-1", route("10.0.0.0/8", 1));
        tables.entries_mut("s-1").push(route("10.1.0.0/16", 2));
        assert_eq!(tables.entries("s-1").len(), 2);
        assert_eq!(tables.total(), 2);
        assert_eq!(tables.switches().count(), 1);
    }

    #[test]
    fn test_sort_ascending_is_stable() {
        let mut tables = FlowTables::new();
        tables.push("s-1", route("10.1.1.0/24", 1));
        tables.push("s-1", route("10.0.0.0/8", 2));
        tables.push("s-1", route("10.2.2.0/24", 3));
        tables.push("s-1", route("0.0.0.0/0", 4));

        tables.sort_by_prefix("s-1", RuleOrder::AscendingPrefix);
        let ports: Vec<_> = tables.entries("s-1").iter().map(|e| e.out_port.unwrap()).collect();
        assert_eq!(ports, vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_sort_longest_first() {
        let mut tables = FlowTables::new();
        tables.push("s-1", route("0.0.0.0/0", 1));
        tables.push("s-1", route("10.1.1.0/24", 2));
        tables.push("s-1", route("10.0.0.0/8", 3));

        tables.sort_by_prefix("s-1", RuleOrder::LongestPrefixFirst);
        let masks: Vec<_> = tables.entries("s-1").iter().map(FlowEntry::dst_mask).collect();
        assert_eq!(masks, vec![24, 8, 0]);
    }

    #[test]
    fn test_host_pair_entry() {
        let entry = FlowEntry::host_pair(11, 12, 1, 2);
        assert_eq!(entry.in_port, Some(11));
        assert_eq!(entry.out_port, Some(12));
        assert_eq!(entry.src.unwrap().mask(), 32);
        assert_eq!(entry.dst_mask(), 32);
    }
}
