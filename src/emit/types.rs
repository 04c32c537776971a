//! Output record types.
//!
//! These are the structures written for the downstream simulator or
//! verifier: the interface-level topology and one rule table per switch.

use serde::{Deserialize, Serialize};

// ============================================================================
// Topology Records
// ============================================================================

/// A directed edge between two interface ids
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub src: u64,
    pub dst: u64,
}

/// Interface-level topology, written to `topology.json`.
///
/// Both directions of every emitted link are present.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TopologyRecord {
    pub topology: Vec<EdgeRecord>,
}

// ============================================================================
// Rule Records
// ============================================================================

/// Forwarding action of a rule
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Forward out of the rule's egress ports
    Fwd,
}

/// A compiled match-action rule
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RuleRecord {
    /// 13 comma-separated 8-character groups of `0`, `1` and `x`
    #[serde(rename = "match")]
    pub match_bits: String,
    pub in_ports: Vec<u64>,
    pub out_ports: Vec<u64>,
    pub action: Action,
    /// Always null, header rewriting is not modelled
    pub rewrite: Option<String>,
    /// Always null
    pub mask: Option<String>,
}

/// Rule table of one switch, written to `router<id>.rules.json`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RouterRecord {
    pub id: u64,
    pub ports: Vec<u64>,
    pub rules: Vec<RuleRecord>,
}
