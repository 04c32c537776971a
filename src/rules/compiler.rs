//! Flow entry to match-action rule compilation.
//!
//! The match value is 13 comma-separated groups of 8 characters:
//!
//! | groups | content                                   |
//! |--------|-------------------------------------------|
//! | 0..4   | source address octets, big endian          |
//! | 4..8   | destination address octets, big endian     |
//! | 8..13  | wildcard placeholders for unmodelled fields |
//!
//! Within the address groups a bit is literal (`0`/`1`) when it lies inside
//! the prefix mask and `x` otherwise, so a `/20` keeps the first half of the
//! third octet literal.

use crate::emit::{Action, RouterRecord, RuleRecord};
use crate::routing::FlowEntry;
use crate::topology::Node;

use super::prefix::Prefix;

/// Number of groups in a match value
pub const MATCH_GROUPS: usize = 13;

/// Trailing placeholder groups for protocol and port fields
pub const PLACEHOLDER_GROUPS: usize = MATCH_GROUPS - 8;

const WILDCARD_GROUP: &str = "xxxxxxxx";

/// Render a prefix as four 8-character groups; `None` is fully wildcarded
pub fn encode_prefix(prefix: Option<&Prefix>) -> [String; 4] {
    let Some(prefix) = prefix else {
        return std::array::from_fn(|_| WILDCARD_GROUP.to_string());
    };

    let mask = usize::from(prefix.mask());
    let octets = prefix.addr().to_be_bytes();
    std::array::from_fn(|octet| {
        (0..8)
            .map(|bit| {
                if octet * 8 + bit >= mask {
                    'x'
                } else if octets[octet] & (0x80u8 >> bit) != 0 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    })
}

/// Build the full 13-group match value
pub fn encode_match(src: Option<&Prefix>, dst: Option<&Prefix>) -> String {
    let mut groups: Vec<String> = Vec::with_capacity(MATCH_GROUPS);
    groups.extend(encode_prefix(src));
    groups.extend(encode_prefix(dst));
    groups.extend((0..PLACEHOLDER_GROUPS).map(|_| WILDCARD_GROUP.to_string()));
    groups.join(",")
}

/// Compile one flow entry of a switch.
///
/// Entries without an egress port produce no rule. Without an explicit
/// ingress port the rule applies to every switch port except the egress.
pub fn compile_entry(entry: &FlowEntry, switch_ports: &[u64]) -> Option<RuleRecord> {
    let out_port = entry.out_port?;

    let in_ports = match entry.in_port {
        Some(port) => vec![port],
        None => switch_ports
            .iter()
            .copied()
            .filter(|&port| port != out_port)
            .collect(),
    };

    Some(RuleRecord {
        match_bits: encode_match(entry.src.as_ref(), entry.dst.as_ref()),
        in_ports,
        out_ports: vec![out_port],
        action: Action::Fwd,
        rewrite: None,
        mask: None,
    })
}

/// Compile a switch's flow table into its rule record, keeping table order
pub fn compile_switch(switch: &Node, entries: &[FlowEntry]) -> RouterRecord {
    let rules = entries
        .iter()
        .filter_map(|entry| compile_entry(entry, &switch.ports))
        .collect();

    RouterRecord {
        id: switch.id,
        ports: switch.ports.clone(),
        rules,
    }
}
