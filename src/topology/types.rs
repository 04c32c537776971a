//! Topology type definitions.
//!
//! This file contains the node, link and topology types shared by the
//! fat-tree generator, the external topology loader and the route builders.
//!
//! Naming and numbering follow the fabric conventions:
//! - hosts are named `h-<id>`, switches `s-<id>`, ids numbered per role from 1
//! - interface ids are `interface_id * INTERFACE_NAMESPACE_SIZE + sequence`,
//!   where `interface_id` is the node's creation ordinal across both roles

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeMap, HashMap};

/// Number of interface ids reserved for each node (supports 10M-node fabrics)
pub const INTERFACE_NAMESPACE_SIZE: u64 = 10_000_000;

/// Largest integer a JSON reader using IEEE doubles can represent exactly
pub const MAX_EXACT_INTERFACE_ID: u64 = 1 << 53;

/// Errors raised while building or querying a topology
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Unknown node: {name}")]
    UnknownNode { name: String },

    #[error("Malformed topology line {line_no}: '{line}'")]
    MalformedLine { line_no: usize, line: String },

    #[error("Invalid topology name '{name}', expected FatTree-<pod>")]
    InvalidName { name: String },

    #[error("Fat-tree pod parameter must be an even number >= 2, got {pod}")]
    InvalidPod { pod: usize },

    #[error("Failed to read topology input: {0}")]
    Io(#[from] std::io::Error),
}

/// Role of a node in the fabric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Host,
    Switch,
}

impl NodeRole {
    /// Name prefix used for generated node names
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeRole::Host => "h",
            NodeRole::Switch => "s",
        }
    }
}

/// A host or switch together with the interfaces allocated on it
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Numeric id, unique within the node's role
    pub id: u64,
    /// Numeric id in the shared interface namespace, unique across roles
    pub interface_id: u64,
    pub role: NodeRole,
    /// Interface ids in allocation order
    pub ports: Vec<u64>,
    /// Physical interface names, when the input provided them
    pub port_names: BTreeMap<String, u64>,
    next_port: u64,
}

impl Node {
    pub fn new(name: &str, id: u64, role: NodeRole) -> Self {
        Self {
            name: name.to_string(),
            id,
            interface_id: id,
            role,
            ports: Vec::new(),
            port_names: BTreeMap::new(),
            next_port: 1,
        }
    }

    /// Place the node's interfaces under another namespace id
    pub fn with_interface_id(mut self, interface_id: u64) -> Self {
        self.interface_id = interface_id;
        self
    }

    /// Allocate the next interface id on this node
    pub fn new_port(&mut self) -> u64 {
        let port = self.interface_id * INTERFACE_NAMESPACE_SIZE + self.next_port;
        self.ports.push(port);
        self.next_port += 1;
        port
    }

    /// Allocate an interface id and remember its physical name
    pub fn new_named_port(&mut self, port_name: &str) -> u64 {
        let port = self.new_port();
        self.port_names.insert(port_name.to_string(), port);
        port
    }

    /// Resolve a physical interface name to its id
    pub fn port_by_name(&self, port_name: &str) -> Option<u64> {
        self.port_names.get(port_name).copied()
    }

    pub fn is_host(&self) -> bool {
        self.role == NodeRole::Host
    }

    pub fn is_switch(&self) -> bool {
        self.role == NodeRole::Switch
    }
}

/// An undirected link; each endpoint owns its own interface id
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub a: String,
    pub b: String,
    pub port_a: u64,
    pub port_b: u64,
}

impl Link {
    /// Interface id of this link on the given endpoint
    pub fn port_on(&self, node: &str) -> Option<u64> {
        if self.a == node {
            Some(self.port_a)
        } else if self.b == node {
            Some(self.port_b)
        } else {
            None
        }
    }
}

/// Complete fabric description: nodes, links, pair index and path graph
#[derive(Debug, Default)]
pub struct Topology {
    nodes: Vec<Node>,
    by_name: HashMap<String, usize>,
    hosts: Vec<usize>,
    switches: Vec<usize>,
    links: Vec<Link>,
    /// (node, node) -> link, populated in both directions
    pair_index: HashMap<(String, String), usize>,
    /// Unit-weight graph used for path search; node `i` is `NodeIndex(i)`
    graph: UnGraph<String, u32>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node named `<prefix>-<next id>` for the given role
    pub fn add_node(&mut self, role: NodeRole) -> &Node {
        let name = format!("{}-{}", role.prefix(), self.role_count(role) + 1);
        let index = self.ensure_node(&name, role);
        &self.nodes[index]
    }

    /// Get-or-create a node by name, returning its index.
    ///
    /// Creating a node that already exists is a no-op. The interface
    /// namespace id is the creation ordinal, so when every switch is created
    /// before the first host, switches keep their own id and host ids start
    /// right after the last switch.
    pub fn ensure_node(&mut self, name: &str, role: NodeRole) -> usize {
        if let Some(&index) = self.by_name.get(name) {
            return index;
        }

        let id = self.role_count(role) as u64 + 1;
        let index = self.nodes.len();
        let interface_id = index as u64 + 1;
        self.nodes.push(Node::new(name, id, role).with_interface_id(interface_id));
        self.by_name.insert(name.to_string(), index);
        match role {
            NodeRole::Host => self.hosts.push(index),
            NodeRole::Switch => self.switches.push(index),
        }
        let graph_index = self.graph.add_node(name.to_string());
        debug_assert_eq!(graph_index.index(), index);
        index
    }

    /// Link two existing nodes, allocating one fresh port on each endpoint
    pub fn add_link(&mut self, a: &str, b: &str) -> Result<&Link, TopologyError> {
        self.connect(a, None, b, None)
    }

    /// Link two existing nodes with physical interface names on both ends
    pub fn add_named_link(
        &mut self,
        a: &str,
        a_port: &str,
        b: &str,
        b_port: &str,
    ) -> Result<&Link, TopologyError> {
        self.connect(a, Some(a_port), b, Some(b_port))
    }

    fn connect(
        &mut self,
        a: &str,
        a_port: Option<&str>,
        b: &str,
        b_port: Option<&str>,
    ) -> Result<&Link, TopologyError> {
        let a_index = self.index_of(a)?;
        let b_index = self.index_of(b)?;

        let port_a = allocate(&mut self.nodes[a_index], a_port);
        let port_b = allocate(&mut self.nodes[b_index], b_port);

        let link_index = self.links.len();
        self.links.push(Link {
            a: a.to_string(),
            b: b.to_string(),
            port_a,
            port_b,
        });
        self.pair_index.insert((a.to_string(), b.to_string()), link_index);
        self.pair_index.insert((b.to_string(), a.to_string()), link_index);
        self.graph
            .add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), 1);

        Ok(&self.links[link_index])
    }

    fn index_of(&self, name: &str) -> Result<usize, TopologyError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TopologyError::UnknownNode { name: name.to_string() })
    }

    fn role_count(&self, role: NodeRole) -> usize {
        match role {
            NodeRole::Host => self.hosts.len(),
            NodeRole::Switch => self.switches.len(),
        }
    }

    /// Link connecting the ordered node pair, if any
    pub fn link_between(&self, a: &str, b: &str) -> Option<&Link> {
        self.pair_index
            .get(&(a.to_string(), b.to_string()))
            .map(|&index| &self.links[index])
    }

    pub fn has_link(&self, a: &str, b: &str) -> bool {
        self.link_between(a, b).is_some()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).map(|&index| &self.nodes[index])
    }

    /// Hosts in creation order
    pub fn hosts(&self) -> impl Iterator<Item = &Node> {
        self.hosts.iter().map(move |&index| &self.nodes[index])
    }

    /// Switches in creation order
    pub fn switches(&self) -> impl Iterator<Item = &Node> {
        self.switches.iter().map(move |&index| &self.nodes[index])
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// True when either endpoint of the link is a host
    pub fn is_host_link(&self, link: &Link) -> bool {
        [&link.a, &link.b]
            .iter()
            .any(|name| self.node(name).map_or(false, Node::is_host))
    }

    /// Unit-weight path-search graph
    pub fn graph(&self) -> &UnGraph<String, u32> {
        &self.graph
    }

    /// Graph index of a node, if the node exists
    pub fn graph_index(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).map(|&index| NodeIndex::new(index))
    }
}

fn allocate(node: &mut Node, port_name: Option<&str>) -> u64 {
    match port_name {
        Some(port_name) => node.new_named_port(port_name),
        None => node.new_port(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_numbering() {
        let mut node = Node::new("s-3", 3, NodeRole::Switch);
        assert_eq!(node.new_port(), 30_000_001);
        assert_eq!(node.new_port(), 30_000_002);
        assert_eq!(node.ports, vec![30_000_001, 30_000_002]);
    }

    #[test]
    fn test_host_ports_do_not_collide_with_switch_ports() {
        let mut topo = Topology::new();
        topo.add_node(NodeRole::Switch);
        topo.add_node(NodeRole::Switch);
        topo.add_node(NodeRole::Host);
        let link = topo.add_link("s-1", "h-1").unwrap().clone();

        let host = topo.node("h-1").unwrap();
        assert_eq!(host.id, 1);
        assert_eq!(host.interface_id, 3);
        assert_eq!(link.port_on("h-1"), Some(30_000_001));
        assert_eq!(link.port_on("s-1"), Some(10_000_001));
    }

    #[test]
    fn test_ensure_node_is_idempotent() {
        let mut topo = Topology::new();
        let first = topo.ensure_node("s-1", NodeRole::Switch);
        let second = topo.ensure_node("s-1", NodeRole::Switch);
        assert_eq!(first, second);
        assert_eq!(topo.switch_count(), 1);
        assert_eq!(topo.graph().node_count(), 1);
    }

    #[test]
    fn test_generated_names_per_role() {
        let mut topo = Topology::new();
        assert_eq!(topo.add_node(NodeRole::Switch).name, "s-1");
        assert_eq!(topo.add_node(NodeRole::Switch).name, "s-2");
        let host = topo.add_node(NodeRole::Host);
        assert_eq!(host.name, "h-1");
        assert_eq!(host.id, 1);
    }

    #[test]
    fn test_link_index_both_directions() {
        let mut topo = Topology::new();
        topo.add_node(NodeRole::Switch);
        topo.add_node(NodeRole::Host);
        topo.add_link("s-1", "h-1").unwrap();

        let forward = topo.link_between("s-1", "h-1").unwrap();
        let backward = topo.link_between("h-1", "s-1").unwrap();
        assert_eq!(forward, backward);
        assert_ne!(forward.port_a, forward.port_b);
        assert_eq!(forward.port_on("s-1"), Some(10_000_001));
        assert_eq!(forward.port_on("s-2"), None);
        assert!(topo.is_host_link(forward));
        assert_eq!(topo.graph().edge_count(), 1);
    }

    #[test]
    fn test_link_unknown_node() {
        let mut topo = Topology::new();
        topo.add_node(NodeRole::Switch);
        let err = topo.add_link("s-1", "s-9").unwrap_err();
        assert!(matches!(err, TopologyError::UnknownNode { name } if name == "s-9"));
    }

    #[test]
    fn test_named_ports_are_resolvable() {
        let mut topo = Topology::new();
        topo.ensure_node("r1", NodeRole::Switch);
        topo.ensure_node("r2", NodeRole::Switch);
        let link = topo.add_named_link("r1", "eth0", "r2", "eth3").unwrap().clone();

        assert_eq!(topo.node("r1").unwrap().port_by_name("eth0"), Some(link.port_a));
        assert_eq!(topo.node("r2").unwrap().port_by_name("eth3"), Some(link.port_b));
        assert_eq!(topo.node("r2").unwrap().port_by_name("eth0"), None);
    }
}
