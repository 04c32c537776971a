//! Minimum-hop path enumeration over the topology graph.

use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use crate::topology::Topology;

/// Hop distances from one source node, reusable for every destination.
///
/// The graph is undirected, so a single Dijkstra run from the source gives
/// enough to enumerate minimum-hop paths towards any target.
#[derive(Debug)]
pub struct ShortestPaths<'a> {
    topology: &'a Topology,
    source: NodeIndex,
    distance: HashMap<NodeIndex, u32>,
}

impl<'a> ShortestPaths<'a> {
    /// Run the search from `from`; `None` when the node is unknown
    pub fn from_node(topology: &'a Topology, from: &str) -> Option<Self> {
        let source = topology.graph_index(from)?;
        let distance = dijkstra(topology.graph(), source, None, |edge| *edge.weight());
        Some(Self { topology, source, distance })
    }

    /// All minimum-hop paths from the source to `to`, as node-name sequences.
    ///
    /// Paths are ordered by the creation order of the nodes they visit, first
    /// hop first, so repeated calls return the same candidate list. Returns
    /// an empty list when `to` is unknown or unreachable.
    pub fn to(&self, to: &str) -> Vec<Vec<String>> {
        let Some(target) = self.topology.graph_index(to) else {
            return Vec::new();
        };
        if !self.distance.contains_key(&target) {
            return Vec::new();
        }

        let mut paths = Vec::new();
        let mut path = vec![target];
        self.walk_back(target, &mut path, &mut paths);

        // every path has the same length, so this is first-hop-first order
        paths.sort();
        let graph = self.topology.graph();
        paths
            .into_iter()
            .map(|path| path.into_iter().map(|index| graph[index].clone()).collect())
            .collect()
    }

    /// Walk from the target towards the source along decreasing distance
    fn walk_back(&self, current: NodeIndex, path: &mut Vec<NodeIndex>, paths: &mut Vec<Vec<NodeIndex>>) {
        if current == self.source {
            paths.push(path.iter().rev().copied().collect());
            return;
        }

        let remaining = self.distance[&current];
        let mut previous: Vec<NodeIndex> = self
            .topology
            .graph()
            .neighbors(current)
            .filter(|neighbor| self.distance.get(neighbor) == Some(&(remaining - 1)))
            .collect();
        previous.sort();
        previous.dedup();

        for hop in previous {
            path.push(hop);
            self.walk_back(hop, path, paths);
            path.pop();
        }
    }
}

/// All minimum-hop paths from `from` to `to`; see [`ShortestPaths::to`]
pub fn all_shortest_paths(topology: &Topology, from: &str, to: &str) -> Vec<Vec<String>> {
    ShortestPaths::from_node(topology, from)
        .map(|paths| paths.to(to))
        .unwrap_or_default()
}
