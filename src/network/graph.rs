use petgraph::{
    graph::NodeIndex,
    visit::{depth_first_search, DfsEvent, Reversed},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Deref,
};

use crate::properties::{EdgeId, NodeId};

use super::Network;

/// A read-only petgraph projection of a [Network], keyed by node and edge identifiers.
///
/// The projection is built from the network's master edge list. Registered vertices without edges
/// are included; edge endpoints that are not registered in the network are included as well, so
/// dangling edges still show up in traversals.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    graph: petgraph::Graph<NodeId, EdgeId>,
    id_to_index: BTreeMap<NodeId, NodeIndex>,
}

impl NetworkGraph {
    /// Build from `(source, sink, edge)` triples plus any extra vertices that should appear even
    /// when they have no edges.
    pub fn from_edges<N, I>(nodes: N, edges: I) -> Self
    where
        N: IntoIterator<Item = NodeId>,
        I: IntoIterator<Item = (NodeId, NodeId, EdgeId)>,
    {
        let mut graph = NetworkGraph::default();
        for node in nodes {
            graph.index_of(node);
        }
        for (source, sink, edge) in edges {
            let source_idx = graph.index_of(source);
            let sink_idx = graph.index_of(sink);
            graph.graph.add_edge(source_idx, sink_idx, edge);
        }
        graph
    }

    pub(crate) fn from_network(network: &Network, relation: Option<&str>) -> Self {
        let edges = network
            .edges()
            .iter()
            .filter(|edge| relation.is_none_or(|r| edge.has_relation(r)))
            .map(|edge| (edge.source().clone(), edge.sink().clone(), edge.id().clone()));
        NetworkGraph::from_edges(network.nodes().map(|n| n.id().clone()), edges)
    }

    fn index_of(&mut self, node: NodeId) -> NodeIndex {
        if let Some(idx) = self.id_to_index.get(&node) {
            return *idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.id_to_index.insert(node, idx);
        idx
    }

    pub fn as_graph(&self) -> &petgraph::Graph<NodeId, EdgeId> {
        &self.graph
    }

    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.id_to_index.contains_key(node)
    }

    /// Every vertex reachable from `start` by following edges forward. `start` itself is not
    /// included.
    pub fn downstream(&self, start: &NodeId) -> BTreeSet<NodeId> {
        let Some(start_idx) = self.id_to_index.get(start) else {
            return BTreeSet::new();
        };
        let mut reached = BTreeSet::new();
        depth_first_search(&self.graph, Some(*start_idx), |event| {
            if let DfsEvent::Discover(idx, _) = event {
                if idx != *start_idx {
                    reached.insert(self.graph[idx].clone());
                }
            }
        });
        reached
    }

    /// Every vertex that can reach `start`. `start` itself is not included.
    pub fn upstream(&self, start: &NodeId) -> BTreeSet<NodeId> {
        let Some(start_idx) = self.id_to_index.get(start) else {
            return BTreeSet::new();
        };
        let mut reached = BTreeSet::new();
        depth_first_search(Reversed(&self.graph), Some(*start_idx), |event| {
            if let DfsEvent::Discover(idx, _) = event {
                if idx != *start_idx {
                    reached.insert(self.graph[idx].clone());
                }
            }
        });
        reached
    }
}

impl Deref for NetworkGraph {
    type Target = petgraph::Graph<NodeId, EdgeId>;
    fn deref(&self) -> &petgraph::Graph<NodeId, EdgeId> {
        &self.graph
    }
}

impl Network {
    /// Project the network into a [NetworkGraph]. With `relation` only edges carrying a
    /// connection of that relationship type on either side are included.
    pub fn graph(&self, relation: Option<&str>) -> NetworkGraph {
        NetworkGraph::from_network(self, relation)
    }
}
