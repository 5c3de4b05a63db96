//! Network: the whole-graph aggregate.
//!
//! The [Network] owns the authoritative, ordered collections of agent vertices, artefact vertices
//! and edges, plus the simulated clock. Nodes and edges refer to each other by identifier only.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::{
    config::NetworkConfig,
    edge::{Edge, EdgeHandle},
    error::HmnError,
    properties::{ConnectionSet, EdgeId, NodeId},
};

use super::Node;

/// Human-machine network.
///
/// Structural operations follow two contracts:
///
/// 1. Not found is not an error. Remove-by-identifier and remove-by-reference return `false`
///    (or `Ok(false)`) when the target is absent, without touching any collection.
///
/// 2. A reference with an empty identifier is a programming error and is rejected with
///    [HmnError::InvalidArgument].
///
/// Bookkeeping is asymmetric: removing a node leaves the edges that reference it in place, and the
/// node edge helpers only update the calling node's own set. [Network::consistency_report] lists
/// the divergences this allows, while [Network::attach_edge], [Network::detach_edge] and
/// [Network::remove_node_cascade] are the two-sided alternatives.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_time: Option<DateTime<Utc>>,
    #[serde(default)]
    agents: Vec<Node>,
    #[serde(default)]
    artefacts: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Network{}({} agents, {} artefacts, {} edges)",
            self.name
                .as_ref()
                .map(|n| format!(" '{n}'"))
                .unwrap_or_default(),
            self.agents.len(),
            self.artefacts.len(),
            self.edges.len()
        )
    }
}

impl Network {
    pub fn new() -> Network {
        Network::default()
    }

    pub fn named<S: Into<String>>(name: S) -> Network {
        Network {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Build a network from pre-built collections. Every agent must have agency and no artefact
    /// may have it.
    pub fn from_parts(
        agents: Vec<Node>,
        artefacts: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<Network, HmnError> {
        let mut network = Network::new();
        network.add_agents(agents)?;
        network.add_artefacts(artefacts)?;
        network.add_edges(edges);
        Ok(network)
    }

    pub fn from_config(config: &NetworkConfig) -> Network {
        Network {
            name: config.name.clone(),
            current_time: config.start_time,
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.artefacts.is_empty() && self.edges.is_empty()
    }

    // ---------------------------------------------------------------------------------------
    // Vertices
    // ---------------------------------------------------------------------------------------

    pub fn agents(&self) -> &[Node] {
        &self.agents
    }

    pub fn artefacts(&self) -> &[Node] {
        &self.artefacts
    }

    /// Agents first, then artefacts.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.agents.iter().chain(self.artefacts.iter())
    }

    /// Replace the agent collection without any cleanup of edges or node sets.
    pub fn set_agents(&mut self, agents: Vec<Node>) -> Result<(), HmnError> {
        agents.iter().try_for_each(check_agent)?;
        self.agents = agents;
        Ok(())
    }

    /// Replace the artefact collection without any cleanup of edges or node sets.
    pub fn set_artefacts(&mut self, artefacts: Vec<Node>) -> Result<(), HmnError> {
        artefacts.iter().try_for_each(check_artefact)?;
        self.artefacts = artefacts;
        Ok(())
    }

    pub fn add_agent(&mut self, node: Node) -> Result<(), HmnError> {
        check_agent(&node)?;
        tracing::debug!("[Network] adding agent {}", node.id());
        self.agents.push(node);
        Ok(())
    }

    /// Append all agents, or none of them if any lacks agency.
    pub fn add_agents<I>(&mut self, agents: I) -> Result<(), HmnError>
    where
        I: IntoIterator<Item = Node>,
    {
        let agents = agents.into_iter().collect::<Vec<_>>();
        agents.iter().try_for_each(check_agent)?;
        self.agents.extend(agents);
        Ok(())
    }

    pub fn add_artefact(&mut self, node: Node) -> Result<(), HmnError> {
        check_artefact(&node)?;
        tracing::debug!("[Network] adding artefact {}", node.id());
        self.artefacts.push(node);
        Ok(())
    }

    /// Append all artefacts, or none of them if any has agency.
    pub fn add_artefacts<I>(&mut self, artefacts: I) -> Result<(), HmnError>
    where
        I: IntoIterator<Item = Node>,
    {
        let artefacts = artefacts.into_iter().collect::<Vec<_>>();
        artefacts.iter().try_for_each(check_artefact)?;
        self.artefacts.extend(artefacts);
        Ok(())
    }

    /// Linear scan; removes the first agent with this id. Edges referencing it are kept.
    pub fn remove_agent(&mut self, id: &NodeId) -> bool {
        remove_node_by_id(&mut self.agents, id)
    }

    /// Remove the given agent. Edges referencing it are kept.
    pub fn remove_agent_node(&mut self, node: &Node) -> Result<bool, HmnError> {
        check_node_ref(node)?;
        Ok(remove_node_by_id(&mut self.agents, node.id()))
    }

    /// Linear scan; removes the first artefact with this id. Edges referencing it are kept.
    pub fn remove_artefact(&mut self, id: &NodeId) -> bool {
        remove_node_by_id(&mut self.artefacts, id)
    }

    /// Remove the given artefact. Edges referencing it are kept.
    pub fn remove_artefact_node(&mut self, node: &Node) -> Result<bool, HmnError> {
        check_node_ref(node)?;
        Ok(remove_node_by_id(&mut self.artefacts, node.id()))
    }

    pub fn agent(&self, id: &NodeId) -> Option<&Node> {
        self.agents.iter().find(|n| n.id() == id)
    }

    pub fn artefact(&self, id: &NodeId) -> Option<&Node> {
        self.artefacts.iter().find(|n| n.id() == id)
    }

    /// Look up any vertex, agents first.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.agent(id).or_else(|| self.artefact(id))
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        if let Some(idx) = self.agents.iter().position(|n| n.id() == id) {
            return self.agents.get_mut(idx);
        }
        self.artefacts.iter_mut().find(|n| n.id() == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    fn require_node_mut(&mut self, id: &NodeId) -> Result<&mut Node, HmnError> {
        self.node_mut(id)
            .ok_or_else(|| HmnError::NotFound(format!("node '{id}' is not part of the network")))
    }

    // ---------------------------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------------------------

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Replace the master edge list without any cleanup of node sets.
    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    pub fn add_edge(&mut self, edge: Edge) {
        tracing::debug!(
            "[Network] adding edge {} ({} -> {})",
            edge.id(),
            edge.source(),
            edge.sink()
        );
        self.edges.push(edge);
    }

    pub fn add_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = Edge>,
    {
        self.edges.extend(edges);
    }

    /// Linear scan; removes the first edge with this id.
    pub fn remove_edge(&mut self, id: &EdgeId) -> bool {
        match self.edges.iter().position(|e| e.id() == id) {
            Some(idx) => {
                let edge = self.edges.remove(idx);
                tracing::debug!("[Network] removed edge {}", edge.id());
                true
            }
            None => false,
        }
    }

    pub fn remove_edge_ref(&mut self, edge: &Edge) -> Result<bool, HmnError> {
        if edge.id().is_empty() {
            return Err(HmnError::InvalidArgument(
                "Cannot remove the edge from the network as the edge reference was empty"
                    .to_string(),
            ));
        }
        Ok(self.remove_edge(edge.id()))
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    pub fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge(id).is_some()
    }

    /// Every registered edge running from `source` to `sink`.
    pub fn edges_between<'a>(
        &'a self,
        source: &'a NodeId,
        sink: &'a NodeId,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source() == source && e.sink() == sink)
    }

    /// All relationship type names used by any registered edge.
    pub fn relation_types(&self) -> BTreeSet<String> {
        self.edges
            .iter()
            .flat_map(|e| e.relation_types().into_iter().map(|r| r.to_string()))
            .collect()
    }

    // ---------------------------------------------------------------------------------------
    // Node edge helpers (container-synchronised variants of the Node operations)
    // ---------------------------------------------------------------------------------------

    /// Create an edge with `node` as its sink and `source` as its source, and record it in the
    /// inbound set of `node`. With `add_to_network` the network takes the edge into its master
    /// list. The source node's outbound set is left alone.
    pub fn create_inbound_edge<I: Into<EdgeId>>(
        &mut self,
        node: &NodeId,
        id: I,
        source: &NodeId,
        connections: Option<ConnectionSet>,
        add_to_network: bool,
    ) -> Result<EdgeHandle, HmnError> {
        self.warn_unknown_endpoint(source);
        let edge = self
            .require_node_mut(node)?
            .create_inbound_edge(id, source, connections);
        Ok(self.settle(edge, add_to_network))
    }

    /// Create an edge with `node` as its source and `sink` as its sink, and record it in the
    /// outbound set of `node`. With `add_to_network` the network takes the edge into its master
    /// list. The sink node's inbound set is left alone.
    pub fn create_outbound_edge<I: Into<EdgeId>>(
        &mut self,
        node: &NodeId,
        id: I,
        sink: &NodeId,
        connections: Option<ConnectionSet>,
        add_to_network: bool,
    ) -> Result<EdgeHandle, HmnError> {
        self.warn_unknown_endpoint(sink);
        let edge = self
            .require_node_mut(node)?
            .create_outbound_edge(id, sink, connections);
        Ok(self.settle(edge, add_to_network))
    }

    /// Remove `edge` from the inbound set of `node`. When it was there and `remove_from_network`
    /// is set, the result is that of removing it from the master list.
    pub fn remove_inbound_edge(
        &mut self,
        node: &NodeId,
        edge: &EdgeId,
        remove_from_network: bool,
    ) -> Result<bool, HmnError> {
        let removed = self.require_node_mut(node)?.remove_inbound_edge(edge)?;
        Ok(self.settle_removal(removed, edge, remove_from_network))
    }

    /// Remove `edge` from the outbound set of `node`. When it was there and
    /// `remove_from_network` is set, the result is that of removing it from the master list.
    pub fn remove_outbound_edge(
        &mut self,
        node: &NodeId,
        edge: &EdgeId,
        remove_from_network: bool,
    ) -> Result<bool, HmnError> {
        let removed = self.require_node_mut(node)?.remove_outbound_edge(edge)?;
        Ok(self.settle_removal(removed, edge, remove_from_network))
    }

    fn settle(&mut self, edge: Edge, add_to_network: bool) -> EdgeHandle {
        if add_to_network {
            let id = edge.id().clone();
            self.add_edge(edge);
            EdgeHandle::Registered(id)
        } else {
            EdgeHandle::Floating(edge)
        }
    }

    fn settle_removal(&mut self, removed: bool, edge: &EdgeId, remove_from_network: bool) -> bool {
        match (removed, remove_from_network) {
            (false, _) => false,
            (true, true) => self.remove_edge(edge),
            (true, false) => true,
        }
    }

    fn warn_unknown_endpoint(&self, other: &NodeId) {
        if !self.contains_node(other) {
            tracing::warn!("[Network] creating an edge towards unregistered node '{other}'");
        }
    }

    // ---------------------------------------------------------------------------------------
    // Two-sided bookkeeping
    // ---------------------------------------------------------------------------------------

    /// Register `edge` in the master list and in the outbound set of its source and the inbound
    /// set of its sink. Both endpoints must already be in the network.
    pub fn attach_edge(&mut self, edge: Edge) -> Result<EdgeId, HmnError> {
        if edge.id().is_empty() {
            return Err(HmnError::InvalidArgument(
                "Cannot attach an edge with an empty identifier".to_string(),
            ));
        }
        for endpoint in [edge.source(), edge.sink()] {
            if !self.contains_node(endpoint) {
                return Err(HmnError::NotFound(format!(
                    "edge '{}' endpoint '{endpoint}' is not part of the network",
                    edge.id()
                )));
            }
        }
        let id = edge.id().clone();
        let (source, sink) = (edge.source().clone(), edge.sink().clone());
        self.require_node_mut(&source)?.add_outbound_edge(&id);
        self.require_node_mut(&sink)?.add_inbound_edge(&id);
        self.add_edge(edge);
        Ok(id)
    }

    /// Remove the edge from the master list and from every node set that mentions it.
    pub fn detach_edge(&mut self, id: &EdgeId) -> bool {
        let mut touched = false;
        for node in self.agents.iter_mut().chain(self.artefacts.iter_mut()) {
            touched |= node.forget_edge(id);
        }
        let before = self.edges.len();
        self.edges.retain(|e| e.id() != id);
        let removed = before != self.edges.len();
        if removed || touched {
            tracing::debug!("[Network] detached edge {id}");
        }
        removed || touched
    }

    /// Remove every node with this id together with every registered edge that references it.
    /// Those edges are also dropped from the surviving endpoints' sets.
    pub fn remove_node_cascade(&mut self, id: &NodeId) -> bool {
        let before = self.agents.len() + self.artefacts.len();
        self.agents.retain(|n| n.id() != id);
        self.artefacts.retain(|n| n.id() != id);
        if before == self.agents.len() + self.artefacts.len() {
            return false;
        }
        let doomed = self
            .edges
            .iter()
            .filter(|e| e.touches(id))
            .map(|e| e.id().clone())
            .collect::<Vec<_>>();
        tracing::debug!(
            "[Network] removing node {id} and {} dependent edges",
            doomed.len()
        );
        for edge in doomed.iter() {
            self.detach_edge(edge);
        }
        true
    }

    // ---------------------------------------------------------------------------------------
    // Consistency
    // ---------------------------------------------------------------------------------------

    /// List every way the node-local edge sets, the master lists and the edges disagree.
    /// An empty result means the network is fully consistent.
    pub fn consistency_report(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen_nodes = BTreeSet::new();
        for node in self.nodes() {
            if !seen_nodes.insert(node.id()) {
                errors.push(format!("node id '{}' is registered more than once", node.id()));
            }
        }

        let mut edges_by_id: BTreeMap<&EdgeId, &Edge> = BTreeMap::new();
        for edge in self.edges.iter() {
            if edges_by_id.insert(edge.id(), edge).is_some() {
                errors.push(format!("edge id '{}' is registered more than once", edge.id()));
            }
        }

        for node in self.nodes() {
            for (side, set) in [
                ("inbound", node.inbound_edges()),
                ("outbound", node.outbound_edges()),
            ] {
                for edge_id in set {
                    let Some(edge) = edges_by_id.get(edge_id) else {
                        errors.push(format!(
                            "node '{}' lists {side} edge '{edge_id}' which is not in the network",
                            node.id()
                        ));
                        continue;
                    };
                    let endpoint = match side {
                        "inbound" => edge.sink(),
                        _ => edge.source(),
                    };
                    if endpoint != node.id() {
                        errors.push(format!(
                            "node '{}' lists {side} edge '{edge_id}' whose {} is '{endpoint}'",
                            node.id(),
                            if side == "inbound" { "sink" } else { "source" }
                        ));
                    }
                }
            }
        }

        for edge in self.edges.iter() {
            match self.node(edge.source()) {
                Some(source) if !source.has_outbound_edge(edge.id()) => errors.push(format!(
                    "edge '{}' is missing from the outbound set of its source '{}'",
                    edge.id(),
                    edge.source()
                )),
                None => errors.push(format!(
                    "edge '{}' source '{}' is not part of the network",
                    edge.id(),
                    edge.source()
                )),
                _ => {}
            }
            match self.node(edge.sink()) {
                Some(sink) if !sink.has_inbound_edge(edge.id()) => errors.push(format!(
                    "edge '{}' is missing from the inbound set of its sink '{}'",
                    edge.id(),
                    edge.sink()
                )),
                None => errors.push(format!(
                    "edge '{}' sink '{}' is not part of the network",
                    edge.id(),
                    edge.sink()
                )),
                _ => {}
            }
            let unpaired = edge.unpaired_relation_types();
            if !unpaired.is_empty() {
                errors.push(format!(
                    "edge '{}' has relation types without a full connection/stats set: {}",
                    edge.id(),
                    unpaired.into_iter().collect::<Vec<_>>().join(", ")
                ));
            }
        }

        errors
    }

    pub fn check_consistency(&self) -> Result<(), HmnError> {
        let errors = self.consistency_report();
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!("Network isn't consistent. Errors:\n- {}", errors.join("\n- "));
            Err(HmnError::Inconsistent(errors))
        }
    }

    // ---------------------------------------------------------------------------------------
    // Simulated clock
    // ---------------------------------------------------------------------------------------

    pub fn current_time(&self) -> Option<DateTime<Utc>> {
        self.current_time
    }

    pub fn set_current_time(&mut self, time: DateTime<Utc>) {
        self.current_time = Some(time);
    }

    /// Move the clock by a signed number of seconds and return the new time.
    pub fn advance_clock(&mut self, seconds: i64) -> Result<DateTime<Utc>, HmnError> {
        let current = self.current_time.ok_or(HmnError::ClockUnset)?;
        let next = Duration::try_seconds(seconds)
            .and_then(|delta| current.checked_add_signed(delta))
            .ok_or_else(|| {
                HmnError::InvalidArgument(format!(
                    "advancing the clock by {seconds}s leaves the representable range"
                ))
            })?;
        self.current_time = Some(next);
        Ok(next)
    }
}

fn check_agent(node: &Node) -> Result<(), HmnError> {
    check_node_ref(node)?;
    if node.has_agency() {
        Ok(())
    } else {
        Err(HmnError::InvalidArgument(format!(
            "node '{}' is a {} and has no agency, it cannot be added as an agent",
            node.id(),
            node.kind()
        )))
    }
}

fn check_artefact(node: &Node) -> Result<(), HmnError> {
    check_node_ref(node)?;
    if node.has_agency() {
        Err(HmnError::InvalidArgument(format!(
            "node '{}' is a {} and has agency, it cannot be added as an artefact",
            node.id(),
            node.kind()
        )))
    } else {
        Ok(())
    }
}

fn check_node_ref(node: &Node) -> Result<(), HmnError> {
    if node.id().is_empty() {
        Err(HmnError::InvalidArgument(
            "The node reference provided has an empty identifier".to_string(),
        ))
    } else {
        Ok(())
    }
}

fn remove_node_by_id(nodes: &mut Vec<Node>, id: &NodeId) -> bool {
    match nodes.iter().position(|n| n.id() == id) {
        Some(idx) => {
            let node = nodes.remove(idx);
            tracing::debug!("[Network] removed node {}", node.id());
            true
        }
        None => false,
    }
}
