//! Graph vertices.
//!
//! A [Node] owns two ordered sets of edge identifiers. These sets are views into the edge
//! population owned by a [super::Network]; nothing here checks that an edge id refers to an edge
//! the network knows about, or that the edge actually points at this node. Every operation in
//! this module is local to the node. The container-synchronised variants live on
//! [super::Network].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    actor::{ArtefactAttributes, HumanAttributes, MachineAttributes, NodeKind},
    edge::Edge,
    error::HmnError,
    properties::{ConnectionSet, EdgeId, NodeId},
};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    #[serde(default)]
    inbound: Vec<EdgeId>,
    #[serde(default)]
    outbound: Vec<EdgeId>,
}

impl Node {
    pub fn new<I: Into<NodeId>>(id: I, kind: NodeKind) -> Self {
        Node {
            id: id.into(),
            kind,
            inbound: Vec::new(),
            outbound: Vec::new(),
        }
    }

    pub fn human<I: Into<NodeId>>(id: I, attributes: HumanAttributes) -> Self {
        Node::new(id, NodeKind::Human(attributes))
    }

    pub fn machine<I: Into<NodeId>>(id: I, attributes: MachineAttributes) -> Self {
        Node::new(id, NodeKind::Machine(attributes))
    }

    pub fn artefact<I: Into<NodeId>>(id: I, attributes: ArtefactAttributes) -> Self {
        Node::new(id, NodeKind::Artefact(attributes))
    }

    /// Seed the node with existing edge sets.
    pub fn with_edges<A, B>(mut self, inbound: A, outbound: B) -> Self
    where
        A: IntoIterator<Item = EdgeId>,
        B: IntoIterator<Item = EdgeId>,
    {
        self.inbound.extend(inbound);
        self.outbound.extend(outbound);
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn has_agency(&self) -> bool {
        self.kind.has_agency()
    }

    pub fn inbound_edges(&self) -> &[EdgeId] {
        &self.inbound
    }

    /// Replace the inbound set wholesale. No cleanup happens for the edges that drop out.
    pub fn set_inbound_edges(&mut self, inbound: Vec<EdgeId>) {
        self.inbound = inbound;
    }

    pub fn outbound_edges(&self) -> &[EdgeId] {
        &self.outbound
    }

    /// Replace the outbound set wholesale. No cleanup happens for the edges that drop out.
    pub fn set_outbound_edges(&mut self, outbound: Vec<EdgeId>) {
        self.outbound = outbound;
    }

    /// Build an edge with this node as the sink and record it in the inbound set. The source node
    /// is not told about the edge.
    pub fn create_inbound_edge<I, S>(
        &mut self,
        id: I,
        source: S,
        connections: Option<ConnectionSet>,
    ) -> Edge
    where
        I: Into<EdgeId>,
        S: Into<NodeId>,
    {
        let mut edge = Edge::with_id(id, source, self.id.clone());
        if let Some(set) = connections {
            edge.apply(set);
        }
        self.inbound.push(edge.id().clone());
        edge
    }

    /// Build an edge with this node as the source and record it in the outbound set. The sink
    /// node is not told about the edge.
    pub fn create_outbound_edge<I, K>(
        &mut self,
        id: I,
        sink: K,
        connections: Option<ConnectionSet>,
    ) -> Edge
    where
        I: Into<EdgeId>,
        K: Into<NodeId>,
    {
        let mut edge = Edge::with_id(id, self.id.clone(), sink);
        if let Some(set) = connections {
            edge.apply(set);
        }
        self.outbound.push(edge.id().clone());
        edge
    }

    /// Append without checking that the edge's sink is this node.
    pub fn add_inbound_edge<I: Into<EdgeId>>(&mut self, edge: I) {
        self.inbound.push(edge.into());
    }

    pub fn add_inbound_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = EdgeId>,
    {
        self.inbound.extend(edges);
    }

    /// Append without checking that the edge's source is this node.
    pub fn add_outbound_edge<I: Into<EdgeId>>(&mut self, edge: I) {
        self.outbound.push(edge.into());
    }

    pub fn add_outbound_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = EdgeId>,
    {
        self.outbound.extend(edges);
    }

    /// Remove the first occurrence of `edge` from the inbound set. `Ok(false)` if it was not
    /// there; an empty identifier is rejected.
    pub fn remove_inbound_edge(&mut self, edge: &EdgeId) -> Result<bool, HmnError> {
        remove_first(&mut self.inbound, edge, "inbound")
    }

    /// Remove the first occurrence of `edge` from the outbound set. `Ok(false)` if it was not
    /// there; an empty identifier is rejected.
    pub fn remove_outbound_edge(&mut self, edge: &EdgeId) -> Result<bool, HmnError> {
        remove_first(&mut self.outbound, edge, "outbound")
    }

    pub fn has_inbound_edge(&self, edge: &EdgeId) -> bool {
        self.inbound.contains(edge)
    }

    pub fn has_outbound_edge(&self, edge: &EdgeId) -> bool {
        self.outbound.contains(edge)
    }

    /// Drop `edge` from both sets, every occurrence. Returns whether anything was removed.
    pub(crate) fn forget_edge(&mut self, edge: &EdgeId) -> bool {
        let before = self.inbound.len() + self.outbound.len();
        self.inbound.retain(|e| e != edge);
        self.outbound.retain(|e| e != edge);
        before != self.inbound.len() + self.outbound.len()
    }
}

fn remove_first(set: &mut Vec<EdgeId>, edge: &EdgeId, side: &str) -> Result<bool, HmnError> {
    if edge.is_empty() {
        return Err(HmnError::InvalidArgument(format!(
            "Cannot remove the {side} edge from the node as the edge reference was empty"
        )));
    }
    match set.iter().position(|e| e == edge) {
        Some(idx) => {
            set.remove(idx);
            Ok(true)
        }
        None => Ok(false),
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
