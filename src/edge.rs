//! Directed, multiplex edges.
//!
//! An [Edge] links exactly two nodes and can carry several independently tracked relationship
//! types. For every relationship type name it keeps one source-side and one sink-side
//! [Connection] plus one [EdgeStats] record. A separate aggregate [EdgeStats] is kept as well; it
//! is never derived from the per-type records and has to be maintained by the caller.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::properties::{Connection, ConnectionSet, EdgeId, EdgeStats, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    sink: NodeId,
    #[serde(default)]
    source_connections: BTreeMap<String, Connection>,
    #[serde(default)]
    sink_connections: BTreeMap<String, Connection>,
    #[serde(default)]
    relation_stats: BTreeMap<String, EdgeStats>,
    #[serde(default)]
    stats: EdgeStats,
}

impl Edge {
    /// Create an edge with a random UUID identifier.
    pub fn new<S: Into<NodeId>, K: Into<NodeId>>(source: S, sink: K) -> Self {
        Edge::with_id(EdgeId::random(), source, sink)
    }

    pub fn with_id<I: Into<EdgeId>, S: Into<NodeId>, K: Into<NodeId>>(
        id: I,
        source: S,
        sink: K,
    ) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            sink: sink.into(),
            source_connections: BTreeMap::new(),
            sink_connections: BTreeMap::new(),
            relation_stats: BTreeMap::new(),
            stats: EdgeStats::default(),
        }
    }

    /// Builder form of [Edge::add_connection_set].
    pub fn with_connection_set<S: Into<String>>(
        mut self,
        relation: S,
        source_connection: Connection,
        sink_connection: Connection,
    ) -> Self {
        self.add_connection_set(relation, source_connection, sink_connection);
        self
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn set_id<I: Into<EdgeId>>(&mut self, id: I) {
        self.id = id.into();
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn set_source<S: Into<NodeId>>(&mut self, source: S) {
        self.source = source.into();
    }

    pub fn sink(&self) -> &NodeId {
        &self.sink
    }

    pub fn set_sink<S: Into<NodeId>>(&mut self, sink: S) {
        self.sink = sink.into();
    }

    /// True if `node` is either endpoint.
    pub fn touches(&self, node: &NodeId) -> bool {
        self.source == *node || self.sink == *node
    }

    pub fn source_connections(&self) -> &BTreeMap<String, Connection> {
        &self.source_connections
    }

    pub fn set_source_connections(&mut self, connections: BTreeMap<String, Connection>) {
        self.source_connections = connections;
    }

    pub fn source_connection(&self, relation: &str) -> Option<&Connection> {
        self.source_connections.get(relation)
    }

    pub fn source_connection_mut(&mut self, relation: &str) -> Option<&mut Connection> {
        self.source_connections.get_mut(relation)
    }

    /// Overwrites any existing source-side connection of the same relationship type.
    pub fn add_source_connection<S: Into<String>>(&mut self, relation: S, connection: Connection) {
        self.source_connections.insert(relation.into(), connection);
    }

    pub fn add_source_connections<I>(&mut self, connections: I)
    where
        I: IntoIterator<Item = (String, Connection)>,
    {
        self.source_connections.extend(connections);
    }

    pub fn sink_connections(&self) -> &BTreeMap<String, Connection> {
        &self.sink_connections
    }

    pub fn set_sink_connections(&mut self, connections: BTreeMap<String, Connection>) {
        self.sink_connections = connections;
    }

    pub fn sink_connection(&self, relation: &str) -> Option<&Connection> {
        self.sink_connections.get(relation)
    }

    pub fn sink_connection_mut(&mut self, relation: &str) -> Option<&mut Connection> {
        self.sink_connections.get_mut(relation)
    }

    /// Overwrites any existing sink-side connection of the same relationship type.
    pub fn add_sink_connection<S: Into<String>>(&mut self, relation: S, connection: Connection) {
        self.sink_connections.insert(relation.into(), connection);
    }

    pub fn add_sink_connections<I>(&mut self, connections: I)
    where
        I: IntoIterator<Item = (String, Connection)>,
    {
        self.sink_connections.extend(connections);
    }

    /// Register both sides of a relationship type in one step. This is the usual way to add a
    /// new relationship type to an existing edge.
    pub fn add_connection_set<S: Into<String>>(
        &mut self,
        relation: S,
        source_connection: Connection,
        sink_connection: Connection,
    ) {
        let relation = relation.into();
        self.add_source_connection(relation.clone(), source_connection);
        self.add_sink_connection(relation, sink_connection);
    }

    pub fn apply(&mut self, set: ConnectionSet) {
        self.add_connection_set(set.relation, set.source, set.sink);
    }

    pub fn relation_stats(&self) -> &BTreeMap<String, EdgeStats> {
        &self.relation_stats
    }

    pub fn set_relation_stats(&mut self, stats: BTreeMap<String, EdgeStats>) {
        self.relation_stats = stats;
    }

    /// Per-type stats are independent of whether a connection of that type exists.
    pub fn add_relation_stats<S: Into<String>>(&mut self, relation: S, stats: EdgeStats) {
        self.relation_stats.insert(relation.into(), stats);
    }

    pub fn extend_relation_stats<I>(&mut self, stats: I)
    where
        I: IntoIterator<Item = (String, EdgeStats)>,
    {
        self.relation_stats.extend(stats);
    }

    pub fn relation_stats_for(&self, relation: &str) -> Option<&EdgeStats> {
        self.relation_stats.get(relation)
    }

    pub fn relation_stats_for_mut(&mut self, relation: &str) -> Option<&mut EdgeStats> {
        self.relation_stats.get_mut(relation)
    }

    /// The aggregate record. Not computed from [Edge::relation_stats].
    pub fn stats(&self) -> &EdgeStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EdgeStats {
        &mut self.stats
    }

    pub fn set_stats(&mut self, stats: EdgeStats) {
        self.stats = stats;
    }

    /// All relationship type names known to any of the three per-type maps.
    pub fn relation_types(&self) -> BTreeSet<&str> {
        self.source_connections
            .keys()
            .chain(self.sink_connections.keys())
            .chain(self.relation_stats.keys())
            .map(|k| k.as_str())
            .collect()
    }

    pub fn has_relation(&self, relation: &str) -> bool {
        self.source_connections.contains_key(relation)
            || self.sink_connections.contains_key(relation)
    }

    /// Relationship types that are missing from at least one of the source connections, sink
    /// connections or per-type stats maps.
    pub fn unpaired_relation_types(&self) -> BTreeSet<&str> {
        self.relation_types()
            .into_iter()
            .filter(|relation| {
                !(self.source_connections.contains_key(*relation)
                    && self.sink_connections.contains_key(*relation)
                    && self.relation_stats.contains_key(*relation))
            })
            .collect()
    }
}

/// The result of creating an edge through a node helper: either the network took ownership of
/// the edge, or the caller holds the still-floating edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeHandle {
    Registered(EdgeId),
    Floating(Edge),
}

impl EdgeHandle {
    pub fn id(&self) -> &EdgeId {
        match self {
            EdgeHandle::Registered(id) => id,
            EdgeHandle::Floating(edge) => edge.id(),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, EdgeHandle::Registered(_))
    }

    pub fn into_floating(self) -> Option<Edge> {
        match self {
            EdgeHandle::Registered(_) => None,
            EdgeHandle::Floating(edge) => Some(edge),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Role;
    use test_log::test;

    fn collab_pair() -> (Connection, Connection) {
        (
            Connection::with_trust("a->b", Role::Source, 0.8, 0.5),
            Connection::with_trust("b<-a", Role::Sink, 0.3, 0.9),
        )
    }

    #[test]
    fn test_new_edge_gets_random_id() {
        let e1 = Edge::new("a", "b");
        let e2 = Edge::new("a", "b");
        assert_ne!(e1.id(), e2.id());
        assert_eq!(e1.source(), &NodeId::from("a"));
        assert_eq!(e1.sink(), &NodeId::from("b"));
        assert!(e1.relation_types().is_empty());
        assert_eq!(e1.stats(), &EdgeStats::default());
    }

    #[test]
    fn test_connection_set_touches_only_its_type() {
        let (src, sink) = collab_pair();
        let mut edge = Edge::with_id("e1", "a", "b").with_connection_set(
            "friendship",
            Connection::new("f-src"),
            Connection::with_role("f-sink", Role::Sink),
        );
        let before_friendship_src = edge.source_connection("friendship").cloned();

        edge.add_connection_set("collab", src.clone(), sink.clone());

        assert_eq!(edge.source_connection("collab"), Some(&src));
        assert_eq!(edge.sink_connection("collab"), Some(&sink));
        assert_eq!(edge.source_connection("friendship").cloned(), before_friendship_src);
        assert_eq!(edge.source_connections().len(), 2);
        assert_eq!(edge.sink_connections().len(), 2);
        assert!(edge.has_relation("collab"));
        assert!(!edge.has_relation("rivalry"));
    }

    #[test]
    fn test_duplicate_relation_overwrites() {
        let (src, sink) = collab_pair();
        let mut edge = Edge::with_id("e1", "a", "b").with_connection_set("collab", src, sink);
        let replacement = Connection::with_trust("new", Role::Source, 0.1, 0.1);
        edge.add_source_connection("collab", replacement.clone());
        assert_eq!(edge.source_connections().len(), 1);
        assert_eq!(edge.source_connection("collab"), Some(&replacement));
    }

    #[test]
    fn test_relation_stats_are_independent_of_connections() {
        let mut edge = Edge::with_id("e1", "a", "b");
        edge.add_relation_stats("messaging", EdgeStats::new(2, 10));
        assert!(edge.source_connection("messaging").is_none());
        assert_eq!(
            edge.relation_stats_for("messaging").map(|s| s.interactions()),
            Some(10)
        );

        if let Some(stats) = edge.relation_stats_for_mut("messaging") {
            stats.add_interaction();
        }
        assert_eq!(
            edge.relation_stats_for("messaging").map(|s| s.interactions()),
            Some(11)
        );
        // The aggregate is never derived from per-type records.
        assert_eq!(edge.stats().interactions(), 0);
        edge.stats_mut().add_interactions(11);
        assert_eq!(edge.stats().interactions(), 11);
    }

    #[test]
    fn test_unpaired_relation_types() {
        let (src, sink) = collab_pair();
        let mut edge = Edge::with_id("e1", "a", "b").with_connection_set("collab", src, sink);
        edge.add_source_connection("rivalry", Connection::new("r"));
        edge.add_relation_stats("collab", EdgeStats::default());

        let unpaired = edge.unpaired_relation_types();
        assert_eq!(unpaired.into_iter().collect::<Vec<_>>(), vec!["rivalry"]);
        assert_eq!(
            edge.relation_types().into_iter().collect::<Vec<_>>(),
            vec!["collab", "rivalry"]
        );
    }

    #[test]
    fn test_edge_handle() {
        let edge = Edge::with_id("floating", "a", "b");
        let handle = EdgeHandle::Floating(edge.clone());
        assert_eq!(handle.id(), &EdgeId::from("floating"));
        assert!(!handle.is_registered());
        assert_eq!(handle.into_floating(), Some(edge));

        let registered = EdgeHandle::Registered(EdgeId::from("e9"));
        assert!(registered.is_registered());
        assert_eq!(registered.into_floating(), None);
    }
}
