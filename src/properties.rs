//! [crate::properties] contains the value types that hang off the graph: identifiers, the
//! per-endpoint [Connection] stance and the [EdgeStats] interaction counters.
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};
use uuid::Uuid;

use crate::categories::Role;

/// Identifier of a [crate::network::Node], unique within a [crate::network::Network].
#[derive(Clone, Debug, Default, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty identifier stands in for a missing reference and cannot address anything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Identifier of an [crate::edge::Edge].
#[derive(Clone, Debug, Default, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        EdgeId(id.into())
    }

    /// A fresh v4 UUID, hyphenated lowercase.
    pub fn random() -> Self {
        EdgeId(
            Uuid::new_v4()
                .hyphenated()
                .encode_lower(&mut Uuid::encode_buffer())
                .to_string(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

macro_rules! id_conversions {
    ($ty:ident) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                $ty(id.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(id: String) -> Self {
                $ty(id)
            }
        }

        impl From<&$ty> for $ty {
            fn from(id: &$ty) -> Self {
                id.clone()
            }
        }

        impl From<$ty> for String {
            fn from(val: $ty) -> Self {
                val.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $ty {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

id_conversions!(NodeId);
id_conversions!(EdgeId);

/// Interaction accounting for one relationship type (or, for the aggregate record on an
/// [crate::edge::Edge], across all of them).
///
/// Neither field is bounded. The interaction count only moves through [EdgeStats::add_interaction]
/// and [EdgeStats::add_interactions] unless it is overwritten with [EdgeStats::set_interactions].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeStats {
    interaction_strength: i64,
    interactions: i64,
}

impl EdgeStats {
    pub fn new(interaction_strength: i64, interactions: i64) -> Self {
        EdgeStats {
            interaction_strength,
            interactions,
        }
    }

    pub fn interaction_strength(&self) -> i64 {
        self.interaction_strength
    }

    pub fn set_interaction_strength(&mut self, strength: i64) {
        self.interaction_strength = strength;
    }

    pub fn interactions(&self) -> i64 {
        self.interactions
    }

    pub fn set_interactions(&mut self, interactions: i64) {
        self.interactions = interactions;
    }

    pub fn add_interaction(&mut self) {
        self.add_interactions(1);
    }

    /// Negative deltas are accepted as-is. Saturates instead of overflowing.
    pub fn add_interactions(&mut self, delta: i64) {
        self.interactions = self.interactions.saturating_add(delta);
    }
}

/// One endpoint's stance on a single relationship type of an [crate::edge::Edge].
///
/// How `trust` and `trustworthiness` are read depends solely on [Connection::role]: `trust` is
/// always this endpoint's trust in its counterpart and `trustworthiness` is how trustworthy the
/// counterpart perceives this endpoint to be. Nothing here enforces that reading.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    id: String,
    role: Role,
    trust: f64,
    trustworthiness: f64,
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, f64>,
}

impl Connection {
    /// A [Role::Source] connection with zero trust and trustworthiness.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Connection {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_role<S: Into<String>>(id: S, role: Role) -> Self {
        Connection {
            id: id.into(),
            role,
            ..Default::default()
        }
    }

    pub fn with_trust<S: Into<String>>(id: S, role: Role, trust: f64, trustworthiness: f64) -> Self {
        Connection {
            id: id.into(),
            role,
            trust,
            trustworthiness,
            properties: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id<S: Into<String>>(&mut self, id: S) {
        self.id = id.into();
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn trust(&self) -> f64 {
        self.trust
    }

    pub fn set_trust(&mut self, trust: f64) {
        self.trust = trust;
    }

    pub fn trustworthiness(&self) -> f64 {
        self.trustworthiness
    }

    pub fn set_trustworthiness(&mut self, trustworthiness: f64) {
        self.trustworthiness = trustworthiness;
    }

    pub fn properties(&self) -> &BTreeMap<String, f64> {
        &self.properties
    }

    /// Replace the whole property mapping.
    pub fn set_properties(&mut self, properties: BTreeMap<String, f64>) {
        self.properties = properties;
    }

    /// `None` means the property was never set, which is distinct from a stored `0.0`.
    pub fn property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).copied()
    }

    pub fn set_property<S: Into<String>>(&mut self, key: S, value: f64) {
        self.properties.insert(key.into(), value);
    }
}

/// A relationship type name together with the source-side and sink-side [Connection]s that
/// should be registered for it on an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSet {
    pub relation: String,
    pub source: Connection,
    pub sink: Connection,
}

impl ConnectionSet {
    pub fn new<S: Into<String>>(relation: S, source: Connection, sink: Connection) -> Self {
        ConnectionSet {
            relation: relation.into(),
            source,
            sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_increments_match_direct_delta() {
        let mut stepped = EdgeStats::default();
        stepped.add_interaction();
        stepped.add_interaction();
        stepped.add_interaction();

        let mut direct = EdgeStats::default();
        direct.add_interactions(3);

        assert_eq!(stepped.interactions(), 3);
        assert_eq!(stepped, direct);
    }

    #[test]
    fn test_edge_stats_accepts_negative_values() {
        let mut stats = EdgeStats::new(5, 2);
        stats.add_interactions(-4);
        assert_eq!(stats.interactions(), -2);
        stats.set_interaction_strength(-10);
        assert_eq!(stats.interaction_strength(), -10);
        stats.set_interactions(i64::MAX);
        stats.add_interaction();
        assert_eq!(stats.interactions(), i64::MAX);
    }

    #[test]
    fn test_connection_defaults() {
        let con = Connection::new("c1");
        assert_eq!(con.id(), "c1");
        assert_eq!(con.role(), Role::Source);
        assert_eq!(con.trust(), 0.0);
        assert_eq!(con.trustworthiness(), 0.0);
        assert!(con.properties().is_empty());
    }

    #[test]
    fn test_connection_property_absent_vs_zero() {
        let mut con = Connection::with_trust("c2", Role::Sink, 0.7, 0.4);
        assert_eq!(con.property("reciprocity"), None);
        con.set_property("reciprocity", 0.0);
        assert_eq!(con.property("reciprocity"), Some(0.0));

        let mut replacement = BTreeMap::new();
        replacement.insert("frequency".to_string(), 2.5);
        con.set_properties(replacement);
        assert_eq!(con.property("reciprocity"), None);
        assert_eq!(con.property("frequency"), Some(2.5));
        assert_eq!(con.role(), Role::Sink);
        assert_eq!(con.trust(), 0.7);
        assert_eq!(con.trustworthiness(), 0.4);
    }

    #[test]
    fn test_random_edge_ids_are_unique() {
        let a = EdgeId::random();
        let b = EdgeId::random();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }
}
