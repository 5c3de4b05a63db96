//! Vertex variants.
//!
//! A vertex is either an agent with agency (a [HumanAttributes] or [MachineAttributes] record) or
//! a passive artefact. The attribute records are plain data; behaviour lives in the external
//! simulation driver, which plugs in through the [Agency] trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    categories::{Culture, Gender, SexualOrientation},
    error::HmnError,
    network::Network,
    properties::NodeId,
};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanAttributes {
    pub age: u32,
    pub gender: Gender,
    pub sexual_orientation: SexualOrientation,
    pub culture: Culture,
    pub self_efficacy: f64,
    pub computer_self_efficacy: f64,
    /// Disposition to trust, independent of any particular connection.
    pub trust: f64,
    pub reputation: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineAttributes {
    pub capacity: f64,
    pub availability: f64,
    pub reliability: f64,
    pub responsiveness: f64,
    pub throughput: f64,
    pub utilisation: f64,
}

/// Documents, messages and other vertices without agency.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtefactAttributes {
    /// The agent that created the artefact, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ArtefactAttributes {
    pub fn created_by<N: Into<NodeId>>(creator: N, created_at: DateTime<Utc>) -> Self {
        ArtefactAttributes {
            creator: Some(creator.into()),
            created_at: Some(created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    Human(HumanAttributes),
    Machine(MachineAttributes),
    Artefact(ArtefactAttributes),
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Artefact(ArtefactAttributes::default())
    }
}

impl NodeKind {
    /// True for exactly the human and machine variants.
    pub fn has_agency(&self) -> bool {
        matches!(self, NodeKind::Human(_) | NodeKind::Machine(_))
    }

    pub fn as_human(&self) -> Option<&HumanAttributes> {
        match self {
            NodeKind::Human(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_human_mut(&mut self) -> Option<&mut HumanAttributes> {
        match self {
            NodeKind::Human(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_machine(&self) -> Option<&MachineAttributes> {
        match self {
            NodeKind::Machine(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_machine_mut(&mut self) -> Option<&mut MachineAttributes> {
        match self {
            NodeKind::Machine(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_artefact(&self) -> Option<&ArtefactAttributes> {
        match self {
            NodeKind::Artefact(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_artefact_mut(&mut self) -> Option<&mut ArtefactAttributes> {
        match self {
            NodeKind::Artefact(attrs) => Some(attrs),
            _ => None,
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            NodeKind::Human(_) => write!(f, "human"),
            NodeKind::Machine(_) => write!(f, "machine"),
            NodeKind::Artefact(_) => write!(f, "artefact"),
        }
    }
}

/// The action hook of an agent vertex.
///
/// A simulation driver holds one implementation per agent and calls [Agency::take_action] once
/// per simulated tick. The network is handed in explicitly; implementations look up their own
/// vertex through [Agency::node_id]. Iteration order, retries and how a failure affects the rest
/// of a tick are up to the driver.
pub trait Agency {
    fn node_id(&self) -> &NodeId;

    fn take_action(&mut self, network: &mut Network) -> Result<(), HmnError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_agency_capability() {
        assert!(NodeKind::Human(HumanAttributes::default()).has_agency());
        assert!(NodeKind::Machine(MachineAttributes::default()).has_agency());
        assert!(!NodeKind::default().has_agency());
    }

    #[test]
    fn test_human_defaults() {
        let human = HumanAttributes::default();
        assert_eq!(human.age, 0);
        assert_eq!(human.gender, Gender::Other);
        assert_eq!(human.sexual_orientation, SexualOrientation::Other);
        assert_eq!(human.culture, Culture::Other);
        assert_eq!(human.reputation, 0);
    }

    #[test]
    fn test_kind_accessors() {
        let mut kind = NodeKind::Machine(MachineAttributes {
            reliability: 0.99,
            ..Default::default()
        });
        assert!(kind.as_human().is_none());
        assert!(kind.as_artefact().is_none());
        if let Some(machine) = kind.as_machine_mut() {
            machine.utilisation = 0.5;
        }
        assert_eq!(kind.as_machine().map(|m| m.utilisation), Some(0.5));
        assert_eq!(kind.to_string(), "machine");
    }

    #[test]
    fn test_kind_serializes_with_tag() {
        let kind = NodeKind::Human(HumanAttributes {
            age: 42,
            gender: Gender::Female,
            ..Default::default()
        });
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["kind"], "human");
        assert_eq!(json["gender"], "female");
        let back: NodeKind = serde_json::from_value(json).unwrap();
        assert_eq!(back, kind);
    }
}
