//! # hmn-core
//!
//! A Rust library for modelling human-machine networks: directed, multiplex graphs whose vertices
//! are humans, machines and artefacts, and whose edges carry trust and interaction state per
//! relationship type.
//!
//! ## Overview
//!
//! A [`network::Network`] owns every vertex and edge. Vertices ([`network::Node`]) are either
//! agents (humans and machines, which have agency) or passive artefacts. Each vertex keeps two
//! ordered sets of edge identifiers, its inbound and outbound edges. An [`edge::Edge`] links one
//! source to one sink and can carry several relationship types at once ("collaboration",
//! "friendship", ...). For each relationship type it holds a source-side and a sink-side
//! [`properties::Connection`] (trust, trustworthiness and free-form numeric properties) plus an
//! [`properties::EdgeStats`] interaction counter.
//!
//! The model is a data structure, not a simulation. Behaviour plugs in from outside through the
//! [`actor::Agency`] trait; the network only exposes the structural operations and a simulated
//! clock.
//!
//! ### Bookkeeping
//!
//! Bookkeeping between the vertex edge sets and the network's master edge list is deliberately
//! loose:
//!
//! - Removing a vertex leaves edges that reference it in place.
//! - Creating an edge through a vertex records it only in that vertex's own set.
//! - Adding an edge id to a vertex does not check the edge's endpoints.
//!
//! [`network::Network::consistency_report`] lists every divergence, and
//! [`network::Network::attach_edge`], [`network::Network::detach_edge`] and
//! [`network::Network::remove_node_cascade`] keep both sides in step.
//!
//! ## Quick Start
//!
//! ```rust
//! use hmn_core::{
//!     actor::{HumanAttributes, MachineAttributes},
//!     categories::Role,
//!     network::{Network, Node},
//!     properties::{Connection, ConnectionSet},
//! };
//!
//! # fn main() -> Result<(), hmn_core::HmnError> {
//! let mut network = Network::named("helpdesk");
//! network.add_agent(Node::human("alice", HumanAttributes::default()))?;
//! network.add_agent(Node::machine("chatbot", MachineAttributes::default()))?;
//!
//! let support = ConnectionSet::new(
//!     "support",
//!     Connection::with_trust("alice-support", Role::Source, 0.7, 0.5),
//!     Connection::with_trust("chatbot-support", Role::Sink, 0.5, 0.9),
//! );
//! network.create_outbound_edge(&"alice".into(), "e1", &"chatbot".into(), Some(support), true)?;
//!
//! assert_eq!(network.edges().len(), 1);
//! // chatbot was not told about the edge
//! assert_eq!(network.consistency_report().len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - **[`network`]**: The container, vertices and a petgraph projection for traversal
//! - **[`edge`]**: Multiplex edges
//! - **[`properties`]**: Identifiers, connections and interaction stats
//! - **[`actor`]**: Vertex variants and the [`actor::Agency`] hook
//! - **[`categories`]**: Closed-set categorical values with validated parsing
//! - **[`snapshot`]**: JSON and TOML snapshot/restore
//! - **[`config`]**: TOML network configuration
//!
//! ## Features
//!
//! - **default**: The library
//! - **bin**: The `hmn` command line tool for inspecting and maintaining snapshots

pub mod actor;
pub mod categories;
pub mod config;
pub mod edge;
pub mod error;
pub mod network;
pub mod properties;
pub mod snapshot;

pub use error::*;
