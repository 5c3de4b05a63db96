//! Network module: the graph container and its vertices.
//!
//! # Module Organization
//!
//! - [`node`]: Graph vertices and their local edge bookkeeping ([Node])
//! - [`base`]: The whole-graph aggregate with container-synchronised operations, the consistency
//!   audit and the simulated clock ([Network])
//! - [`graph`]: Read-only petgraph projection for traversal ([NetworkGraph])
//!
//! ```rust
//! use hmn_core::network::{Network, Node};
//! use hmn_core::actor::HumanAttributes;
//!
//! let mut network = Network::named("team");
//! network.add_agent(Node::human("alice", HumanAttributes::default())).unwrap();
//! network.add_agent(Node::human("bob", HumanAttributes::default())).unwrap();
//! network
//!     .create_outbound_edge(&"alice".into(), "e1", &"bob".into(), None, true)
//!     .unwrap();
//! assert_eq!(network.edges().len(), 1);
//! ```

mod base;
mod graph;
mod node;


use parking_lot::RwLock;
use std::sync::Arc;

pub use base::Network;
pub use graph::NetworkGraph;
pub use node::Node;

/// A network shared between threads. Structural changes are serialised by the write lock.
pub type SharedNetwork = Arc<RwLock<Network>>;

impl Network {
    pub fn into_shared(self) -> SharedNetwork {
        Arc::new(RwLock::new(self))
    }
}
