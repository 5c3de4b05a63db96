//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use chrono::{TimeZone, Utc};
use hmn_core::{
    actor::{ArtefactAttributes, HumanAttributes, MachineAttributes},
    categories::{Culture, Gender, Role},
    network::{Network, Node},
    properties::{Connection, ConnectionSet, EdgeStats},
};

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times, subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

#[allow(dead_code)]
pub fn connection_set(relation: &str, trust: f64, trustworthiness: f64) -> ConnectionSet {
    ConnectionSet::new(
        relation,
        Connection::with_trust(format!("{relation}-src"), Role::Source, trust, trustworthiness),
        Connection::with_trust(format!("{relation}-sink"), Role::Sink, trustworthiness, trust),
    )
}

/// A small office network: two humans, a ticketing machine and a report artefact.
///
/// Edges are created through the vertex helpers, so only the creating side records them:
///
/// - `alice -> bob` ("collab" and "friendship")
/// - `alice -> ticketing` ("support")
/// - `ticketing -> report` ("authorship"), created as an inbound edge of the report
#[allow(dead_code)]
pub fn office_network() -> Network {
    init_logging();

    let mut network = Network::named("office");
    network.set_current_time(Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap());

    network
        .add_agent(Node::human(
            "alice",
            HumanAttributes {
                age: 34,
                gender: Gender::Female,
                culture: Culture::Collective,
                self_efficacy: 0.8,
                computer_self_efficacy: 0.9,
                trust: 0.6,
                reputation: 12,
                ..Default::default()
            },
        ))
        .unwrap();
    network
        .add_agent(Node::human(
            "bob",
            HumanAttributes {
                age: 51,
                gender: Gender::Male,
                culture: Culture::Individualistic,
                ..Default::default()
            },
        ))
        .unwrap();
    network
        .add_agent(Node::machine(
            "ticketing",
            MachineAttributes {
                availability: 0.999,
                reliability: 0.95,
                ..Default::default()
            },
        ))
        .unwrap();
    network
        .add_artefact(Node::artefact(
            "report",
            ArtefactAttributes::created_by("ticketing", Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        ))
        .unwrap();

    network
        .create_outbound_edge(
            &"alice".into(),
            "alice-bob",
            &"bob".into(),
            Some(connection_set("collab", 0.8, 0.7)),
            true,
        )
        .unwrap();
    if let Some(edge) = network.edge_mut(&"alice-bob".into()) {
        edge.apply(connection_set("friendship", 0.9, 0.9));
        edge.add_relation_stats("collab", EdgeStats::new(3, 14));
        edge.add_relation_stats("friendship", EdgeStats::new(5, 2));
        edge.set_stats(EdgeStats::new(4, 16));
        if let Some(con) = edge.source_connection_mut("collab") {
            con.set_property("reciprocity", 0.25);
        }
    }

    network
        .create_outbound_edge(
            &"alice".into(),
            "alice-ticketing",
            &"ticketing".into(),
            Some(connection_set("support", 0.5, 0.95)),
            true,
        )
        .unwrap();

    network
        .create_inbound_edge(
            &"report".into(),
            "ticketing-report",
            &"ticketing".into(),
            Some(connection_set("authorship", 1.0, 1.0)),
            true,
        )
        .unwrap();

    network
}
