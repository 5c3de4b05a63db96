//! Snapshot and restore of a whole [Network].
//!
//! A snapshot is the serialized form of every agent, artefact and edge together with the clock
//! and name. Restoring a snapshot yields a network equal to the one that was saved, including
//! any bookkeeping divergence it carried.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    fs::{read_to_string, write},
    path::Path,
    str::FromStr,
};

use crate::{
    categories::{categorical_impls, Categorical},
    error::HmnError,
    network::Network,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Json,
    Toml,
}

impl Categorical for SnapshotFormat {
    const KIND: &'static str = "snapshot format";

    fn variants() -> &'static [Self] {
        &[SnapshotFormat::Json, SnapshotFormat::Toml]
    }

    fn name(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Toml => "toml",
        }
    }
}

categorical_impls!(SnapshotFormat);

impl SnapshotFormat {
    /// Pick the format from a file extension (`.json` or `.toml`, any case).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SnapshotFormat, HmnError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                HmnError::InvalidArgument(format!(
                    "Cannot infer a snapshot format for {path:?}, expected a .json or .toml file"
                ))
            })?;
        ext.parse()
    }

    pub fn extension(&self) -> &'static str {
        self.name()
    }
}

impl Network {
    /// JSON has no encoding for NaN or infinity, so a network holding such a value only
    /// snapshots as TOML.
    pub fn to_snapshot(&self, format: SnapshotFormat) -> Result<String, HmnError> {
        Ok(match format {
            SnapshotFormat::Json => {
                let value = serde_json::to_value(self)?;
                let mut non_finite = Vec::new();
                collect_nulls(&value, String::new(), &mut non_finite);
                if !non_finite.is_empty() {
                    return Err(HmnError::Serialization(format!(
                        "JSON cannot represent the non-finite numbers at {}",
                        non_finite.join(", ")
                    )));
                }
                serde_json::to_string_pretty(self)?
            }
            SnapshotFormat::Toml => toml::to_string(self)?,
        })
    }

    pub fn from_snapshot(content: &str, format: SnapshotFormat) -> Result<Network, HmnError> {
        Ok(match format {
            SnapshotFormat::Json => serde_json::from_str(content)?,
            SnapshotFormat::Toml => toml::from_str(content)?,
        })
    }

    /// Write a snapshot to `path`, with the format taken from its extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), HmnError> {
        let path = path.as_ref();
        let format = SnapshotFormat::from_path(path)?;
        tracing::debug!("Writing {format} snapshot of {} to {path:?}", self);
        write(path, self.to_snapshot(format)?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network, HmnError> {
        let path = path.as_ref();
        let format = SnapshotFormat::from_path(path)?;
        tracing::debug!("Reading {format} snapshot from {path:?}");
        let content = read_to_string(path)?;
        let network = Network::from_snapshot(&content, format)?;
        let errors = network.consistency_report();
        if !errors.is_empty() {
            tracing::warn!(
                "Loaded {network} has {} bookkeeping inconsistencies",
                errors.len()
            );
        }
        Ok(network)
    }
}

/// Every optional field of a [Network] is skipped when unset, so a `null` in its JSON form can
/// only come from a non-finite float.
fn collect_nulls(value: &serde_json::Value, pointer: String, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Null => out.push(pointer),
        serde_json::Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect_nulls(item, format!("{pointer}/{idx}"), out);
            }
        }
        serde_json::Value::Object(fields) => {
            for (key, item) in fields.iter() {
                collect_nulls(item, format!("{pointer}/{key}"), out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actor::HumanAttributes,
        categories::Role,
        edge::Edge,
        network::Node,
        properties::Connection,
    };
    use test_log::test;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SnapshotFormat::from_path("net.json"),
            Ok(SnapshotFormat::Json)
        );
        assert_eq!(
            SnapshotFormat::from_path("/tmp/net.TOML"),
            Ok(SnapshotFormat::Toml)
        );
        assert!(matches!(
            SnapshotFormat::from_path("net.yaml"),
            Err(HmnError::InvalidValue { .. })
        ));
        assert!(matches!(
            SnapshotFormat::from_path("net"),
            Err(HmnError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_network_snapshot() {
        let network = Network::named("empty");
        for format in SnapshotFormat::variants() {
            let text = network.to_snapshot(*format).unwrap();
            let restored = Network::from_snapshot(&text, *format).unwrap();
            assert_eq!(restored, network, "{format}");
        }
    }

    fn network_with_trust(trust: f64, property: f64) -> Network {
        let mut network = Network::new();
        network
            .add_agent(Node::human("a", HumanAttributes::default()))
            .unwrap();
        network
            .add_agent(Node::human("b", HumanAttributes::default()))
            .unwrap();
        let mut source = Connection::with_trust("a-b", Role::Source, trust, 1.0 - trust);
        source.set_property("reciprocity", property);
        network
            .attach_edge(Edge::with_id("e1", "a", "b").with_connection_set(
                "collab",
                source,
                Connection::with_role("b-a", Role::Sink),
            ))
            .unwrap();
        network
    }

    #[test]
    fn test_json_preserves_full_float_precision() {
        for trust in [
            0.47960756426982587,
            0.19813640638684982,
            0.9519560284026387,
            0.9259338926496359,
            f64::MIN_POSITIVE,
            1e300,
        ] {
            let network = network_with_trust(trust, trust / 3.0);
            let text = network.to_snapshot(SnapshotFormat::Json).unwrap();
            let restored = Network::from_snapshot(&text, SnapshotFormat::Json).unwrap();
            assert_eq!(restored, network, "{trust}");
            let connection = restored.edges()[0].source_connection("collab").unwrap();
            assert_eq!(connection.trust().to_bits(), trust.to_bits());
        }
    }

    #[test]
    fn test_json_rejects_non_finite_numbers() {
        for (trust, property) in [(f64::NAN, 0.5), (0.5, f64::INFINITY), (f64::NEG_INFINITY, 0.0)] {
            let network = network_with_trust(trust, property);
            let err = network.to_snapshot(SnapshotFormat::Json).unwrap_err();
            assert!(
                matches!(&err, HmnError::Serialization(msg) if msg.contains("/edges/0/source_connections/collab/")),
                "{err:?}"
            );
        }
    }

    #[test]
    fn test_toml_keeps_non_finite_numbers() {
        let network = network_with_trust(f64::INFINITY, f64::NEG_INFINITY);
        let text = network.to_snapshot(SnapshotFormat::Toml).unwrap();
        let restored = Network::from_snapshot(&text, SnapshotFormat::Toml).unwrap();
        assert_eq!(restored, network);

        let nan = network_with_trust(f64::NAN, 0.0);
        let text = nan.to_snapshot(SnapshotFormat::Toml).unwrap();
        let restored = Network::from_snapshot(&text, SnapshotFormat::Toml).unwrap();
        let connection = restored.edges()[0].source_connection("collab").unwrap();
        assert!(connection.trust().is_nan());
    }

    #[test]
    fn test_save_refuses_unrestorable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nan.json");
        assert!(network_with_trust(f64::NAN, 0.0).save(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_malformed_snapshot() {
        assert!(matches!(
            Network::from_snapshot("{not json", SnapshotFormat::Json),
            Err(HmnError::Serialization(_))
        ));
        assert!(matches!(
            Network::from_snapshot("agents = 3", SnapshotFormat::Toml),
            Err(HmnError::Serialization(_))
        ));
    }
}
