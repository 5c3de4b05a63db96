use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

use crate::{error::HmnError, network::Network, snapshot::SnapshotFormat};

/// Settings for a fresh network and for the driver that advances it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Initial value of the simulated clock. Unset leaves the clock unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Seconds the clock moves per simulated tick.
    pub tick_seconds: i64,
    pub snapshot_format: SnapshotFormat,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            name: None,
            start_time: None,
            tick_seconds: 1,
            snapshot_format: SnapshotFormat::default(),
        }
    }
}

impl NetworkConfig {
    pub fn build(&self) -> Network {
        Network::from_config(self)
    }
}

pub trait NetworkConfigProvider: Send + Sync {
    fn get_config(&self) -> Result<NetworkConfig, HmnError>;
    fn set_config(&self, config: &NetworkConfig) -> Result<(), HmnError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        TomlConfigProvider { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NetworkConfigProvider for TomlConfigProvider {
    fn get_config(&self) -> Result<NetworkConfig, HmnError> {
        tracing::debug!("Attempting to read network config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, returning the default config.");
            return Ok(NetworkConfig::default());
        }
        let content = read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn set_config(&self, config: &NetworkConfig) -> Result<(), HmnError> {
        tracing::debug!("Attempting to write network config to: {:?}", &self.path);
        let toml_string = toml::to_string(config)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}
