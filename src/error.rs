use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use serde_json::Error as JsonError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum HmnError {
    #[error("Agent action failed: {0}")]
    Action(String),
    #[error("Simulation clock has not been set")]
    ClockUnset,
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("Network is inconsistent:\n- {}", .0.join("\n- "))]
    Inconsistent(Vec<String>),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid {kind} value '{value}'")]
    InvalidValue { kind: String, value: String },
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl HmnError {
    pub fn invalid_value(kind: &str, value: &str) -> HmnError {
        HmnError::InvalidValue {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for HmnError {
    fn from(src: toml::de::Error) -> HmnError {
        HmnError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for HmnError {
    fn from(src: toml::ser::Error) -> HmnError {
        HmnError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for HmnError {
    fn from(src: JsonError) -> HmnError {
        HmnError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<chrono::ParseError> for HmnError {
    fn from(src: chrono::ParseError) -> HmnError {
        HmnError::Serialization(format!("Invalid date/time: {src}"))
    }
}

impl From<io::Error> for HmnError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => HmnError::NotFound(format!("{x}")),
            _ => HmnError::Io(format!("IOError: {}", x.kind())),
        }
    }
}
