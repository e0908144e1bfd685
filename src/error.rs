//! Error types
//!
//! Configuration errors (unknown window or field type) are fatal to the one
//! construction call that hit them. Validation errors never show up here:
//! forms report them inline instead.

use thiserror::Error;

use crate::dom::NodeId;
use crate::window::ColumnSide;

/// Failure to construct a window
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unknown window type: {0}")]
    UnknownWindowType(String),

    #[error("column `{0}` is not mounted")]
    MissingColumn(ColumnSide),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Failure to build a form field
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("invalid configuration for field `{field}`: {source}")]
    InvalidConfig {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Rejected registry registration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("type name must not be empty")]
    EmptyName,
}

/// Tree mutation that referenced a node in the wrong place
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0} no longer exists")]
    Missing(NodeId),

    #[error("reference node {reference} is not a child of {parent}")]
    NotAChild { parent: NodeId, reference: NodeId },

    #[error("cannot insert node {0} into its own subtree")]
    Cycle(NodeId),
}

/// Durable key-value store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Toolkit configuration failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("failed to access config at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
