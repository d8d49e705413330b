//! Error types for DMS Store

use dms_tree::NodeId;
use std::path::PathBuf;

/// Tree store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No tree registered under this key
    #[error("no tree for key '{0}'")]
    UnknownKey(String),
}

/// Module catalog errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Module name is empty after trimming
    #[error("module name must not be empty")]
    EmptyName,

    /// Another module already uses this path
    #[error("module path '{0}' already in use")]
    DuplicatePath(String),

    /// No module with this id
    #[error("module not found: {0}")]
    UnknownModule(String),

    /// Role name not recognised
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}

/// Seed loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// File could not be read or written
    #[error("seed file {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Extension does not map to a known format
    #[error("unsupported seed format: {0}")]
    UnsupportedFormat(String),

    /// JSON error
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML decode error
    #[error("toml: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// TOML encode error
    #[error("toml: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Tree key is not an absolute view path
    #[error("tree key '{0}' must start with '/'")]
    InvalidKey(String),

    /// Two siblings share an id
    #[error("duplicate id {id} among siblings in tree '{key}'")]
    DuplicateId {
        /// Tree key
        key: String,
        /// Repeated id
        id: NodeId,
    },

    /// Module descriptors are inconsistent
    #[error("invalid module structure: {0}")]
    Catalog(#[from] CatalogError),
}
