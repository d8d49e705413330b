//! Console configuration
//!
//! Loaded from a TOML file; every field has a default so an empty file
//! (or no file) is a valid configuration.
//!
//! ```toml
//! user_name = "Ana Pereira"
//! role = "collaborator"
//! unknown_extension = "image_bucket"
//! public_base_url = "https://docs.example.com/public"
//! seed_path = "seeds/company.yaml"
//! log_filter = "dms=debug"
//! json_logs = false
//! ```

use crate::error::ConsoleError;
use dms_store::Role;
use dms_tree::UnknownExtensionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Console settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Display name written into modification stamps
    pub user_name: String,
    /// Role of the acting user
    pub role: Role,
    /// Classification of unrecognised file extensions
    pub unknown_extension: UnknownExtensionPolicy,
    /// Prefix of issued public links
    pub public_base_url: String,
    /// Seed to start from; the embedded demo seed when absent
    pub seed_path: Option<PathBuf>,
    /// Default `tracing` filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl ConsoleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a TOML config file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConsoleError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConsoleError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// With acting user
    #[inline]
    #[must_use]
    pub fn with_user(mut self, name: impl Into<String>, role: Role) -> Self {
        self.user_name = name.into();
        self.role = role;
        self
    }

    /// With unknown-extension policy
    #[inline]
    #[must_use]
    pub fn with_unknown_extension(mut self, policy: UnknownExtensionPolicy) -> Self {
        self.unknown_extension = policy;
        self
    }

    /// With public link prefix
    #[inline]
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }

    /// With seed file
    #[inline]
    #[must_use]
    pub fn with_seed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(path.into());
        self
    }

    /// With default log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            user_name: "Admin Master".to_string(),
            role: Role::AdminMaster,
            unknown_extension: UnknownExtensionPolicy::Unknown,
            public_base_url: "https://docs.example.com/public".to_string(),
            seed_path: None,
            log_filter: "dms=info,dms_console=info,dms_store=warn".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user_name = \"Ana Pereira\"\nrole = \"collaborator\"").unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.user_name, "Ana Pereira");
        assert_eq!(config.role, Role::Collaborator);
        assert_eq!(config.public_base_url, ConsoleConfig::default().public_base_url);
        assert_eq!(config.unknown_extension, UnknownExtensionPolicy::Unknown);
    }

    #[test]
    fn legacy_image_bucket() {
        let config: ConsoleConfig = toml::from_str("unknown_extension = \"image_bucket\"").unwrap();
        assert_eq!(config.unknown_extension, UnknownExtensionPolicy::ImageBucket);
    }

    #[test]
    fn malformed_file_names_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "role = 42").unwrap();
        let err = ConsoleConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConsoleError::Config { ref path, .. } if path == file.path()));
    }

    #[test]
    fn builders() {
        let config = ConsoleConfig::new()
            .with_user("Carlos Silva", Role::SubManager)
            .with_seed_path("seed.json")
            .with_log_filter("debug");
        assert_eq!(config.role, Role::SubManager);
        assert_eq!(config.seed_path, Some(PathBuf::from("seed.json")));
        assert_eq!(config.log_filter, "debug");
    }
}
