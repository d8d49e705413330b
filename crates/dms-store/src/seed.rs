//! Seed documents
//!
//! A seed is the initial application state: the module catalog plus one
//! tree per store key. Seeds are read from JSON, YAML or TOML, chosen by
//! file extension. The demo seed ships inside the crate.

use crate::error::SeedError;
use crate::module::ModuleCatalog;
use dms_tree::query::walk;
use dms_tree::Forest;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Embedded demo seed (JSON)
pub const DEMO_SEED: &str = include_str!("../seeds/demo.json");

/// On-disk encoding of a seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFormat {
    Json,
    Yaml,
    Toml,
}

impl SeedFormat {
    /// Pick the format from a file extension
    ///
    /// # Errors
    /// Returns error for missing or unknown extensions
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(SeedError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Decode any serde value from text
///
/// # Errors
/// Returns the format's parse error
pub fn decode<T: DeserializeOwned>(text: &str, format: SeedFormat) -> Result<T, SeedError> {
    Ok(match format {
        SeedFormat::Json => serde_json::from_str(text)?,
        SeedFormat::Yaml => serde_yaml::from_str(text)?,
        SeedFormat::Toml => toml::from_str(text)?,
    })
}

/// Encode any serde value as text
///
/// # Errors
/// Returns the format's serialization error
pub fn encode<T: Serialize>(value: &T, format: SeedFormat) -> Result<String, SeedError> {
    Ok(match format {
        SeedFormat::Json => serde_json::to_string_pretty(value)?,
        SeedFormat::Yaml => serde_yaml::to_string(value)?,
        SeedFormat::Toml => toml::to_string_pretty(value)?,
    })
}

/// Read and decode a file, format chosen by extension
///
/// # Errors
/// Returns error on I/O failure, unknown extension or malformed content
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, SeedError> {
    let format = SeedFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&text, format)
}

/// Encode and write a file, format chosen by extension
///
/// # Errors
/// Returns error on I/O failure, unknown extension or encoding failure
pub fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), SeedError> {
    let format = SeedFormat::from_path(path)?;
    let text = encode(value, format)?;
    std::fs::write(path, text).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Module catalog plus initial trees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub modules: ModuleCatalog,
    #[serde(default)]
    pub trees: IndexMap<String, Forest>,
}

impl SeedDocument {
    /// The embedded demo seed
    ///
    /// # Errors
    /// Returns error if the embedded document fails to parse or validate
    pub fn demo() -> Result<Self, SeedError> {
        let seed: Self = decode(DEMO_SEED, SeedFormat::Json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Load and validate a seed file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let seed: Self = read_file(path)?;
        seed.validate()?;
        tracing::debug!(path = %path.display(), trees = seed.trees.len(), "seed loaded");
        Ok(seed)
    }

    /// Write the seed, format chosen by extension
    ///
    /// # Errors
    /// Returns error on I/O or encoding failure
    pub fn save(&self, path: &Path) -> Result<(), SeedError> {
        write_file(path, self)
    }

    /// Check structural rules the type system cannot
    ///
    /// Tree keys must be absolute and sibling ids unique. Trees not backed
    /// by any module are kept but logged.
    ///
    /// # Errors
    /// Returns the first violation found
    pub fn validate(&self) -> Result<(), SeedError> {
        self.modules.validate()?;

        let known: HashSet<&str> = self
            .modules
            .modules()
            .iter()
            .flat_map(|m| m.tree_keys())
            .collect();

        for (key, forest) in &self.trees {
            if !key.starts_with('/') {
                return Err(SeedError::InvalidKey(key.clone()));
            }
            if !known.contains(key.as_str()) {
                tracing::warn!(key, "seed tree has no module");
            }
            check_sibling_ids(key, forest)?;
        }
        Ok(())
    }
}

fn check_sibling_ids(key: &str, forest: &Forest) -> Result<(), SeedError> {
    let levels = std::iter::once(forest).chain(walk(forest).filter_map(|(_, node)| node.children()));
    for level in levels {
        let mut seen = HashSet::with_capacity(level.len());
        for node in level {
            if !seen.insert(node.id()) {
                return Err(SeedError::DuplicateId {
                    key: key.to_string(),
                    id: node.id().clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dms_tree::{DocumentNode, ModificationStamp};

    fn stamp() -> ModificationStamp {
        ModificationStamp::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), "Admin")
    }

    #[test]
    fn demo_seed_is_valid() {
        let seed = SeedDocument::demo().unwrap();
        assert!(seed.modules.resolve("/marketing").is_some());
        assert!(!seed.trees["/marketing"].is_empty());
        assert!(seed.trees.keys().all(|k| k.starts_with('/')));
    }

    #[test]
    fn format_by_extension() {
        assert_eq!(SeedFormat::from_path(Path::new("a.JSON")).unwrap(), SeedFormat::Json);
        assert_eq!(SeedFormat::from_path(Path::new("a.yml")).unwrap(), SeedFormat::Yaml);
        assert_eq!(SeedFormat::from_path(Path::new("a.toml")).unwrap(), SeedFormat::Toml);
        assert!(matches!(
            SeedFormat::from_path(Path::new("seed")),
            Err(SeedError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn relative_key_rejected() {
        let mut seed = SeedDocument::default();
        seed.trees.insert("marketing".into(), Forest::new());
        assert!(matches!(seed.validate(), Err(SeedError::InvalidKey(k)) if k == "marketing"));
    }

    #[test]
    fn nested_duplicate_rejected() {
        let inner: Forest = vec![
            DocumentNode::folder("x", "One", stamp()),
            DocumentNode::folder("x", "Two", stamp()),
        ]
        .into();
        let mut seed = SeedDocument::default();
        seed.trees.insert(
            "/ops".into(),
            Forest::unit(DocumentNode::folder_with("root", "Root", stamp(), inner)),
        );
        assert!(matches!(
            seed.validate(),
            Err(SeedError::DuplicateId { id, .. }) if id.as_str() == "x"
        ));
    }

    #[test]
    fn same_id_in_different_folders_is_fine() {
        let a = DocumentNode::folder_with("a", "A", stamp(), Forest::unit(DocumentNode::folder("x", "X", stamp())));
        let b = DocumentNode::folder_with("b", "B", stamp(), Forest::unit(DocumentNode::folder("x", "X", stamp())));
        let mut seed = SeedDocument::default();
        seed.trees.insert("/ops".into(), vec![a, b].into());
        assert!(seed.validate().is_ok());
    }
}
