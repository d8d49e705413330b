//! Department modules
//!
//! A module is a top-level department section. It owns one document tree
//! under its own `path`, plus one independent tree per fixed sub-folder.
//! [`ModuleCatalog`] keeps the ordered module list, resolves an active view
//! to the tree key backing it and keeps the [`TreeStore`] in step with
//! structure edits.

use crate::error::CatalogError;
use crate::store::TreeStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access role of a console user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access including structure management
    AdminMaster,
    /// Department manager
    SubManager,
    /// Regular user
    #[default]
    Collaborator,
}

impl Role {
    /// Admin-only modules and structure edits require this
    #[inline]
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::AdminMaster)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AdminMaster => "Admin Master",
            Self::SubManager => "Sub Manager",
            Self::Collaborator => "Collaborator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    /// Accepts `admin_master`, `admin-master` or `Admin Master` in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match normalized.as_str() {
            "admin_master" | "admin" => Ok(Self::AdminMaster),
            "sub_manager" | "manager" => Ok(Self::SubManager),
            "collaborator" => Ok(Self::Collaborator),
            _ => Err(CatalogError::UnknownRole(s.to_string())),
        }
    }
}

/// Slug used for module ids and paths
///
/// Lowercases, collapses each whitespace run into `-` and spells `&` as `e`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c == '&' {
            out.push('e');
        } else {
            out.push(c);
        }
    }
    out
}

/// Fixed second-level navigation target with its own tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubFolder {
    /// Stable identifier, unique within its module
    pub id: String,
    /// Label shown in the sidebar and breadcrumbs
    pub name: String,
    /// Tree store key
    pub path: String,
}

/// Department identity and navigation targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Stable identifier, unique within the catalog
    pub id: String,
    /// Department name, first breadcrumb of every view
    pub name: String,
    /// Icon key understood by the host renderer
    pub icon: String,
    /// Hidden from everyone but administrators
    #[serde(default)]
    pub admin_only: bool,
    /// Tree store key, also the view prefix for sub-folders
    pub path: String,
    /// Ordered as shown in the sidebar
    #[serde(default)]
    pub sub_folders: Vec<SubFolder>,
}

impl ModuleDescriptor {
    /// New module whose id and path derive from its name
    ///
    /// # Errors
    /// Returns error if `name` is blank
    pub fn from_name(
        name: &str,
        icon: impl Into<String>,
        admin_only: bool,
    ) -> Result<Self, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        let slug = slugify(name);
        Ok(Self {
            path: format!("/{slug}"),
            id: slug,
            name: name.to_string(),
            icon: icon.into(),
            admin_only,
            sub_folders: Vec::new(),
        })
    }

    /// Append a sub-folder at `<module path>/<segment>`
    #[must_use]
    pub fn with_sub_folder(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        segment: &str,
    ) -> Self {
        self.sub_folders.push(SubFolder {
            id: id.into(),
            name: name.into(),
            path: format!("{}/{segment}", self.path),
        });
        self
    }

    /// Every tree key this module backs: its own path, then sub-folders
    pub fn tree_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.path.as_str()).chain(self.sub_folders.iter().map(|s| s.path.as_str()))
    }

    /// Whether `view` is this module's path or lies beneath it
    #[must_use]
    pub fn covers(&self, view: &str) -> bool {
        view.strip_prefix(self.path.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    #[inline]
    #[must_use]
    pub fn visible_to(&self, role: Role) -> bool {
        !self.admin_only || role.is_admin()
    }
}

/// Resolved active view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Module owning the view
    pub module: ModuleDescriptor,
    /// Set when the view is one of the module's sub-folders
    pub sub_folder: Option<SubFolder>,
}

impl Location {
    /// Tree store key backing this view
    #[must_use]
    pub fn tree_key(&self) -> &str {
        self.sub_folder
            .as_ref()
            .map_or(self.module.path.as_str(), |sub| sub.path.as_str())
    }

    /// Leading breadcrumb labels: module name, then sub-folder name
    #[must_use]
    pub fn title(&self) -> Vec<String> {
        std::iter::once(self.module.name.clone())
            .chain(self.sub_folder.iter().map(|sub| sub.name.clone()))
            .collect()
    }
}

/// Keys touched by a structure sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureDiff {
    /// Keys that received a fresh empty tree
    pub created: Vec<String>,
    /// Keys whose tree was discarded
    pub dropped: Vec<String>,
}

impl StructureDiff {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.dropped.is_empty()
    }
}

/// Ordered department list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleCatalog {
    modules: Vec<ModuleDescriptor>,
}

impl ModuleCatalog {
    #[inline]
    #[must_use]
    pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
        Self { modules }
    }

    #[inline]
    #[must_use]
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Resolve an active view to its module and sub-folder
    ///
    /// The first module whose path covers `view` wins; the sub-folder must
    /// match `view` exactly.
    #[must_use]
    pub fn resolve(&self, view: &str) -> Option<Location> {
        let module = self.modules.iter().find(|m| m.covers(view))?;
        let sub_folder = module.sub_folders.iter().find(|s| s.path == view).cloned();
        Some(Location {
            module: module.clone(),
            sub_folder,
        })
    }

    /// Modules shown in the sidebar for `role`
    pub fn visible_for(&self, role: Role) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter().filter(move |m| m.visible_to(role))
    }

    /// Replace the module with the same id, or append a new one
    ///
    /// # Errors
    /// Returns error on a blank name or when another module owns the path
    pub fn upsert(&mut self, module: ModuleDescriptor) -> Result<(), CatalogError> {
        if module.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self
            .modules
            .iter()
            .any(|m| m.id != module.id && m.path == module.path)
        {
            return Err(CatalogError::DuplicatePath(module.path));
        }
        match self.modules.iter_mut().find(|m| m.id == module.id) {
            Some(slot) => *slot = module,
            None => self.modules.push(module),
        }
        Ok(())
    }

    /// Remove a module by id
    ///
    /// # Errors
    /// Returns error if no module has this id
    pub fn remove(&mut self, id: &str) -> Result<ModuleDescriptor, CatalogError> {
        let index = self
            .modules
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CatalogError::UnknownModule(id.to_string()))?;
        Ok(self.modules.remove(index))
    }

    /// Check that paths are unique across the catalog
    ///
    /// # Errors
    /// Returns error on a blank name or a repeated path
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            for key in module.tree_keys() {
                if !seen.insert(key) {
                    return Err(CatalogError::DuplicatePath(key.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Bring the store in line with a structure edit
    ///
    /// Every key of `new` gets an empty tree unless one exists. Modules of
    /// `old` whose id vanished from `new` lose all their trees.
    pub fn sync_store(old: &Self, new: &Self, store: &mut TreeStore) -> StructureDiff {
        let mut diff = StructureDiff::default();

        for module in &new.modules {
            for key in module.tree_keys() {
                if store.insert_empty(key) {
                    diff.created.push(key.to_string());
                }
            }
        }

        for module in old.modules.iter().filter(|m| new.get(&m.id).is_none()) {
            for key in module.tree_keys() {
                if store.remove(key).is_some() {
                    diff.dropped.push(key.to_string());
                }
            }
        }

        if !diff.is_empty() {
            tracing::info!(
                created = diff.created.len(),
                dropped = diff.dropped.len(),
                "module structure synced"
            );
        }
        diff
    }
}

impl FromIterator<ModuleDescriptor> for ModuleCatalog {
    fn from_iter<I: IntoIterator<Item = ModuleDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
