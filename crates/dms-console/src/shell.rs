//! Application shell
//!
//! [`Console`] owns all host state: the tree store, the module catalog and
//! the publications ledger. Views are opened as [`ModuleSession`]s which
//! borrow the store per call, so any number of them can be open over the
//! same trees.

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::publish::{PublicationRecord, PublicationsLedger, Submission};
use crate::session::{ModuleSession, User};
use dms_store::seed::{decode, read_file, write_file, SeedFormat, DEMO_SEED};
use dms_store::{ModuleCatalog, ModuleDescriptor, SeedDocument, StructureDiff, TreeObserver, TreeStore};
use dms_tree::{Clock, NodeId, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Seed document extended with the publications list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSeed {
    #[serde(flatten)]
    pub document: SeedDocument,
    #[serde(default)]
    pub publications: Vec<PublicationRecord>,
}

impl ConsoleSeed {
    /// The embedded demo seed
    ///
    /// # Errors
    /// Returns error if the embedded seed fails to parse or validate
    pub fn demo() -> Result<Self, ConsoleError> {
        let seed: Self = decode(DEMO_SEED, SeedFormat::Json)?;
        seed.document.validate()?;
        Ok(seed)
    }

    /// Load and validate a seed file (JSON, YAML or TOML)
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let seed: Self = read_file(path)?;
        seed.document.validate()?;
        Ok(seed)
    }

    /// Write the seed, format chosen by extension
    ///
    /// # Errors
    /// Returns error on I/O or encoding failure
    pub fn save(&self, path: &Path) -> Result<(), ConsoleError> {
        Ok(write_file(path, self)?)
    }
}

/// Host application state
pub struct Console {
    config: ConsoleConfig,
    user: User,
    store: TreeStore,
    catalog: ModuleCatalog,
    publications: PublicationsLedger,
    clock: Arc<dyn Clock>,
}

impl Console {
    /// Build the console from a seed
    #[must_use]
    pub fn new(seed: ConsoleSeed, config: ConsoleConfig) -> Self {
        let store = TreeStore::from_seed(&seed.document);
        let publications =
            PublicationsLedger::with_records(config.public_base_url.clone(), seed.publications);
        Self {
            user: User::new(config.user_name.clone(), config.role),
            catalog: seed.document.modules,
            store,
            publications,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the date source used for stamps
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut TreeStore {
        &mut self.store
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    #[inline]
    #[must_use]
    pub fn publications(&self) -> &PublicationsLedger {
        &self.publications
    }

    #[inline]
    pub fn publications_mut(&mut self) -> &mut PublicationsLedger {
        &mut self.publications
    }

    /// Register a host hook for every tree replacement
    pub fn subscribe(&mut self, observer: Box<dyn TreeObserver>) {
        self.store.subscribe(observer);
    }

    /// Modules the acting user may open
    pub fn sidebar(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.catalog.visible_for(self.user.role)
    }

    /// Open the module or sub-folder view at `view`
    ///
    /// # Errors
    /// Returns error if no module covers `view` or the user may not see it
    pub fn open_view(&self, view: &str) -> Result<ModuleSession, ConsoleError> {
        let location = self
            .catalog
            .resolve(view)
            .ok_or_else(|| ConsoleError::UnknownView(view.to_string()))?;
        if !location.module.visible_to(self.user.role) {
            return Err(self.forbidden(format!("open {}", location.module.name)));
        }
        tracing::debug!(view, key = location.tree_key(), "view opened");
        Ok(ModuleSession::new(
            location,
            self.user.clone(),
            Arc::clone(&self.clock),
            self.config.unknown_extension,
        ))
    }

    /// Publish-request an entry of `session`'s working directory
    ///
    /// # Errors
    /// See [`ModuleSession::request_publish`]
    pub fn request_publish(
        &mut self,
        session: &mut ModuleSession,
        id: &NodeId,
    ) -> Result<Submission, ConsoleError> {
        session.request_publish(&self.store, id, &mut self.publications)
    }

    /// Replace the module structure and sync the store
    ///
    /// # Errors
    /// Returns error unless the user is an admin, or if `modules` is
    /// inconsistent
    pub fn update_structure(&mut self, modules: ModuleCatalog) -> Result<StructureDiff, ConsoleError> {
        if !self.user.role.is_admin() {
            return Err(self.forbidden("manage the module structure".to_string()));
        }
        modules.validate()?;
        let diff = ModuleCatalog::sync_store(&self.catalog, &modules, &mut self.store);
        self.catalog = modules;
        Ok(diff)
    }

    /// Snapshot of the whole state as a seed
    #[must_use]
    pub fn export(&self) -> ConsoleSeed {
        ConsoleSeed {
            document: SeedDocument {
                modules: self.catalog.clone(),
                trees: self.store.export(),
            },
            publications: self.publications.records().to_vec(),
        }
    }

    fn forbidden(&self, action: String) -> ConsoleError {
        ConsoleError::Forbidden {
            user: self.user.name.clone(),
            action,
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("user", &self.user)
            .field("store", &self.store)
            .field("modules", &self.catalog.modules().len())
            .field("publications", &self.publications.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dms_store::Role;
    use pretty_assertions::assert_eq;

    fn console(role: Role) -> Console {
        let config = ConsoleConfig::new().with_user("Tester", role);
        Console::new(ConsoleSeed::demo().unwrap(), config)
    }

    #[test]
    fn demo_seed_carries_publications() {
        let seed = ConsoleSeed::demo().unwrap();
        assert_eq!(seed.publications.len(), 2);
        assert!(seed.publications[1].is_published());
    }

    #[test]
    fn unknown_view() {
        let console = console(Role::AdminMaster);
        assert!(matches!(
            console.open_view("/dashboard"),
            Err(ConsoleError::UnknownView(_))
        ));
    }

    #[test]
    fn admin_only_modules() {
        assert!(matches!(
            console(Role::Collaborator).open_view("/finance"),
            Err(ConsoleError::Forbidden { .. })
        ));
        assert!(console(Role::AdminMaster).open_view("/finance").is_ok());
        assert!(console(Role::Collaborator).sidebar().all(|m| !m.admin_only));
    }

    #[test]
    fn structure_edits_need_admin() {
        let mut console = console(Role::SubManager);
        let modules = console.catalog().clone();
        assert!(matches!(
            console.update_structure(modules),
            Err(ConsoleError::Forbidden { .. })
        ));
    }

    #[test]
    fn untouched_console_exports_its_seed() {
        let console = console(Role::AdminMaster);
        assert_eq!(console.export(), ConsoleSeed::demo().unwrap());
    }
}
