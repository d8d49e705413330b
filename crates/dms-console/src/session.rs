//! Module session
//!
//! One [`ModuleSession`] exists per activated module or sub-folder view. It
//! owns the navigation state for that view and turns user actions into
//! mutations against the store. The store itself is passed in on every
//! call: the session never keeps a snapshot across a write.
//!
//! Before any read or write the session compares the store revision with
//! the one it last saw and reconciles its path if they differ, so edits
//! made through another session of the same tree are picked up.

use crate::error::{ConsoleError, NavigationError};
use crate::navigator::{Activation, Navigator};
use crate::publish::{request_publish, PublishSink, Submission};
use crate::reconciler::Reconciliation;
use dms_store::{Location, Revision, Role, TreeStore};
use dms_tree::{
    Clock, DocumentNode, FileFormat, Forest, Mutation, NodeId, UnknownExtensionPolicy,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Acting console user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name used in modification stamps
    pub name: String,
    /// Decides which modules are visible and who may edit the structure
    pub role: Role,
}

impl User {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Navigation and editing within one view
pub struct ModuleSession {
    location: Location,
    navigator: Navigator,
    seen: Option<Revision>,
    user: User,
    clock: Arc<dyn Clock>,
    policy: UnknownExtensionPolicy,
}

impl ModuleSession {
    /// Session at the root of `location`'s tree
    #[must_use]
    pub fn new(
        location: Location,
        user: User,
        clock: Arc<dyn Clock>,
        policy: UnknownExtensionPolicy,
    ) -> Self {
        Self {
            location,
            navigator: Navigator::new(),
            seen: None,
            user,
            clock,
            policy,
        }
    }

    #[inline]
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Store key of the tree this session edits
    #[inline]
    #[must_use]
    pub fn tree_key(&self) -> &str {
        self.location.tree_key()
    }

    #[inline]
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[inline]
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Reconcile the path if the store moved past the last seen revision
    pub fn sync(&mut self, store: &TreeStore) -> Reconciliation {
        let key = self.location.tree_key();
        let revision = store.revision(key);
        if revision.is_some() && revision == self.seen {
            return Reconciliation::Unchanged;
        }
        let outcome = self.navigator.reconcile(&store.get(key));
        self.seen = revision;
        outcome
    }

    /// Entries of the working directory
    pub fn contents(&mut self, store: &TreeStore) -> Forest {
        self.sync(store);
        self.navigator.current_contents(&store.get(self.tree_key()))
    }

    /// Module name, sub-folder name if any, then folder names
    ///
    /// Reconciles first, so folders deleted or renamed elsewhere never show.
    pub fn breadcrumbs(&mut self, store: &TreeStore) -> Vec<String> {
        self.sync(store);
        let mut trail = self.location.title();
        trail.extend(self.navigator.breadcrumb_trail().map(str::to_string));
        trail
    }

    /// Activate an entry of the working directory
    ///
    /// # Errors
    /// Returns a silent error if `id` is not in the working directory
    pub fn activate(&mut self, store: &TreeStore, id: &NodeId) -> Result<Activation, ConsoleError> {
        self.sync(store);
        let forest = store.get(self.tree_key());
        Ok(self.navigator.activate(&forest, id)?)
    }

    /// Return to the folder at breadcrumb `index` (0 is the tree root)
    ///
    /// # Errors
    /// Returns error if `index` is deeper than the current path
    pub fn jump_to_breadcrumb(&mut self, index: usize) -> Result<(), ConsoleError> {
        Ok(self.navigator.jump_to_breadcrumb(index)?)
    }

    /// Create an empty folder in the working directory
    ///
    /// # Errors
    /// Returns error on a blank name, or a silent error if the working
    /// directory no longer exists
    pub fn create_folder(&mut self, store: &mut TreeStore, name: &str) -> Result<NodeId, ConsoleError> {
        let name = required(name, "folder name")?;
        let node = DocumentNode::folder(NodeId::generate(), name, self.stamp());
        self.add(store, node)
    }

    /// Add a link in the working directory
    ///
    /// # Errors
    /// Returns error on a blank name or target, or a silent error if the
    /// working directory no longer exists
    pub fn add_link(
        &mut self,
        store: &mut TreeStore,
        name: &str,
        target: &str,
    ) -> Result<NodeId, ConsoleError> {
        let name = required(name, "link name")?;
        let target = required(target, "link target")?;
        let node = DocumentNode::link(NodeId::generate(), name, target, self.stamp());
        self.add(store, node)
    }

    /// Register an uploaded file; its kind comes from the extension
    ///
    /// # Errors
    /// Returns error on a blank name, or a silent error if the working
    /// directory no longer exists
    pub fn upload_file(
        &mut self,
        store: &mut TreeStore,
        name: &str,
        size: Option<String>,
    ) -> Result<NodeId, ConsoleError> {
        let name = required(name, "file name")?;
        let format = FileFormat::from_file_name(name, self.policy);
        let node = DocumentNode::file(NodeId::generate(), name, format, size, self.stamp());
        self.add(store, node)
    }

    /// Rename an entry of the working directory
    ///
    /// # Errors
    /// Returns error on a blank name, or a silent error if the entry or the
    /// working directory no longer exists
    pub fn rename(&mut self, store: &mut TreeStore, id: &NodeId, name: &str) -> Result<(), ConsoleError> {
        let name = required(name, "name")?;
        let parent = self.synced_path(store);
        self.commit(
            store,
            Mutation::Rename {
                parent,
                id: id.clone(),
                name: name.to_string(),
            },
        )
        .map(drop)
    }

    /// Delete an entry of the working directory with its subtree
    ///
    /// Confirmation is the caller's job; this deletes unconditionally.
    ///
    /// # Errors
    /// Returns a silent error if the entry or the working directory no
    /// longer exists
    pub fn delete(&mut self, store: &mut TreeStore, id: &NodeId) -> Result<(), ConsoleError> {
        let parent = self.synced_path(store);
        self.commit(
            store,
            Mutation::Delete {
                parent,
                id: id.clone(),
            },
        )
        .map(drop)
    }

    /// Promote an entry of the working directory to a publication
    ///
    /// # Errors
    /// Returns error for folders and links, or a silent error if the entry
    /// is not in the working directory
    pub fn request_publish(
        &mut self,
        store: &TreeStore,
        id: &NodeId,
        sink: &mut dyn PublishSink,
    ) -> Result<Submission, ConsoleError> {
        let node = self.entry(store, id)?;
        Ok(request_publish(&node, sink)?)
    }

    fn entry(&mut self, store: &TreeStore, id: &NodeId) -> Result<DocumentNode, ConsoleError> {
        self.contents(store)
            .iter()
            .find(|node| node.id() == id)
            .cloned()
            .ok_or_else(|| NavigationError::NotInView(id.clone()).into())
    }

    fn add(&mut self, store: &mut TreeStore, node: DocumentNode) -> Result<NodeId, ConsoleError> {
        let id = node.id().clone();
        let parent = self.synced_path(store);
        self.commit(store, Mutation::Add { parent, node })?;
        Ok(id)
    }

    fn synced_path(&mut self, store: &TreeStore) -> dms_tree::NodePath {
        self.sync(store);
        self.navigator.node_path()
    }

    fn stamp(&self) -> dms_tree::ModificationStamp {
        self.clock.stamp(&self.user.name)
    }

    fn commit(&mut self, store: &mut TreeStore, mutation: Mutation) -> Result<Revision, ConsoleError> {
        let key = self.location.tree_key().to_string();
        let current = store.get(&key);

        match mutation.apply(&current, &self.stamp()) {
            Ok(next) => {
                let revision = store.set(&key, next);
                tracing::info!(key = %key, %mutation, by = %self.user.name, "tree updated");
                self.sync(store);
                Ok(revision)
            }
            Err(error) => {
                tracing::debug!(key = %key, %mutation, %error, "mutation skipped");
                Err(error.into())
            }
        }
    }
}

impl fmt::Debug for ModuleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSession")
            .field("tree_key", &self.tree_key())
            .field("path", &self.navigator.node_path())
            .field("seen", &self.seen)
            .field("user", &self.user.name)
            .finish_non_exhaustive()
    }
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, ConsoleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::invalid(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}
