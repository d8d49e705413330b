//! Path navigator
//!
//! Tracks the working directory inside one module tree. The path is a
//! list of [`Crumb`]s (folder id plus the name last seen for it), never a
//! reference into a snapshot: every read walks the current tree by id.

use crate::error::NavigationError;
use dms_tree::query::children_at;
use dms_tree::{DocumentNode, Forest, NodeBody, NodeId, NodePath};
use serde::{Deserialize, Serialize};

/// One folder on the navigation path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    /// Folder identity, the part reconciliation trusts
    pub id: NodeId,
    /// Name when last seen, refreshed on reconcile
    pub name: String,
}

impl Crumb {
    #[must_use]
    pub fn of(node: &DocumentNode) -> Self {
        Self {
            id: node.id().clone(),
            name: node.name().to_string(),
        }
    }
}

/// What activating an entry asks the host to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Folder entered; the path grew by one
    Entered,
    /// Open this URL outside the console
    OpenExternal(String),
    /// Hand this file to a viewer
    OpenFile(NodeId),
}

/// Working directory within one tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    crumbs: Vec<Crumb>,
}

impl Navigator {
    /// Navigator at the tree root
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.crumbs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.crumbs.is_empty()
    }

    /// Id path of the working directory
    #[must_use]
    pub fn node_path(&self) -> NodePath {
        self.crumbs.iter().map(|crumb| crumb.id.clone()).collect()
    }

    /// Descend into the folder `id` of the working directory in `forest`
    ///
    /// # Errors
    /// Returns error if `id` is not in the working directory or is a file
    /// or link
    pub fn enter(&mut self, forest: &Forest, id: &NodeId) -> Result<(), NavigationError> {
        let node = self.entry(forest, id)?;
        if !node.is_folder() {
            return Err(NavigationError::NotAFolder {
                name: node.name().to_string(),
                kind: node.kind(),
            });
        }
        self.crumbs.push(Crumb::of(&node));
        Ok(())
    }

    /// Enter folders, report links and files to the host
    ///
    /// # Errors
    /// Returns error if `id` is not in the working directory in `forest`
    pub fn activate(&mut self, forest: &Forest, id: &NodeId) -> Result<Activation, NavigationError> {
        let node = self.entry(forest, id)?;
        Ok(match node.body() {
            NodeBody::Folder { .. } => {
                self.crumbs.push(Crumb::of(&node));
                Activation::Entered
            }
            NodeBody::Link { target } => Activation::OpenExternal(target.clone()),
            NodeBody::File { .. } => Activation::OpenFile(node.id().clone()),
        })
    }

    /// Keep the first `index` folders; `0` returns to the root
    ///
    /// # Errors
    /// Returns error if `index` exceeds the current depth
    pub fn jump_to_breadcrumb(&mut self, index: usize) -> Result<(), NavigationError> {
        if index > self.crumbs.len() {
            return Err(NavigationError::BreadcrumbOutOfRange {
                index,
                depth: self.crumbs.len(),
            });
        }
        self.crumbs.truncate(index);
        Ok(())
    }

    /// Entries of the working directory in `forest`
    ///
    /// Empty when any folder on the path no longer resolves.
    #[must_use]
    pub fn current_contents(&self, forest: &Forest) -> Forest {
        children_at(forest, &self.node_path()).cloned().unwrap_or_default()
    }

    /// Folder names root first
    pub fn breadcrumb_trail(&self) -> impl Iterator<Item = &str> {
        self.crumbs.iter().map(|crumb| crumb.name.as_str())
    }

    pub(crate) fn replace(&mut self, crumbs: Vec<Crumb>) {
        self.crumbs = crumbs;
    }

    // Only children of the working directory can be entered or activated
    fn entry(&self, forest: &Forest, id: &NodeId) -> Result<DocumentNode, NavigationError> {
        children_at(forest, &self.node_path())
            .and_then(|level| level.iter().find(|node| node.id() == id))
            .cloned()
            .ok_or_else(|| NavigationError::NotInView(id.clone()))
    }
}
