//! Mutation engine
//!
//! Pure add/rename/delete over a [`Forest`] snapshot. The input is never
//! modified; the output shares every subtree that was not on the path from
//! the root to the edited folder, and every folder on that path is a new
//! node.
//!
//! Each operation comes in two forms. The free functions and
//! [`Mutation::apply`] report why they could not resolve the target.
//! [`Mutation::apply_or_keep`] degrades to the unchanged snapshot, which is
//! the behaviour interactive callers want when the tree was edited
//! elsewhere in the meantime.

use crate::id::NodeId;
use crate::node::{DocumentNode, Forest, ModificationStamp};
use crate::path::NodePath;
use crate::query::position;
use std::fmt::{self, Display, Formatter};

/// Structural edit targeting the folder at `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert `node` at the front of the folder (newest first)
    Add { parent: NodePath, node: DocumentNode },

    /// Give the child `id` a new name and a fresh stamp
    Rename {
        parent: NodePath,
        id: NodeId,
        name: String,
    },

    /// Remove the child `id` together with its subtree
    Delete { parent: NodePath, id: NodeId },
}

impl Mutation {
    /// Folder the mutation targets
    #[inline]
    #[must_use]
    pub fn parent(&self) -> &NodePath {
        match self {
            Self::Add { parent, .. } | Self::Rename { parent, .. } | Self::Delete { parent, .. } => {
                parent
            }
        }
    }

    /// Apply to a snapshot
    ///
    /// `stamp` is written on renamed nodes; added nodes carry their own.
    ///
    /// # Errors
    /// Returns error if `parent` or the child id cannot be resolved, or if an
    /// added node's id is already taken by a sibling
    pub fn apply(&self, forest: &Forest, stamp: &ModificationStamp) -> Result<Forest, MutationError> {
        match self {
            Self::Add { parent, node } => add(forest, parent, node.clone()),
            Self::Rename { parent, id, name } => rename(forest, parent, id, name, stamp),
            Self::Delete { parent, id } => delete(forest, parent, id),
        }
    }

    /// Apply, or hand back the input snapshot if the target does not resolve
    #[must_use]
    pub fn apply_or_keep(&self, forest: &Forest, stamp: &ModificationStamp) -> Forest {
        match self.apply(forest, stamp) {
            Ok(next) => next,
            Err(error) => {
                tracing::debug!(mutation = %self, %error, "mutation skipped");
                forest.clone()
            }
        }
    }
}

impl Display for Mutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { parent, node } => write!(f, "add {} '{}' at {parent}", node.id(), node.name()),
            Self::Rename { parent, id, name } => write!(f, "rename {id} to '{name}' at {parent}"),
            Self::Delete { parent, id } => write!(f, "delete {id} at {parent}"),
        }
    }
}

/// Insert `node` at the front of the folder at `parent`
///
/// # Errors
/// Returns error if `parent` does not resolve or a sibling already has the id
pub fn add(forest: &Forest, parent: &NodePath, node: DocumentNode) -> Result<Forest, MutationError> {
    rebuild(forest, parent.segments(), 0, |level| {
        if position(level, node.id()).is_some() {
            return Err(MutationError::DuplicateId(node.id().clone()));
        }
        let mut next = level.clone();
        next.push_front(node);
        Ok(next)
    })
}

/// Rename the child `id` of the folder at `parent`
///
/// All other fields, children included, are carried over from the original.
///
/// # Errors
/// Returns error if `parent` or the child does not resolve
pub fn rename(
    forest: &Forest,
    parent: &NodePath,
    id: &NodeId,
    name: &str,
    stamp: &ModificationStamp,
) -> Result<Forest, MutationError> {
    rebuild(forest, parent.segments(), 0, |level| {
        let idx = position(level, id).ok_or_else(|| MutationError::ChildNotFound(id.clone()))?;
        let mut next = level.clone();
        let renamed = level[idx].renamed(name, stamp.clone());
        next.set(idx, renamed);
        Ok(next)
    })
}

/// Remove the child `id` of the folder at `parent`
///
/// # Errors
/// Returns error if `parent` or the child does not resolve
pub fn delete(forest: &Forest, parent: &NodePath, id: &NodeId) -> Result<Forest, MutationError> {
    rebuild(forest, parent.segments(), 0, |level| {
        let idx = position(level, id).ok_or_else(|| MutationError::ChildNotFound(id.clone()))?;
        let mut next = level.clone();
        next.remove(idx);
        Ok(next)
    })
}

// Walks `path` down from `level`, applies `edit` to the last level and
// rebuilds each folder on the way back up.
fn rebuild<F>(level: &Forest, path: &[NodeId], depth: usize, edit: F) -> Result<Forest, MutationError>
where
    F: FnOnce(&Forest) -> Result<Forest, MutationError>,
{
    let Some((head, rest)) = path.split_first() else {
        return edit(level);
    };

    let idx = position(level, head).ok_or_else(|| MutationError::SegmentNotFound {
        depth,
        id: head.clone(),
    })?;
    let folder = &level[idx];
    let children = folder.children().ok_or_else(|| MutationError::NotAFolder {
        depth,
        id: head.clone(),
    })?;

    let new_children = rebuild(children, rest, depth + 1, edit)?;
    let rebuilt = folder
        .with_children(new_children)
        .ok_or_else(|| MutationError::NotAFolder {
            depth,
            id: head.clone(),
        })?;

    let mut next = level.clone();
    next.set(idx, rebuilt);
    Ok(next)
}

/// Why a mutation could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// A path segment names no sibling at that depth
    #[error("path segment {id} not found at depth {depth}")]
    SegmentNotFound { depth: usize, id: NodeId },

    /// A path segment names a file or link
    #[error("path segment {id} at depth {depth} is not a folder")]
    NotAFolder { depth: usize, id: NodeId },

    /// The target folder has no child with this id
    #[error("no child {0} in target folder")]
    ChildNotFound(NodeId),

    /// The target folder already has a child with this id
    #[error("id {0} already used in target folder")]
    DuplicateId(NodeId),
}

impl MutationError {
    /// Failure to resolve the path or the child (as opposed to a conflict)
    #[inline]
    #[must_use]
    pub fn is_path_resolution(&self) -> bool {
        !matches!(self, Self::DuplicateId(_))
    }
}
