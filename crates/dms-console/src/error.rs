//! Error types for the DMS console
//!
//! Errors fall in two groups the host treats differently:
//! - silent: the view went stale (a path or entry no longer resolves);
//!   nothing changed and nothing should be shown to the user
//! - surfaced: bad input, missing permissions, unknown views, I/O

use dms_store::{CatalogError, SeedError};
use dms_tree::{MutationError, NodeId, NodeKind};
use std::path::PathBuf;

/// Navigator errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Only folders can become part of the path
    #[error("cannot enter {kind} '{name}'")]
    NotAFolder {
        /// Node name
        name: String,
        /// Node kind
        kind: NodeKind,
    },

    /// Breadcrumb index beyond the current depth
    #[error("breadcrumb {index} out of range (depth {depth})")]
    BreadcrumbOutOfRange {
        /// Requested index
        index: usize,
        /// Current path length
        depth: usize,
    },

    /// Entry is not in the current folder
    #[error("no entry {0} in the current folder")]
    NotInView(NodeId),
}

/// Publication errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// Folders and links cannot be published
    #[error("{0} entries cannot be published")]
    NotPublishable(NodeKind),

    /// No publication with this id
    #[error("publication not found: {0}")]
    UnknownPublication(NodeId),
}

/// Main console error type
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Rejected before reaching the mutation engine
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// View does not belong to any module
    #[error("unknown view '{0}'")]
    UnknownView(String),

    /// Acting user lacks the role for this operation
    #[error("{user} may not {action}")]
    Forbidden {
        /// Acting user
        user: String,
        /// Attempted action
        action: String,
    },

    /// Mutation engine rejected the edit
    #[error("mutation failed: {0}")]
    Mutation(#[from] MutationError),

    /// Navigation failed
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigationError),

    /// Publication failed
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),

    /// Structure edit rejected
    #[error("structure error: {0}")]
    Catalog(#[from] CatalogError),

    /// Seed could not be read or written
    #[error("seed error: {0}")]
    Seed(#[from] SeedError),

    /// Configuration file problem
    #[error("config {path}: {message}")]
    Config {
        /// Config file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl ConsoleError {
    /// Stale-view failures the host should swallow
    ///
    /// The tree is unchanged in every such case.
    #[inline]
    #[must_use]
    pub fn is_silent(&self) -> bool {
        match self {
            Self::Mutation(e) => e.is_path_resolution(),
            Self::Navigation(NavigationError::NotInView(_)) => true,
            _ => false,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_path_is_silent() {
        let err = ConsoleError::from(MutationError::ChildNotFound(NodeId::from("x")));
        assert!(err.is_silent());

        let err = ConsoleError::from(NavigationError::NotInView(NodeId::from("x")));
        assert!(err.is_silent());
    }

    #[test]
    fn user_facing_errors_surface() {
        assert!(!ConsoleError::invalid("name must not be empty").is_silent());
        assert!(!ConsoleError::from(MutationError::DuplicateId(NodeId::from("x"))).is_silent());
        assert!(!ConsoleError::UnknownView("/nope".into()).is_silent());
    }
}
