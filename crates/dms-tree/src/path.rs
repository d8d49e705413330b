//! Id paths for addressing folders inside a tree
//!
//! Provides [`NodePath`], the root-relative sequence of folder ids that the
//! mutation engine and the navigator resolve level by level.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path of folder ids from the root of a tree
///
/// Paths hold ids, never node references, so they stay meaningful across
/// snapshot rebuilds. Resolution happens against a concrete [`Forest`](crate::Forest).
///
/// # Examples
/// - `[]` → the root sequence
/// - `["proj-a-1"]` → children of folder `proj-a-1`
/// - `["mkt-1", "mkt-1-3"]` → `mkt-1/mkt-1-3`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<NodeId>);

impl NodePath {
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<NodeId>) -> Self {
        Self(segments)
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    #[must_use]
    pub fn single(id: impl Into<NodeId>) -> Self {
        Self(vec![id.into()])
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[NodeId] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&NodeId> {
        self.0.last()
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, id: impl Into<NodeId>) -> Self {
        let mut new = self.clone();
        new.0.push(id.into());
        new
    }

    /// Keep at most `len` leading segments
    #[inline]
    #[must_use]
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0.iter().take(len).cloned().collect())
    }

    /// Check if this path is a prefix of another
    ///
    /// # Examples
    /// - `a/b` is prefix of `a/b/c`
    /// - `a/b` is NOT prefix of `a/x`
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.0.iter()
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        let joined: Vec<&str> = self.0.iter().map(NodeId::as_str).collect();
        f.write_str(&joined.join("/"))
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    /// Parse `a/b/c`; empty input and `/` are the root
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "/" {
            return Ok(Self::root());
        }

        let segments = s
            .split('/')
            .map(|seg| {
                if seg.trim().is_empty() {
                    Err(PathError::EmptySegment)
                } else {
                    Ok(NodeId::from(seg))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<NodeId>> for NodePath {
    fn from(segments: Vec<NodeId>) -> Self {
        Self(segments)
    }
}

impl FromIterator<NodeId> for NodePath {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors related to id paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,
}
