//! Read-only traversal over tree snapshots
//!
//! All lookups go by [`NodeId`], level by level. Nothing here holds on to a
//! node past the borrow of the snapshot it came from.

use crate::id::NodeId;
use crate::node::{DocumentNode, Forest};
use crate::path::NodePath;

/// Index of the sibling with `id` in one level
#[inline]
#[must_use]
pub fn position(level: &Forest, id: &NodeId) -> Option<usize> {
    level.iter().position(|node| node.id() == id)
}

/// Children of the folder at `path`
///
/// Returns `None` when a segment is missing or names a non-folder.
#[must_use]
pub fn children_at<'a>(forest: &'a Forest, path: &NodePath) -> Option<&'a Forest> {
    let mut level = forest;
    for id in path.iter() {
        let node = level.iter().find(|node| node.id() == id)?;
        level = node.children()?;
    }
    Some(level)
}

/// Folder nodes along `path`, root first
///
/// Stops at the first segment that does not resolve to a folder, so the
/// result is the longest valid prefix.
#[must_use]
pub fn folders_along<'a>(forest: &'a Forest, path: &NodePath) -> Vec<&'a DocumentNode> {
    let mut level = forest;
    let mut folders = Vec::with_capacity(path.len());
    for id in path.iter() {
        let Some(node) = level.iter().find(|node| node.id() == id) else {
            break;
        };
        let Some(children) = node.children() else {
            break;
        };
        folders.push(node);
        level = children;
    }
    folders
}

/// First node with `id` anywhere in the tree (pre-order)
#[must_use]
pub fn find<'a>(forest: &'a Forest, id: &NodeId) -> Option<&'a DocumentNode> {
    walk(forest).map(|(_, node)| node).find(|node| node.id() == id)
}

/// Path of the folder containing the node with `id`
#[must_use]
pub fn locate(forest: &Forest, id: &NodeId) -> Option<NodePath> {
    fn search(level: &Forest, id: &NodeId, trail: &mut Vec<NodeId>) -> bool {
        for node in level {
            if node.id() == id {
                return true;
            }
            if let Some(children) = node.children() {
                trail.push(node.id().clone());
                if search(children, id, trail) {
                    return true;
                }
                trail.pop();
            }
        }
        false
    }

    let mut trail = Vec::new();
    search(forest, id, &mut trail).then(|| NodePath::new(trail))
}

/// Total number of nodes in the tree
#[must_use]
pub fn count(forest: &Forest) -> usize {
    walk(forest).count()
}

/// Pre-order traversal yielding `(depth, node)`
#[must_use]
pub fn walk(forest: &Forest) -> Walk<'_> {
    Walk {
        stack: vec![forest.iter()],
    }
}

/// Iterator returned by [`walk`]
pub struct Walk<'a> {
    stack: Vec<im::vector::Iter<'a, DocumentNode>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a DocumentNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    let depth = self.stack.len() - 1;
                    if let Some(children) = node.children() {
                        self.stack.push(children.iter());
                    }
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
