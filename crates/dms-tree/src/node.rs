//! Document nodes
//!
//! A [`DocumentNode`] is one entry of a department tree. Its [`NodeBody`]
//! enforces the structural rules in the type: a folder always owns a
//! (possibly empty) [`Forest`], a link always carries a target, and a file
//! never has children.

use crate::id::NodeId;
use crate::kind::{FileFormat, NodeKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered sequence of sibling nodes
///
/// Backed by a persistent vector: cloning is O(1) and edits share every
/// untouched chunk with the previous snapshot.
pub type Forest = im::Vector<DocumentNode>;

/// Last-write metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModificationStamp {
    /// Calendar date of the write
    #[serde(rename = "modified_at")]
    pub at: NaiveDate,
    /// Display name of the writer
    #[serde(rename = "modified_by")]
    pub by: String,
}

impl ModificationStamp {
    #[inline]
    #[must_use]
    pub fn new(at: NaiveDate, by: impl Into<String>) -> Self {
        Self { at, by: by.into() }
    }
}

/// Kind-specific payload of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeBody {
    /// Container owning its children exclusively
    Folder {
        #[serde(default)]
        children: Forest,
    },

    /// External reference opened outside the tree
    Link { target: String },

    /// Leaf document
    File {
        format: FileFormat,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<String>,
    },
}

/// Node in a department's document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    id: NodeId,
    name: String,
    #[serde(flatten)]
    body: NodeBody,
    #[serde(flatten)]
    stamp: ModificationStamp,
}

impl DocumentNode {
    /// Create node from parts
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        body: NodeBody,
        stamp: ModificationStamp,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            body,
            stamp,
        }
    }

    /// Empty folder
    #[inline]
    #[must_use]
    pub fn folder(id: impl Into<NodeId>, name: impl Into<String>, stamp: ModificationStamp) -> Self {
        Self::folder_with(id, name, stamp, Forest::new())
    }

    /// Folder with initial children
    #[inline]
    #[must_use]
    pub fn folder_with(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        stamp: ModificationStamp,
        children: Forest,
    ) -> Self {
        Self::new(id, name, NodeBody::Folder { children }, stamp)
    }

    #[inline]
    #[must_use]
    pub fn link(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        target: impl Into<String>,
        stamp: ModificationStamp,
    ) -> Self {
        Self::new(
            id,
            name,
            NodeBody::Link {
                target: target.into(),
            },
            stamp,
        )
    }

    #[inline]
    #[must_use]
    pub fn file(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        format: FileFormat,
        size: Option<String>,
        stamp: ModificationStamp,
    ) -> Self {
        Self::new(id, name, NodeBody::File { format, size }, stamp)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    #[inline]
    #[must_use]
    pub fn stamp(&self) -> &ModificationStamp {
        &self.stamp
    }

    /// User-facing kind derived from the body
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match &self.body {
            NodeBody::Folder { .. } => NodeKind::Folder,
            NodeBody::Link { .. } => NodeKind::Link,
            NodeBody::File { format, .. } => NodeKind::from(*format),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_folder(&self) -> bool {
        matches!(self.body, NodeBody::Folder { .. })
    }

    /// Children, present if and only if this is a folder
    #[inline]
    #[must_use]
    pub fn children(&self) -> Option<&Forest> {
        match &self.body {
            NodeBody::Folder { children } => Some(children),
            _ => None,
        }
    }

    /// Link target, present if and only if this is a link
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Link { target } => Some(target),
            _ => None,
        }
    }

    /// Display size, present only for files that have one
    #[inline]
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { size, .. } => size.as_deref(),
            _ => None,
        }
    }

    /// Size column text: item count for folders, `Link` for links
    #[must_use]
    pub fn display_size(&self) -> String {
        match &self.body {
            NodeBody::Folder { children } if children.len() == 1 => "1 item".to_string(),
            NodeBody::Folder { children } => format!("{} items", children.len()),
            NodeBody::Link { .. } => "Link".to_string(),
            NodeBody::File { size, .. } => size.clone().unwrap_or_else(|| "-".to_string()),
        }
    }

    /// Copy carrying a new name and stamp; id and body are preserved
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>, stamp: ModificationStamp) -> Self {
        Self {
            id: self.id.clone(),
            name: name.into(),
            body: self.body.clone(),
            stamp,
        }
    }

    /// Copy of a folder with its children replaced
    ///
    /// Returns `None` for non-folders.
    #[must_use]
    pub(crate) fn with_children(&self, children: Forest) -> Option<Self> {
        self.is_folder().then(|| Self {
            id: self.id.clone(),
            name: self.name.clone(),
            body: NodeBody::Folder { children },
            stamp: self.stamp.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stamp() -> ModificationStamp {
        ModificationStamp::new(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(), "Ana Pereira")
    }

    #[test]
    fn body_decides_structure() {
        let folder = DocumentNode::folder("f", "Campaign", stamp());
        let link = DocumentNode::link("l", "Portal", "https://example.com", stamp());
        let file = DocumentNode::file("x", "Logo.png", FileFormat::Png, Some("450 KB".into()), stamp());

        assert!(folder.children().is_some());
        assert!(link.children().is_none());
        assert!(file.children().is_none());

        assert_eq!(link.target(), Some("https://example.com"));
        assert_eq!(file.size(), Some("450 KB"));
        assert_eq!(folder.size(), None);

        assert_eq!(folder.kind(), NodeKind::Folder);
        assert_eq!(link.kind(), NodeKind::Link);
        assert_eq!(file.kind(), NodeKind::Png);
    }

    #[test]
    fn renamed_keeps_id_and_children() {
        let child = DocumentNode::file("c", "a.pdf", FileFormat::Pdf, None, stamp());
        let folder = DocumentNode::folder_with("f", "Old", stamp(), Forest::unit(child));

        let later = ModificationStamp::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), "Admin");
        let renamed = folder.renamed("New", later.clone());

        assert_eq!(renamed.id(), folder.id());
        assert_eq!(renamed.name(), "New");
        assert_eq!(renamed.children(), folder.children());
        assert_eq!(renamed.stamp(), &later);
    }

    #[test]
    fn display_size_by_kind() {
        let one = DocumentNode::folder_with(
            "f",
            "F",
            stamp(),
            Forest::unit(DocumentNode::folder("g", "G", stamp())),
        );
        assert_eq!(one.display_size(), "1 item");
        assert_eq!(DocumentNode::folder("e", "E", stamp()).display_size(), "0 items");
        assert_eq!(
            DocumentNode::link("l", "L", "https://x", stamp()).display_size(),
            "Link"
        );
    }

    #[test]
    fn with_children_rejects_leaves() {
        let file = DocumentNode::file("x", "a.zip", FileFormat::Zip, None, stamp());
        assert!(file.with_children(Forest::new()).is_none());
    }

    #[test]
    fn json_shape_is_flat() {
        let node = DocumentNode::file("doc-1", "Manual.pdf", FileFormat::Pdf, Some("1.2 MB".into()), stamp());
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["id"], "doc-1");
        assert_eq!(value["kind"], "file");
        assert_eq!(value["format"], "pdf");
        assert_eq!(value["modified_at"], "2024-04-02");
        assert_eq!(value["modified_by"], "Ana Pereira");

        let back: DocumentNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn folder_children_default_to_empty() {
        let json = r#"{"id":"f","name":"F","kind":"folder","modified_at":"2024-01-01","modified_by":"A"}"#;
        let node: DocumentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.children().map(im::Vector::len), Some(0));
    }
}
