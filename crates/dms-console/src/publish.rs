//! Publish bridge and publications ledger
//!
//! Publishing promotes a copy of a file node into a [`PublicationRecord`].
//! The record has its own lifecycle: the source file can be renamed or
//! deleted without touching it, and removing the record leaves the file
//! alone.
//!
//! Submission is first-write-wins by id: asking twice for the same file
//! surfaces the record created the first time.

use crate::error::PublishError;
use dms_tree::{DocumentNode, FileFormat, ModificationStamp, NodeBody, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Published => "published",
        })
    }
}

/// Promoted copy of a file node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Id of the source file node, one record per id
    pub id: NodeId,
    /// File name at the time of the request
    pub name: String,
    /// Format of the source file
    pub format: FileFormat,
    /// Display size copied from the file, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Last modification of the source file
    #[serde(flatten)]
    pub stamp: ModificationStamp,
    /// Draft until published through the ledger
    #[serde(default)]
    pub status: PublicationStatus,
    /// Set once the record is published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_link: Option<String>,
}

impl PublicationRecord {
    /// Draft record copied from a file node
    ///
    /// # Errors
    /// Returns error for folders and links
    pub fn draft(node: &DocumentNode) -> Result<Self, PublishError> {
        let NodeBody::File { format, size } = node.body() else {
            return Err(PublishError::NotPublishable(node.kind()));
        };
        Ok(Self {
            id: node.id().clone(),
            name: node.name().to_string(),
            format: *format,
            size: size.clone(),
            stamp: node.stamp().clone(),
            status: PublicationStatus::Draft,
            public_link: None,
        })
    }

    #[inline]
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == PublicationStatus::Published
    }
}

/// Result of handing a record to the publications collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Record was new and is now tracked
    Created(PublicationRecord),
    /// A record with the same id was already tracked; it is unchanged
    Existing(PublicationRecord),
}

impl Submission {
    #[must_use]
    pub fn record(&self) -> &PublicationRecord {
        match self {
            Self::Created(record) | Self::Existing(record) => record,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Host collaborator receiving publish requests (`onPublishRequest`)
pub trait PublishSink {
    /// Track `record` unless one with the same id already exists
    fn submit(&mut self, record: PublicationRecord) -> Submission;
}

/// Promote `node` and hand it to `sink`
///
/// # Errors
/// Returns error if `node` is a folder or link
pub fn request_publish(
    node: &DocumentNode,
    sink: &mut dyn PublishSink,
) -> Result<Submission, PublishError> {
    let record = PublicationRecord::draft(node)?;
    let submission = sink.submit(record);
    if submission.is_new() {
        tracing::info!(id = %node.id(), name = node.name(), "publication requested");
    } else {
        tracing::debug!(id = %node.id(), "publication already tracked");
    }
    Ok(submission)
}

/// Link slug: name up to the first `.`, lowercased, spaces as `-`
#[must_use]
pub fn link_slug(name: &str) -> String {
    let stem = name.split('.').next().unwrap_or_default();
    stem.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Ordered publications, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationsLedger {
    base_url: String,
    records: Vec<PublicationRecord>,
}

impl PublicationsLedger {
    /// Empty ledger issuing links under `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_records(base_url, Vec::new())
    }

    #[must_use]
    pub fn with_records(base_url: impl Into<String>, records: Vec<PublicationRecord>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, records }
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&PublicationRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Public URL a record gets when published
    #[must_use]
    pub fn public_link(&self, record: &PublicationRecord) -> String {
        format!("{}/{}-{}", self.base_url, record.id, link_slug(&record.name))
    }

    /// Mark published and issue the public link
    ///
    /// # Errors
    /// Returns error if no record has this id
    pub fn publish(&mut self, id: &NodeId) -> Result<&PublicationRecord, PublishError> {
        let index = self.index_of(id)?;
        let link = self.public_link(&self.records[index]);
        let record = &mut self.records[index];
        record.status = PublicationStatus::Published;
        record.public_link = Some(link);
        tracing::info!(%id, link = record.public_link.as_deref(), "document published");
        Ok(record)
    }

    /// Back to draft; the link is withdrawn
    ///
    /// # Errors
    /// Returns error if no record has this id
    pub fn unpublish(&mut self, id: &NodeId) -> Result<&PublicationRecord, PublishError> {
        let index = self.index_of(id)?;
        let record = &mut self.records[index];
        record.status = PublicationStatus::Draft;
        record.public_link = None;
        tracing::info!(%id, "publication withdrawn");
        Ok(record)
    }

    /// Stop tracking a record; the source file is untouched
    ///
    /// # Errors
    /// Returns error if no record has this id
    pub fn remove(&mut self, id: &NodeId) -> Result<PublicationRecord, PublishError> {
        let index = self.index_of(id)?;
        Ok(self.records.remove(index))
    }

    fn index_of(&self, id: &NodeId) -> Result<usize, PublishError> {
        self.records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| PublishError::UnknownPublication(id.clone()))
    }
}

impl PublishSink for PublicationsLedger {
    fn submit(&mut self, record: PublicationRecord) -> Submission {
        if let Some(existing) = self.get(&record.id) {
            return Submission::Existing(existing.clone());
        }
        self.records.insert(0, record.clone());
        Submission::Created(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn stamp() -> ModificationStamp {
        ModificationStamp::new(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), "Carlos Silva")
    }

    fn brochure() -> DocumentNode {
        DocumentNode::file(
            "doc-7",
            "Company Brochure.v2.pdf",
            FileFormat::Pdf,
            Some("2.1 MB".into()),
            stamp(),
        )
    }

    #[test]
    fn draft_copies_file_fields() {
        let record = PublicationRecord::draft(&brochure()).unwrap();
        assert_eq!(record.id, NodeId::from("doc-7"));
        assert_eq!(record.size.as_deref(), Some("2.1 MB"));
        assert_eq!(record.status, PublicationStatus::Draft);
        assert_eq!(record.public_link, None);
    }

    #[test]
    fn folders_and_links_rejected() {
        let folder = DocumentNode::folder("f", "Folder", stamp());
        let link = DocumentNode::link("l", "Site", "https://example.com", stamp());
        assert!(matches!(
            PublicationRecord::draft(&folder),
            Err(PublishError::NotPublishable(dms_tree::NodeKind::Folder))
        ));
        assert!(PublicationRecord::draft(&link).is_err());
    }

    #[test]
    fn second_request_surfaces_first_record() {
        let mut ledger = PublicationsLedger::new("https://docs.example.com/public");
        let first = request_publish(&brochure(), &mut ledger).unwrap();
        let renamed = brochure().renamed("Other.pdf", stamp());
        let second = request_publish(&renamed, &mut ledger).unwrap();

        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(second.record().name, "Company Brochure.v2.pdf");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn newest_first() {
        let mut ledger = PublicationsLedger::new("https://x");
        request_publish(&brochure(), &mut ledger).unwrap();
        let other = DocumentNode::file("doc-8", "Q3.xlsx", FileFormat::Xlsx, None, stamp());
        request_publish(&other, &mut ledger).unwrap();
        assert_eq!(ledger.records()[0].id, NodeId::from("doc-8"));
    }

    #[test]
    fn publish_unpublish_remove() {
        let mut ledger = PublicationsLedger::new("https://docs.example.com/public/");
        request_publish(&brochure(), &mut ledger).unwrap();
        let id = NodeId::from("doc-7");

        let published = ledger.publish(&id).unwrap();
        assert_eq!(
            published.public_link.as_deref(),
            Some("https://docs.example.com/public/doc-7-company-brochure")
        );
        assert!(published.is_published());

        let draft = ledger.unpublish(&id).unwrap();
        assert_eq!(draft.public_link, None);
        assert_eq!(draft.status, PublicationStatus::Draft);

        ledger.remove(&id).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(
            ledger.publish(&id),
            Err(PublishError::UnknownPublication(id))
        );
    }

    #[test]
    fn slug_rules() {
        assert_eq!(link_slug("Annual Report 2023.docx"), "annual-report-2023");
        assert_eq!(link_slug("README"), "readme");
    }
}
