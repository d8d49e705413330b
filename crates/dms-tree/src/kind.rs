//! Node kinds and their capability table
//!
//! [`NodeKind`] is the flat taxonomy shown to users. Structural rules live in
//! [`NodeBody`](crate::NodeBody): only folders own children and only links
//! carry a target. Everything a renderer needs to know about a kind comes
//! from [`NodeKind::descriptor`], a total match checked by the compiler.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Format of a leaf file, inferred from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Pdf,
    Docx,
    Xlsx,
    Jpg,
    Png,
    Zip,
    /// Extension not in the suffix table
    Unknown,
}

/// How to classify a file whose extension is not recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownExtensionPolicy {
    /// Classify as [`FileFormat::Unknown`]
    #[default]
    Unknown,

    /// Legacy categorisation: anything unrecognised is an image (`Jpg`)
    ImageBucket,
}

impl FileFormat {
    /// Suffix table used for inference (lowercase, without the dot)
    pub const SUFFIXES: [(&'static str, FileFormat); 7] = [
        ("pdf", FileFormat::Pdf),
        ("docx", FileFormat::Docx),
        ("xlsx", FileFormat::Xlsx),
        ("zip", FileFormat::Zip),
        ("png", FileFormat::Png),
        ("jpg", FileFormat::Jpg),
        ("jpeg", FileFormat::Jpg),
    ];

    /// Infer the format from a file name
    ///
    /// Matching is case-insensitive on the text after the last `.`.
    /// Names without an extension fall through to `policy`.
    #[must_use]
    pub fn from_file_name(name: &str, policy: UnknownExtensionPolicy) -> Self {
        let known = name.rsplit_once('.').and_then(|(_, ext)| {
            Self::SUFFIXES
                .iter()
                .find(|(suffix, _)| ext.eq_ignore_ascii_case(suffix))
                .map(|(_, format)| *format)
        });

        match (known, policy) {
            (Some(format), _) => format,
            (None, UnknownExtensionPolicy::Unknown) => Self::Unknown,
            (None, UnknownExtensionPolicy::ImageBucket) => Self::Jpg,
        }
    }
}

/// Kind of a document node as presented to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Pdf,
    Docx,
    Xlsx,
    Jpg,
    Png,
    Zip,
    Link,
    Unknown,
}

/// Rendering and behaviour capabilities of a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDescriptor {
    /// Short human label
    pub label: &'static str,
    /// Icon key understood by the renderer
    pub icon: &'static str,
    /// Owns children
    pub container: bool,
    /// May be promoted to a publication
    pub publishable: bool,
}

impl KindDescriptor {
    const fn file(label: &'static str, icon: &'static str) -> Self {
        Self {
            label,
            icon,
            container: false,
            publishable: true,
        }
    }
}

impl NodeKind {
    /// Every kind, in declaration order
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Folder,
        NodeKind::Pdf,
        NodeKind::Docx,
        NodeKind::Xlsx,
        NodeKind::Jpg,
        NodeKind::Png,
        NodeKind::Zip,
        NodeKind::Link,
        NodeKind::Unknown,
    ];

    /// Capability table entry for this kind
    #[must_use]
    pub const fn descriptor(self) -> KindDescriptor {
        match self {
            Self::Folder => KindDescriptor {
                label: "Folder",
                icon: "folder",
                container: true,
                publishable: false,
            },
            Self::Link => KindDescriptor {
                label: "Link",
                icon: "link",
                container: false,
                publishable: false,
            },
            Self::Pdf => KindDescriptor::file("PDF document", "pdf"),
            Self::Docx => KindDescriptor::file("Word document", "docx"),
            Self::Xlsx => KindDescriptor::file("Spreadsheet", "xlsx"),
            Self::Jpg => KindDescriptor::file("JPEG image", "jpg"),
            Self::Png => KindDescriptor::file("PNG image", "png"),
            Self::Zip => KindDescriptor::file("Archive", "zip"),
            Self::Unknown => KindDescriptor::file("File", "file"),
        }
    }

    /// Leaf file kinds (neither folder nor link)
    #[inline]
    #[must_use]
    pub const fn is_file(self) -> bool {
        !matches!(self, Self::Folder | Self::Link)
    }
}

impl From<FileFormat> for NodeKind {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Pdf => Self::Pdf,
            FileFormat::Docx => Self::Docx,
            FileFormat::Xlsx => Self::Xlsx,
            FileFormat::Jpg => Self::Jpg,
            FileFormat::Png => Self::Png,
            FileFormat::Zip => Self::Zip,
            FileFormat::Unknown => Self::Unknown,
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_known_suffixes() {
        let p = UnknownExtensionPolicy::Unknown;
        assert_eq!(FileFormat::from_file_name("Manual.pdf", p), FileFormat::Pdf);
        assert_eq!(FileFormat::from_file_name("Policy.docx", p), FileFormat::Docx);
        assert_eq!(FileFormat::from_file_name("Plan.xlsx", p), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_file_name("bundle.zip", p), FileFormat::Zip);
        assert_eq!(FileFormat::from_file_name("logo.png", p), FileFormat::Png);
        assert_eq!(FileFormat::from_file_name("photo.jpeg", p), FileFormat::Jpg);
    }

    #[test]
    fn inference_ignores_case() {
        let format = FileFormat::from_file_name("SCAN.PDF", UnknownExtensionPolicy::Unknown);
        assert_eq!(format, FileFormat::Pdf);
    }

    #[test]
    fn only_last_extension_counts() {
        let format = FileFormat::from_file_name("report.pdf.zip", UnknownExtensionPolicy::Unknown);
        assert_eq!(format, FileFormat::Zip);
    }

    #[test]
    fn unknown_extension_follows_policy() {
        assert_eq!(
            FileFormat::from_file_name("notes.txt", UnknownExtensionPolicy::Unknown),
            FileFormat::Unknown
        );
        assert_eq!(
            FileFormat::from_file_name("notes.txt", UnknownExtensionPolicy::ImageBucket),
            FileFormat::Jpg
        );
        assert_eq!(
            FileFormat::from_file_name("README", UnknownExtensionPolicy::ImageBucket),
            FileFormat::Jpg
        );
    }

    #[test]
    fn only_folders_are_containers() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.descriptor().container, kind == NodeKind::Folder);
        }
    }

    #[test]
    fn only_files_are_publishable() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.descriptor().publishable, kind.is_file());
        }
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(NodeKind::Xlsx.to_string(), "Spreadsheet");
    }
}
