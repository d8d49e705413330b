//! DMS Document Trees
//!
//! Copy-on-write document trees for department modules.
//!
//! # Core Concepts
//!
//! - [`DocumentNode`]: Folder, file or link inside a module tree
//! - [`Forest`]: Ordered, structurally shared sequence of nodes
//! - [`NodePath`]: Root-relative sequence of folder ids
//! - [`Mutation`]: Pure add/rename/delete producing a new snapshot
//! - [`NodeKind`]: Kind taxonomy and its capability table
//! - [`TreeFingerprint`]: Structural hash of a snapshot
//! - [`Clock`]: Date source for modification stamps
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dms_tree::{DocumentNode, Forest, ModificationStamp, Mutation, NodeId, NodePath};
//!
//! let stamp = ModificationStamp::new(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(), "Ana");
//! let root: Forest = Forest::new();
//!
//! let folder = DocumentNode::folder("f1", "Contracts", stamp.clone());
//! let add = Mutation::Add { parent: NodePath::root(), node: folder };
//! let next = add.apply(&root, &stamp).unwrap();
//!
//! assert_eq!(next.len(), 1);
//! assert!(root.is_empty()); // the input snapshot is untouched
//! assert_eq!(next[0].id(), &NodeId::from("f1"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod clock;
mod fingerprint;
mod id;
mod kind;
mod mutation;
mod node;
mod path;

/// Read-only traversal over snapshots
pub mod query;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use fingerprint::{FingerprintError, TreeFingerprint};
pub use id::NodeId;
pub use kind::{FileFormat, KindDescriptor, NodeKind, UnknownExtensionPolicy};
pub use mutation::{add, delete, rename, Mutation, MutationError};
pub use node::{DocumentNode, Forest, ModificationStamp, NodeBody};
pub use path::{NodePath, PathError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
