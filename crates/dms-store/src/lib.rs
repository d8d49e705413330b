//! DMS Store
//!
//! Host-owned state around the document trees.
//!
//! # Overview
//!
//! - **TreeStore**: module/sub-folder key → current [`Forest`](dms_tree::Forest) snapshot,
//!   replaced wholesale on every write and observed through [`TreeObserver`]
//! - **ModuleCatalog**: department descriptors, view resolution and
//!   structure edits kept in sync with the store
//! - **Seed**: JSON/YAML/TOML seed documents and the embedded demo seed
//!
//! # Example
//!
//! ```rust
//! use dms_store::{SeedDocument, TreeStore};
//!
//! let seed = SeedDocument::demo().unwrap();
//! let mut store = TreeStore::from_seed(&seed);
//!
//! let marketing = store.get("/marketing");
//! let revision = store.set("/marketing", marketing.clone());
//! assert_eq!(store.revision("/marketing"), Some(revision));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod module;
pub mod seed;
pub mod store;

// Re-exports
pub use error::{CatalogError, SeedError, StoreError};
pub use module::{slugify, Location, ModuleCatalog, ModuleDescriptor, Role, StructureDiff, SubFolder};
pub use seed::{SeedDocument, SeedFormat};
pub use store::{Revision, Snapshot, TreeObserver, TreeStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for store operations
    pub use crate::{
        Location, ModuleCatalog, ModuleDescriptor, Revision, Role, SeedDocument, Snapshot,
        TreeObserver, TreeStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
