//! DMS Console
//!
//! Host-side pieces of the document console: navigation inside a module
//! tree, reconciliation after external edits, the publish bridge and the
//! application shell tying them to the store.
//!
//! # Core Concepts
//!
//! - **Navigator**: working directory as a list of folder ids, resolved
//!   against the current snapshot on every read
//! - **Reconciler**: re-derives a navigator path after the store replaced
//!   the tree, cutting it at the first folder that no longer exists
//! - **Publish bridge**: promotes file copies into the publications ledger,
//!   first write wins
//! - **ModuleSession**: one view (module or sub-folder) with validation,
//!   stamping and store writes
//! - **Console**: owns store, catalog, ledger and config
//!
//! # Example
//!
//! ```rust
//! use dms_console::{Console, ConsoleConfig, ConsoleSeed};
//!
//! let mut console = Console::new(ConsoleSeed::demo().unwrap(), ConsoleConfig::default());
//! let mut session = console.open_view("/marketing").unwrap();
//!
//! let id = session.create_folder(console.store_mut(), "Q3 Campaign").unwrap();
//! assert_eq!(session.contents(console.store())[0].id(), &id);
//! assert_eq!(session.breadcrumbs(console.store()), vec!["Marketing"]);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod navigator;
pub mod publish;
pub mod reconciler;
pub mod session;
pub mod shell;

// Re-exports
pub use config::ConsoleConfig;
pub use error::{ConsoleError, NavigationError, PublishError};
pub use navigator::{Activation, Crumb, Navigator};
pub use publish::{
    link_slug, request_publish, PublicationRecord, PublicationStatus, PublicationsLedger,
    PublishSink, Submission,
};
pub use reconciler::{reconcile, Reconciliation};
pub use session::{ModuleSession, User};
pub use shell::{Console, ConsoleSeed};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for console hosts
    pub use crate::{
        Activation, Console, ConsoleConfig, ConsoleError, ConsoleSeed, ModuleSession,
        PublicationsLedger, PublishSink, User,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use dms_store::Role;
    use dms_tree::NodeId;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_views_of_one_tree_stay_consistent() {
        let mut console = Console::new(
            ConsoleSeed::demo().unwrap(),
            ConsoleConfig::new().with_user("Carlos Silva", Role::SubManager),
        );
        let mut left = console.open_view("/marketing").unwrap();
        let mut right = console.open_view("/marketing").unwrap();

        left.activate(console.store(), &NodeId::from("mkt-1")).unwrap();
        right
            .rename(console.store_mut(), &NodeId::from("mkt-1"), "Q2 Campaign (final)")
            .unwrap();

        assert_eq!(
            left.breadcrumbs(console.store()),
            vec!["Marketing", "Q2 Campaign (final)"]
        );
    }

    #[test]
    fn publish_from_session() {
        let mut console = Console::new(ConsoleSeed::demo().unwrap(), ConsoleConfig::default());
        let mut session = console.open_view("/documents").unwrap();
        let id = NodeId::from("doc-1");

        let first = console.request_publish(&mut session, &id).unwrap();
        let again = console.request_publish(&mut session, &id).unwrap();

        assert!(first.is_new());
        assert_eq!(again.record(), first.record());
        assert_eq!(console.publications().len(), 3);
        assert_eq!(console.publications().records()[0].id, id);
    }
}
