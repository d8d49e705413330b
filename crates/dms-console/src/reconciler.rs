//! Path reconciliation
//!
//! After the store replaces a tree, a navigator's crumbs may name folders
//! that were renamed, turned into something else or deleted. Reconciling
//! walks the new tree by id, refreshes every crumb that still resolves to
//! a folder and cuts the path at the first one that does not.

use crate::navigator::{Crumb, Navigator};
use dms_tree::query::folders_along;
use dms_tree::{Forest, NodePath};

/// Effect of reconciling a path against a new snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Same folders, same names
    Unchanged,
    /// Same folders, at least one name changed
    Refreshed,
    /// Path cut back to its deepest valid ancestor
    Truncated {
        /// Depth before
        from: usize,
        /// Depth after
        to: usize,
    },
}

/// Re-derive `crumbs` from `forest`
#[must_use]
pub fn reconcile(crumbs: &[Crumb], forest: &Forest) -> Vec<Crumb> {
    let path: NodePath = crumbs.iter().map(|crumb| crumb.id.clone()).collect();
    folders_along(forest, &path).into_iter().map(Crumb::of).collect()
}

impl Navigator {
    /// Rebuild the path from a freshly replaced tree
    pub fn reconcile(&mut self, forest: &Forest) -> Reconciliation {
        let fresh = reconcile(self.crumbs(), forest);
        let outcome = if fresh.len() < self.depth() {
            tracing::debug!(
                from = self.depth(),
                to = fresh.len(),
                "navigation path truncated"
            );
            Reconciliation::Truncated {
                from: self.depth(),
                to: fresh.len(),
            }
        } else if fresh.as_slice() == self.crumbs() {
            Reconciliation::Unchanged
        } else {
            Reconciliation::Refreshed
        };
        self.replace(fresh);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dms_tree::{delete, rename, DocumentNode, ModificationStamp, NodeId};
    use pretty_assertions::assert_eq;

    fn stamp() -> ModificationStamp {
        ModificationStamp::new(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(), "Ana Pereira")
    }

    // A > B > C
    fn chain() -> Forest {
        let c = DocumentNode::folder("c", "C", stamp());
        let b = DocumentNode::folder_with("b", "B", stamp(), Forest::unit(c));
        Forest::unit(DocumentNode::folder_with("a", "A", stamp(), Forest::unit(b)))
    }

    fn deep(forest: &Forest) -> Navigator {
        let mut nav = Navigator::new();
        for _ in 0..3 {
            let next = nav.current_contents(forest)[0].id().clone();
            nav.enter(forest, &next).unwrap();
        }
        nav
    }

    #[test]
    fn deleted_middle_folder_cuts_path() {
        let forest = chain();
        let mut nav = deep(&forest);
        let pruned = delete(&forest, &NodePath::single("a"), &NodeId::from("b")).unwrap();

        let outcome = nav.reconcile(&pruned);

        assert_eq!(outcome, Reconciliation::Truncated { from: 3, to: 1 });
        assert_eq!(nav.breadcrumb_trail().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn rename_refreshes_names() {
        let forest = chain();
        let mut nav = deep(&forest);
        let renamed = rename(&forest, &NodePath::single("a"), &NodeId::from("b"), "Beta", &stamp()).unwrap();

        assert_eq!(nav.reconcile(&renamed), Reconciliation::Refreshed);
        assert_eq!(nav.breadcrumb_trail().collect::<Vec<_>>(), vec!["A", "Beta", "C"]);
    }

    #[test]
    fn same_tree_is_unchanged() {
        let forest = chain();
        let mut nav = deep(&forest);
        let before = nav.clone();
        assert_eq!(nav.reconcile(&forest), Reconciliation::Unchanged);
        assert_eq!(nav, before);
    }

    #[test]
    fn folder_replaced_by_file_cuts_path() {
        let forest = chain();
        let mut nav = deep(&forest);
        let file = DocumentNode::file("a", "A", dms_tree::FileFormat::Pdf, None, stamp());

        nav.reconcile(&Forest::unit(file));
        assert!(nav.is_root());
    }
}
